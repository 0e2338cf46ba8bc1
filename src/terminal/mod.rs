//! Terminal collaborators: escape sequences, output accumulation, and
//! scoped state management.
//!
//! - [`sequences`]: pure builders for the escape codes the engine emits
//! - [`output`]: the single-write [`OutputBuffer`](output::OutputBuffer)
//! - [`state`]: terminal-mode cache/restore and the
//!   [`TerminalSession`](state::TerminalSession) guard

pub mod output;
pub mod sequences;
pub mod state;

pub use output::OutputBuffer;
pub use state::{CachedState, TerminalSession};
