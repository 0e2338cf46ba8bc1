//! Input module: key mapping, line editing, and event normalization.
//!
//! - [`Key`]: the closed set of abstracted input keys
//! - [`LineEditor`]: in-place editing of one input line
//! - [`InputNormalizer`] / [`EventStream`]: raw terminal events to the
//!   engine's [`InputEvent`] model, with ordered consumer dispatch

mod keys;
mod line;
mod stream;

pub use keys::{map_key_code, Key};
pub use line::LineEditor;
pub use stream::{dispatch_event, EventSink, EventStream, InputEvent, InputNormalizer, KeyInputMode};
