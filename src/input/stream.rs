//! Input normalization: raw terminal events to the engine's event model.
//!
//! Two layers. [`InputNormalizer`] is a pure state machine holding the key
//! input mode and the line editor; it converts one raw terminal event into
//! at most one [`InputEvent`] and is fully testable without a terminal.
//! [`EventStream`] wraps it with the terminal claim: raw input mode on
//! construction (fatal when unavailable), restored on drop, and a
//! non-blocking drain of everything currently pending.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;
use tracing::debug;

use super::keys::{map_key_code, Key};
use super::line::LineEditor;
use crate::terminal::TerminalSession;

/// How raw key input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInputMode {
    /// Discrete key-down / key-up events.
    Keys,
    /// Character input accumulates into an editable line; a completed line
    /// is delivered as one event.
    Lines,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released. Only delivered on terminals that report
    /// releases; absent support degrades to key-down-only input.
    KeyUp(Key),
    /// A line was completed in Lines mode.
    Line(String),
    /// The terminal was resized.
    Resize(u16, u16),
}

/// A consumer of normalized input events.
///
/// Key and line hooks return `true` to claim the event, which stops
/// dispatch to consumers registered after this one. Resize notifications
/// are not claimable; every consumer sees them.
pub trait EventSink {
    /// A key was pressed. Return `true` to claim the event.
    fn on_key_down(&mut self, key: Key) -> bool {
        let _ = key;
        false
    }

    /// A key was released. Return `true` to claim the event.
    fn on_key_up(&mut self, key: Key) -> bool {
        let _ = key;
        false
    }

    /// A line was submitted. Return `true` to claim the event.
    fn on_line_input(&mut self, line: &str) -> bool {
        let _ = line;
        false
    }

    /// The terminal was resized.
    fn on_window_resize(&mut self, width: u16, height: u16) {
        let _ = (width, height);
    }
}

/// Dispatch one event to an ordered list of consumers.
///
/// Consumers are visited in slice (registration) order; the first claimant
/// of a key or line event stops dispatch for that event only. Returns
/// whether anyone claimed it.
pub fn dispatch_event(consumers: &mut [&mut dyn EventSink], event: &InputEvent) -> bool {
    match event {
        InputEvent::KeyDown(key) => consumers.iter_mut().any(|c| c.on_key_down(*key)),
        InputEvent::KeyUp(key) => consumers.iter_mut().any(|c| c.on_key_up(*key)),
        InputEvent::Line(line) => consumers.iter_mut().any(|c| c.on_line_input(line)),
        InputEvent::Resize(w, h) => {
            for c in consumers.iter_mut() {
                c.on_window_resize(*w, *h);
            }
            false
        }
    }
}

/// The mode-aware raw-event to [`InputEvent`] state machine.
#[derive(Debug, Default)]
pub struct InputNormalizer {
    mode: Mode,
    editor: LineEditor,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
enum Mode {
    #[default]
    Keys,
    Lines,
}

impl InputNormalizer {
    /// A normalizer in Keys mode with an empty line editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current key input mode.
    pub const fn key_input_mode(&self) -> KeyInputMode {
        match self.mode {
            Mode::Keys => KeyInputMode::Keys,
            Mode::Lines => KeyInputMode::Lines,
        }
    }

    /// Switch the key input mode. Idempotent; leaving Lines mode discards
    /// any partially entered line so no partial text is ever delivered.
    pub fn set_key_input_mode(&mut self, mode: KeyInputMode) {
        let target = match mode {
            KeyInputMode::Keys => Mode::Keys,
            KeyInputMode::Lines => Mode::Lines,
        };
        if self.mode == target {
            return;
        }
        if self.mode == Mode::Lines {
            self.editor.clear();
        }
        debug!(?mode, "key input mode switched");
        self.mode = target;
    }

    /// The in-progress line as UTF-8. Empty outside Lines mode.
    pub fn current_line(&mut self) -> &str {
        self.editor.as_str()
    }

    /// Convert one raw terminal event into at most one normalized event.
    pub fn normalize(&mut self, raw: &Event) -> Option<InputEvent> {
        match raw {
            Event::Resize(w, h) => Some(InputEvent::Resize(*w, *h)),
            Event::Key(key) => match self.mode {
                Mode::Keys => Self::normalize_keys(key),
                Mode::Lines => self.normalize_lines(key),
            },
            _ => None,
        }
    }

    /// Keys mode: map through the static key table, dropping unmapped
    /// codes.
    fn normalize_keys(key: &event::KeyEvent) -> Option<InputEvent> {
        let mapped = map_key_code(key.code)?;
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => Some(InputEvent::KeyDown(mapped)),
            KeyEventKind::Release => Some(InputEvent::KeyUp(mapped)),
        }
    }

    /// Lines mode: edit in place; Enter completes the line. The backquote
    /// is reserved as the command-bar toggle and never enters line text;
    /// Escape passes through so the engine can dismiss the bar.
    fn normalize_lines(&mut self, key: &event::KeyEvent) -> Option<InputEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char('`') => Some(InputEvent::KeyDown(Key::GraveAccent)),
            KeyCode::Char(c) => {
                self.editor.insert(c);
                None
            }
            KeyCode::Backspace => {
                self.editor.backspace();
                None
            }
            KeyCode::Delete => {
                self.editor.delete();
                None
            }
            KeyCode::Left => {
                self.editor.move_left();
                None
            }
            KeyCode::Right => {
                self.editor.move_right();
                None
            }
            KeyCode::Home => {
                self.editor.move_home();
                None
            }
            KeyCode::End => {
                self.editor.move_end();
                None
            }
            KeyCode::Enter => Some(InputEvent::Line(self.editor.take())),
            KeyCode::Esc => Some(InputEvent::KeyDown(Key::Escape)),
            _ => None,
        }
    }
}

/// The terminal-backed input drain.
pub struct EventStream {
    normalizer: InputNormalizer,
    _session: TerminalSession,
}

impl EventStream {
    /// Claim the terminal for raw input.
    ///
    /// # Errors
    ///
    /// Fatal when the terminal cannot be placed into raw input mode;
    /// running with cooked input would deliver no usable events.
    pub fn new() -> io::Result<Self> {
        let session = TerminalSession::input()?;
        Ok(Self {
            normalizer: InputNormalizer::new(),
            _session: session,
        })
    }

    /// The current key input mode.
    pub const fn key_input_mode(&self) -> KeyInputMode {
        self.normalizer.key_input_mode()
    }

    /// Switch the key input mode (see
    /// [`InputNormalizer::set_key_input_mode`]).
    pub fn set_key_input_mode(&mut self, mode: KeyInputMode) {
        self.normalizer.set_key_input_mode(mode);
    }

    /// The in-progress line as UTF-8.
    pub fn current_line(&mut self) -> &str {
        self.normalizer.current_line()
    }

    /// Drain every currently pending raw event without blocking and return
    /// the normalized events in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error when the terminal event source fails; input is not
    /// subject to transient failure, so callers treat this as fatal.
    pub fn process_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let raw = event::read()?;
            if let Some(normalized) = self.normalizer.normalize(&raw) {
                events.push(normalized);
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn release(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        })
    }

    fn feed(n: &mut InputNormalizer, events: &[Event]) -> Vec<InputEvent> {
        events.iter().filter_map(|e| n.normalize(e)).collect()
    }

    #[test]
    fn keys_mode_maps_press_and_release() {
        let mut n = InputNormalizer::new();
        assert_eq!(
            n.normalize(&press(KeyCode::Char('w'))),
            Some(InputEvent::KeyDown(Key::W))
        );
        assert_eq!(
            n.normalize(&release(KeyCode::Char('w'))),
            Some(InputEvent::KeyUp(Key::W))
        );
    }

    #[test]
    fn keys_mode_drops_unmapped_codes() {
        let mut n = InputNormalizer::new();
        assert_eq!(n.normalize(&press(KeyCode::Char('!'))), None);
        assert_eq!(n.normalize(&press(KeyCode::F(1))), None);
    }

    #[test]
    fn resize_passes_through_in_both_modes() {
        let mut n = InputNormalizer::new();
        assert_eq!(
            n.normalize(&Event::Resize(80, 24)),
            Some(InputEvent::Resize(80, 24))
        );
        n.set_key_input_mode(KeyInputMode::Lines);
        assert_eq!(
            n.normalize(&Event::Resize(100, 30)),
            Some(InputEvent::Resize(100, 30))
        );
    }

    #[test]
    fn lines_mode_edits_and_submits() {
        let mut n = InputNormalizer::new();
        n.set_key_input_mode(KeyInputMode::Lines);

        let events = feed(
            &mut n,
            &[
                press(KeyCode::Char('a')),
                press(KeyCode::Char('b')),
                press(KeyCode::Backspace),
                press(KeyCode::Char('c')),
                press(KeyCode::Enter),
            ],
        );

        assert_eq!(events, vec![InputEvent::Line("ac".to_string())]);
        assert_eq!(n.current_line(), "");
    }

    #[test]
    fn lines_mode_cursor_navigation() {
        let mut n = InputNormalizer::new();
        n.set_key_input_mode(KeyInputMode::Lines);

        let events = feed(
            &mut n,
            &[
                press(KeyCode::Char('b')),
                press(KeyCode::Char('c')),
                press(KeyCode::Home),
                press(KeyCode::Char('x')),
                press(KeyCode::End),
            ],
        );

        assert!(events.is_empty());
        assert_eq!(n.current_line(), "xbc");
    }

    #[test]
    fn mode_switch_discards_partial_line() {
        let mut n = InputNormalizer::new();
        n.set_key_input_mode(KeyInputMode::Lines);
        let _ = feed(&mut n, &[press(KeyCode::Char('h')), press(KeyCode::Char('i'))]);
        assert_eq!(n.current_line(), "hi");

        n.set_key_input_mode(KeyInputMode::Keys);
        n.set_key_input_mode(KeyInputMode::Lines);
        assert_eq!(n.current_line(), "");
    }

    #[test]
    fn mode_switch_is_idempotent() {
        let mut n = InputNormalizer::new();
        n.set_key_input_mode(KeyInputMode::Lines);
        let _ = feed(&mut n, &[press(KeyCode::Char('h'))]);
        // Re-requesting the current mode must not clear the buffer.
        n.set_key_input_mode(KeyInputMode::Lines);
        assert_eq!(n.current_line(), "h");
    }

    #[test]
    fn lines_mode_reserves_backquote_and_escape() {
        let mut n = InputNormalizer::new();
        n.set_key_input_mode(KeyInputMode::Lines);

        assert_eq!(
            n.normalize(&press(KeyCode::Char('`'))),
            Some(InputEvent::KeyDown(Key::GraveAccent))
        );
        assert_eq!(
            n.normalize(&press(KeyCode::Esc)),
            Some(InputEvent::KeyDown(Key::Escape))
        );
        assert_eq!(n.current_line(), "");
    }

    struct Recorder {
        name: &'static str,
        claims: bool,
        seen: Vec<String>,
    }

    impl EventSink for Recorder {
        fn on_key_down(&mut self, key: Key) -> bool {
            self.seen.push(format!("{}:{key:?}", self.name));
            self.claims
        }

        fn on_window_resize(&mut self, width: u16, height: u16) {
            self.seen.push(format!("{}:{width}x{height}", self.name));
        }
    }

    #[test]
    fn dispatch_stops_at_first_claimant() {
        let mut first = Recorder { name: "first", claims: true, seen: Vec::new() };
        let mut second = Recorder { name: "second", claims: false, seen: Vec::new() };

        {
            let mut consumers: [&mut dyn EventSink; 2] = [&mut first, &mut second];
            assert!(dispatch_event(&mut consumers, &InputEvent::KeyDown(Key::A)));
        }

        assert_eq!(first.seen, vec!["first:A"]);
        assert!(second.seen.is_empty());
    }

    #[test]
    fn dispatch_continues_past_decliners() {
        let mut first = Recorder { name: "first", claims: false, seen: Vec::new() };
        let mut second = Recorder { name: "second", claims: true, seen: Vec::new() };

        {
            let mut consumers: [&mut dyn EventSink; 2] = [&mut first, &mut second];
            assert!(dispatch_event(&mut consumers, &InputEvent::KeyDown(Key::B)));
        }

        assert_eq!(first.seen, vec!["first:B"]);
        assert_eq!(second.seen, vec!["second:B"]);
    }

    #[test]
    fn resize_reaches_every_consumer() {
        let mut first = Recorder { name: "first", claims: true, seen: Vec::new() };
        let mut second = Recorder { name: "second", claims: true, seen: Vec::new() };

        {
            let mut consumers: [&mut dyn EventSink; 2] = [&mut first, &mut second];
            assert!(!dispatch_event(&mut consumers, &InputEvent::Resize(80, 24)));
        }

        assert_eq!(first.seen, vec!["first:80x24"]);
        assert_eq!(second.seen, vec!["second:80x24"]);
    }
}
