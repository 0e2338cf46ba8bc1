//! Key: the closed set of abstracted input keys.
//!
//! Raw terminal key codes map onto this set through [`map_key_code`]; codes
//! with no mapping are dropped by the normalizer rather than surfaced.

use crossterm::event::{KeyCode, ModifierKeyCode};

/// An abstracted input key.
///
/// Covers the keys the engine and its games actually consume: letters,
/// digits, navigation, control keys, and the backquote used to toggle the
/// command bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Shift,
    Control,
    Alt,
    Escape,
    Space,
    Left,
    Up,
    Right,
    Down,
    GraveAccent,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
}

/// Map a raw terminal key code onto the abstract [`Key`] set.
///
/// Returns `None` for codes the engine does not consume; dropping them is
/// expected, not an error.
pub fn map_key_code(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Left => Key::Left,
        KeyCode::Up => Key::Up,
        KeyCode::Right => Key::Right,
        KeyCode::Down => Key::Down,
        KeyCode::Modifier(m) => match m {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Key::Shift,
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Key::Control,
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Key::Alt,
            _ => return None,
        },
        KeyCode::Char(c) => map_char(c)?,
        _ => return None,
    })
}

/// Map a printable character onto the abstract key set.
fn map_char(c: char) -> Option<Key> {
    Some(match c.to_ascii_uppercase() {
        ' ' => Key::Space,
        '`' => Key::GraveAccent,
        '0' => Key::Digit0,
        '1' => Key::Digit1,
        '2' => Key::Digit2,
        '3' => Key::Digit3,
        '4' => Key::Digit4,
        '5' => Key::Digit5,
        '6' => Key::Digit6,
        '7' => Key::Digit7,
        '8' => Key::Digit8,
        '9' => Key::Digit9,
        'A' => Key::A,
        'B' => Key::B,
        'C' => Key::C,
        'D' => Key::D,
        'E' => Key::E,
        'F' => Key::F,
        'G' => Key::G,
        'H' => Key::H,
        'I' => Key::I,
        'J' => Key::J,
        'K' => Key::K,
        'L' => Key::L,
        'M' => Key::M,
        'N' => Key::N,
        'O' => Key::O,
        'P' => Key::P,
        'Q' => Key::Q,
        'R' => Key::R,
        'S' => Key::S,
        'T' => Key::T,
        'U' => Key::U,
        'V' => Key::V,
        'W' => Key::W,
        'X' => Key::X,
        'Y' => Key::Y,
        'Z' => Key::Z,
        _ => return None,
    })
}
