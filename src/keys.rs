//! Canonical key tokens.
//!
//! Raw identifiers from any input source (browser-style key names, terminal
//! events, replay scripts) are folded into one vocabulary: printable keys
//! become their lower-cased glyph, the space bar becomes `space`, and
//! control keys get a fixed name.

pub const SPACE: &str = "space";
pub const BACKSPACE: &str = "backspace";

fn special_token(lower: &str) -> Option<&'static str> {
    let token = match lower {
        "semicolon" => ";",
        "quote" => "'",
        "comma" => ",",
        "period" => ".",
        "slash" => "/",
        "backslash" => "\\",
        "bracketleft" => "[",
        "bracketright" => "]",
        "minus" => "-",
        "equal" => "=",
        "backquote" => "`",
        "enter" => "enter",
        "backspace" => BACKSPACE,
        "tab" => "tab",
        "capslock" => "capslock",
        "shift" | "shiftleft" => "shiftleft",
        "shiftright" => "shiftright",
        "control" | "ctrl" | "controlleft" => "controlleft",
        "controlright" => "controlright",
        "alt" | "altleft" => "altleft",
        "altright" => "altright",
        "meta" | "win" | "winleft" => "winleft",
        "winright" => "winright",
        "contextmenu" | "menuright" => "menuright",
        "delete" => "delete",
        _ => return None,
    };
    Some(token)
}

/// Map a raw key identifier to its canonical token. Total and idempotent.
pub fn normalize_key(key: &str) -> String {
    if key == " " {
        return SPACE.to_string();
    }
    let lower = key.to_lowercase();
    if lower == SPACE || lower == "spacebar" {
        return SPACE.to_string();
    }
    match special_token(&lower) {
        Some(token) => token.to_string(),
        None => lower,
    }
}

/// Token expected when the target holds `c`.
pub fn normalize_char(c: char) -> String {
    let mut buf = [0u8; 4];
    normalize_key(c.encode_utf8(&mut buf))
}

/// What a normalized key means to a typing session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Backspace,
    /// A single printable glyph or `space`
    Glyph(String),
    Ignored,
}

impl KeyInput {
    pub fn classify(raw: &str) -> Self {
        let token = normalize_key(raw);
        if token == BACKSPACE {
            KeyInput::Backspace
        } else if token == SPACE || token.chars().count() == 1 {
            KeyInput::Glyph(token)
        } else {
            KeyInput::Ignored
        }
    }
}
