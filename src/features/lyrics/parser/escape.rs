//! Numeric character escape handling
//!
//! Lyric resources arrive with some characters written as `&#<code>` tokens
//! (optionally followed by `;`). Only a small table of display characters is
//! decoded here. Every other token, including the structural ones (colon,
//! period, line feed), is written back exactly as it appeared so the entry
//! parser can still see it.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Escape code for a line feed, used as the entry delimiter
pub const LINE_FEED: u32 = 10;
/// Escape code for `:`, the minute/second separator
pub const COLON: u32 = 58;
/// Escape code for `.`, the second/sub-second separator
pub const PERIOD: u32 = 46;

/// Display characters decoded during escape resolution
const ESCAPE_TABLE: &[(u32, char)] = &[(32, ' '), (40, '('), (41, ')'), (45, '-')];

/// `&#` followed by decimal digits and an optional `;`
pub(super) static ESCAPE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#([0-9]+);?").expect("invalid ESCAPE_TOKEN pattern"));

/// Look up the character for an escape code, if it is one we decode
pub fn decode_char(code: u32) -> Option<char> {
    ESCAPE_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, ch)| *ch)
}

/// Look up the escape code for a character, if it is one we decode
pub fn encode_char(ch: char) -> Option<u32> {
    ESCAPE_TABLE.iter().find(|(_, c)| *c == ch).map(|(code, _)| *code)
}

/// Parse the digits of an escape token
///
/// Codes too large for `u32` return `None` and are treated as unknown.
pub(super) fn token_code(caps: &Captures<'_>) -> Option<u32> {
    caps.get(1)?.as_str().parse().ok()
}

/// Replace known escape tokens with their characters
///
/// Unknown codes are left untouched. Borrows the input when nothing changes.
pub fn resolve_escapes(raw: &str) -> Cow<'_, str> {
    ESCAPE_TOKEN.replace_all(raw, |caps: &Captures<'_>| {
        match token_code(caps).and_then(decode_char) {
            Some(ch) => ch.to_string(),
            None => {
                tracing::trace!(token = &caps[0], "Leaving unknown escape token as text");
                caps[0].to_string()
            }
        }
    })
}

/// Escape display characters so the text survives another decode
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match encode_char(ch) {
            Some(code) => {
                out.push_str("&#");
                out.push_str(&code.to_string());
                out.push(';');
            }
            None => out.push(ch),
        }
    }
    out
}
