//! Lyrics parsing module
//!
//! Parses the escaped bracket-timestamp format served by the lyric resource:
//!
//! ```text
//! [01&#58;02&#46;50]Hello&#10;[01&#58;05&#46;00]&#40;Live&#41;&#10;
//! ```
//!
//! Structural delimiters (`:`, `.`, line feed) arrive as escape tokens, so
//! display escapes are resolved first and the entries are cut afterwards.
//! Literal `:`, `.` and `\n` are accepted as well, which makes plain LRC
//! text parse the same way.

mod escape;
mod types;

pub use types::*;

use once_cell::sync::Lazy;
use regex::Regex;

use escape::{COLON, ESCAPE_TOKEN, LINE_FEED, PERIOD, escape_text, resolve_escapes, token_code};

/// Marker appended to the text so the final entry is always terminated
const ENTRY_TERMINATOR: &str = "&#10;";

/// `[mm<sep>ss<sep>xx]`, escaped or literal separators, sub-second part optional
static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"\[([0-9]+)(?:&#{COLON};|:)([0-9]+)(?:(?:&#{PERIOD};|\.)([0-9]+))?\]"
    );
    Regex::new(&pattern).expect("invalid TIMESTAMP pattern")
});

/// Parse raw lyric text into a time-ordered sequence of lines
///
/// Never fails: entries that do not match the timestamp pattern are skipped
/// and empty input yields an empty sequence.
pub fn parse_lyrics(raw: &str) -> Vec<LyricLine> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut text = resolve_escapes(raw).into_owned();
    text.push_str(ENTRY_TERMINATOR);

    let entries = split_entries(&text);
    let mut lines = Vec::with_capacity(entries.len());

    for entry in entries {
        match parse_entry(entry) {
            Some(line) => lines.push(line),
            None if entry.trim().is_empty() => {}
            None => tracing::trace!(entry, "Skipping malformed lyric entry"),
        }
    }

    process_lyrics(&mut lines);
    lines
}

/// Cut the text at line-feed escape tokens and literal newlines
fn split_entries(text: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;

    for caps in ESCAPE_TOKEN.captures_iter(text) {
        if token_code(&caps) != Some(LINE_FEED) {
            continue;
        }
        if let Some(token) = caps.get(0) {
            push_lines(&text[start..token.start()], &mut entries);
            start = token.end();
        }
    }
    push_lines(&text[start..], &mut entries);

    entries
}

fn push_lines<'a>(segment: &'a str, entries: &mut Vec<&'a str>) {
    for line in segment.split('\n') {
        entries.push(line.strip_suffix('\r').unwrap_or(line));
    }
}

/// Parse a single entry, `None` if it is not a timed lyric line
///
/// The timestamp may appear anywhere in the entry. When several are
/// present the last one times the line, and the text is whatever follows it.
fn parse_entry(entry: &str) -> Option<LyricLine> {
    let caps = TIMESTAMP.captures_iter(entry).last()?;
    let text = &entry[caps.get(0)?.end()..];
    if text.is_empty() {
        return None;
    }

    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    let timestamp = minutes.checked_mul(60)?.checked_add(seconds)?;
    let sub_second_ms = caps.get(3).map_or(0, |m| normalize_sub_second(m.as_str()));

    Some(LyricLine {
        timestamp,
        sub_second_ms,
        text: text.to_string(),
        sequence_index: 0,
    })
}

/// Scale sub-second digits to milliseconds: `5` -> 500, `50` -> 500, `123` -> 123
///
/// Digits past the third are dropped.
fn normalize_sub_second(digits: &str) -> u32 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Write lines back in the escaped bracket-timestamp format
pub fn stringify_lyrics(lines: &[LyricLine]) -> String {
    let capacity: usize = lines.iter().map(|l| l.text.len() + 24).sum();
    let mut result = String::with_capacity(capacity);

    for line in lines {
        result.push_str(&format!(
            "[{:02}&#58;{:02}&#46;{:02}]",
            line.minutes(),
            line.seconds(),
            line.sub_second_ms / 10
        ));
        result.push_str(&escape_text(&line.text));
        result.push_str(ENTRY_TERMINATOR);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_escaped_line() {
        let lines = parse_lyrics("[01&#58;02&#46;50]Hello&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].timestamp, 62);
        assert_eq!(lines[0].sub_second_ms, 500);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[0].sequence_index, 0);
    }

    #[test]
    fn test_parse_resolves_display_escapes() {
        let lines = parse_lyrics("[00&#58;03&#46;00]Song&#32;&#40;Live&#41;&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Song (Live)");
    }

    #[test]
    fn test_final_entry_without_terminator() {
        let lines = parse_lyrics("[00&#58;01&#46;00]One&#10;[00&#58;02&#46;00]Two");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "Two");
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let raw = "[00&#58;01&#46;00]First&#10;\
                   [xx&#58;yy&#46;00]Bad&#10;\
                   [00&#58;04&#46;00]Second&#10;";
        let lines = parse_lyrics(raw);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["First", "Second"]);
        assert_eq!(lines[0].timestamp, 1);
        assert_eq!(lines[1].timestamp, 4);
        assert_eq!(lines[1].sequence_index, 1);
    }

    #[test]
    fn test_unknown_escape_kept_in_text() {
        let lines = parse_lyrics("[00&#58;05&#46;00]It&#39;s&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "It&#39;s");
    }

    #[test]
    fn test_line_feed_code_must_be_exact() {
        // &#100 is not a line feed
        let lines = parse_lyrics("[00&#58;05&#46;00]a&#100;b&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "a&#100;b");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_lyrics("").is_empty());
        assert!(parse_lyrics("   ").is_empty());
        assert!(parse_lyrics("&#10;&#10;").is_empty());
    }

    #[test]
    fn test_garbage_input_is_total() {
        let inputs = [
            "[",
            "]",
            "&#",
            "[&#58;&#46;]x",
            "[1&#58;2]",
            "&#10",
            "[99999999999999999999&#58;00&#46;00]x",
            "[00&#58;09]z&#10;junk[00&#58;03]y&#10;[00&#58;03]x",
        ];
        for raw in inputs {
            let lines = parse_lyrics(raw);
            assert!(lines.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
            assert!(lines.iter().enumerate().all(|(i, l)| l.sequence_index == i));
            assert!(lines.iter().all(|l| !l.text.is_empty()));
        }
        assert!(parse_lyrics("[99999999999999999999&#58;00&#46;00]x").is_empty());

        let mixed = parse_lyrics(inputs[7]);
        let texts: Vec<&str> = mixed.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["y", "x", "z"]);
    }

    #[test]
    fn test_leading_text_before_timestamp() {
        let lines = parse_lyrics("intro[00&#58;01&#46;00]Hi&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].timestamp, 1);
        assert_eq!(lines[0].text, "Hi");
    }

    #[test]
    fn test_stacked_timestamps_use_the_last() {
        let lines = parse_lyrics("[00&#58;01&#46;00][00&#58;05&#46;00]Chorus&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].timestamp, 5);
        assert_eq!(lines[0].text, "Chorus");

        // A second timestamp later in the entry starts the text over
        let lines = parse_lyrics("[00:01.00]Hi[00:05.00]There");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].timestamp, 5);
        assert_eq!(lines[0].text, "There");
    }

    #[test]
    fn test_entry_without_text_is_skipped() {
        let lines = parse_lyrics("[00&#58;01&#46;00]&#10;[00&#58;02&#46;00]Two&#10;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Two");
    }

    #[test]
    fn test_output_is_time_ordered() {
        let raw = "[00&#58;30&#46;00]c&#10;[00&#58;10&#46;00]a&#10;[00&#58;30&#46;00]d&#10;[00&#58;20&#46;00]b&#10;";
        let lines = parse_lyrics(raw);
        assert!(lines.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
    }

    #[test]
    fn test_plain_lrc_text() {
        let raw = "[ti:Test Song]\r\n[00:01.12]First line\r\n[00:05]Second line\n";
        let lines = parse_lyrics(raw);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].timestamp, 1);
        assert_eq!(lines[0].sub_second_ms, 120);
        assert_eq!(lines[0].text, "First line");
        assert_eq!(lines[1].timestamp, 5);
        assert_eq!(lines[1].sub_second_ms, 0);
    }

    #[test]
    fn test_normalize_sub_second() {
        assert_eq!(normalize_sub_second("5"), 500);
        assert_eq!(normalize_sub_second("50"), 500);
        assert_eq!(normalize_sub_second("123"), 123);
        assert_eq!(normalize_sub_second("1234"), 123);
    }

    #[test]
    fn test_stringify_lyrics() {
        let lines = parse_lyrics("[01&#58;02&#46;50]Hello&#32;&#40;Live&#41;&#10;");
        let output = stringify_lyrics(&lines);
        assert_eq!(output, "[01&#58;02&#46;50]Hello&#32;&#40;Live&#41;&#10;");
        assert_eq!(parse_lyrics(&output), lines);
    }
}
