//! Line parser: raw line in, event (or a reason to skip it) out.

use openset_core::{Event, parse_event};

/// What to do with one raw line.
#[derive(Debug)]
pub enum ParseOutcome {
    /// A JSON object, ready to queue.
    Event(Event),
    /// Empty or whitespace-only; skipped silently.
    Blank,
    /// Not JSON, or JSON that is not an object; logged and skipped.
    Malformed(openset_core::Error),
}

/// Classify a line. Never fails: malformed input is a value, not an error.
pub fn parse_line(line: &[u8]) -> ParseOutcome {
    if line.iter().all(u8::is_ascii_whitespace) {
        return ParseOutcome::Blank;
    }

    match parse_event(line) {
        Ok(event) => ParseOutcome::Event(event),
        Err(e) => ParseOutcome::Malformed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_line() {
        match parse_line(br#"{"person":"p1","event":"purchase","stamp":1}"#) {
            ParseOutcome::Event(event) => {
                assert_eq!(event.get("person"), Some(&json!("p1")));
            }
            other => panic!("expected event, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines() {
        assert!(matches!(parse_line(b""), ParseOutcome::Blank));
        assert!(matches!(parse_line(b"   \t "), ParseOutcome::Blank));
    }

    #[test]
    fn test_malformed_lines() {
        for line in [
            &b"{not json"[..],
            &b"[1,2,3]"[..],
            &b"\"just a string\""[..],
            &b"17"[..],
        ] {
            assert!(
                matches!(parse_line(line), ParseOutcome::Malformed(_)),
                "line {:?} should be malformed",
                String::from_utf8_lossy(line)
            );
        }
    }
}
