//! Transcript text normalization.
//!
//! Pure functions: no I/O, deterministic, and idempotent under repeated
//! cleaning.

use regex::Regex;

use crate::model::TranscriptSegment;
use crate::parser::RawSegment;

/// Default reading speed used for reading-time estimates.
pub const DEFAULT_WORDS_PER_MINUTE: f64 = 200.0;

/// Non-speech annotation markers TED injects between cues.
const ARTIFACT_PATTERN: &str =
    r"(?i)\((?:applause|laughter|music|cheering|cheers(?: and applause)?|audio|video)\)";

/// Clean a single raw segment text.
///
/// Strips non-speech annotations, collapses whitespace runs to single spaces
/// and trims the ends. A segment that carries nothing but annotations cleans
/// to the empty string.
pub fn clean_segment(text: &str) -> String {
    let artifacts = Regex::new(ARTIFACT_PATTERN).expect("static regex");
    let stripped = artifacts.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean raw segments into final transcript segments plus the joined transcript.
///
/// Segments that clean to empty are dropped; survivors keep their original
/// order and start times. The transcript is the space-joined concatenation of
/// the surviving texts.
pub fn assemble(raw_segments: Vec<RawSegment>) -> (Vec<TranscriptSegment>, String) {
    let mut segments = Vec::with_capacity(raw_segments.len());

    for raw in raw_segments {
        let cleaned = clean_segment(&raw.text);
        if cleaned.is_empty() {
            continue;
        }
        segments.push(TranscriptSegment {
            start_time: raw.start_time,
            text: cleaned,
        });
    }

    let transcript = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    (segments, transcript)
}

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time in minutes at `words_per_minute`.
pub fn reading_time_minutes(word_count: usize, words_per_minute: f64) -> f64 {
    if words_per_minute <= 0.0 {
        return 0.0;
    }
    word_count as f64 / words_per_minute
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start_time: f64, text: &str) -> RawSegment {
        RawSegment {
            start_time,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean_segment("hello   world\n"), "hello world");
        assert_eq!(clean_segment("  spaced\tout  "), "spaced out");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean_segment(" So  here's (Laughter) the thing. ");
        assert_eq!(clean_segment(&once), once);
    }

    #[test]
    fn test_clean_strips_artifacts() {
        assert_eq!(clean_segment("(Applause)"), "");
        assert_eq!(clean_segment("(laughter)"), "");
        assert_eq!(
            clean_segment("Thank you. (Cheers and applause) Thank you."),
            "Thank you. Thank you."
        );
    }

    #[test]
    fn test_assemble_drops_empty_segments() {
        let (segments, transcript) = assemble(vec![
            raw(0.0, "First part."),
            raw(4.2, "(Applause)"),
            raw(8.0, "  second   part  "),
        ]);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "First part.");
        assert_eq!(segments[1].start_time, 8.0);
        assert_eq!(transcript, "First part. second part");
    }

    #[test]
    fn test_word_count_and_reading_time() {
        assert_eq!(word_count(&clean_segment("hello   world\n")), 2);

        let four_hundred_words = vec!["word"; 400].join(" ");
        let count = word_count(&four_hundred_words);
        assert_eq!(reading_time_minutes(count, DEFAULT_WORDS_PER_MINUTE), 2.0);
    }
}
