use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text;
use crate::ExtractError;

/// A single timed chunk of transcript text.
///
/// Start times are non-negative seconds and non-decreasing across a talk's
/// segment sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start_time: f64,

    /// Cleaned segment text (never empty)
    pub text: String,
}

/// A complete extraction result for one TED talk URL.
///
/// Exactly one of two shapes is ever produced: a successful record carrying
/// title and transcript, or a failed record carrying an error message and
/// defaults everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Talk {
    /// Canonical source URL
    pub url: String,

    /// Talk title, empty string if unavailable
    pub title: String,

    /// Presenter display name, empty string if unavailable
    pub speaker: String,

    /// Talk description, empty string if unavailable
    pub description: String,

    /// Runtime in seconds, if known
    pub duration_seconds: Option<u64>,

    /// View count, if known
    pub views: Option<u64>,

    /// Transcript language code (e.g. "en"), empty string if unavailable
    #[serde(default)]
    pub language: String,

    /// Full transcript: cleaned segment texts joined with single spaces
    pub transcript: String,

    /// Timed transcript segments in spoken order
    pub segments: Vec<TranscriptSegment>,

    /// Whitespace-delimited token count of the cleaned transcript
    pub word_count: usize,

    /// Whether extraction completed without a fatal error
    pub success: bool,

    /// Error description, present iff `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Timestamp of the extraction attempt (ISO-8601 in JSON output)
    pub extracted_at: DateTime<Utc>,
}

impl Talk {
    /// Build a failed record for `url` from a pipeline error.
    ///
    /// All content fields stay at their defaults so a failed record can never
    /// masquerade as a partial success.
    pub fn failed(url: impl Into<String>, err: &ExtractError) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            speaker: String::new(),
            description: String::new(),
            duration_seconds: None,
            views: None,
            language: String::new(),
            transcript: String::new(),
            segments: Vec::new(),
            word_count: 0,
            success: false,
            error_message: Some(err.to_string()),
            extracted_at: Utc::now(),
        }
    }

    /// Estimated reading time in minutes at the given reading speed.
    pub fn reading_time_minutes(&self, words_per_minute: f64) -> f64 {
        text::reading_time_minutes(self.word_count, words_per_minute)
    }
}
