//! Render Talk records as JSON, CSV or human-readable text.

use anyhow::Result;

use crate::model::Talk;
use crate::utils::format_duration;

/// JSON array of talk records, pretty-printed, snake_case fields.
pub fn format_as_json(talks: &[Talk]) -> Result<String> {
    Ok(serde_json::to_string_pretty(talks)?)
}

/// CSV with one row per talk. Segments are flattened to a count column and
/// the transcript rides in a single quoted field.
pub fn format_as_csv(talks: &[Talk]) -> String {
    let mut out = String::from(
        "url,title,speaker,language,duration_seconds,views,segment_count,word_count,success,error_message,transcript\n",
    );

    for talk in talks {
        let row = [
            csv_field(&talk.url),
            csv_field(&talk.title),
            csv_field(&talk.speaker),
            csv_field(&talk.language),
            talk.duration_seconds.map(|d| d.to_string()).unwrap_or_default(),
            talk.views.map(|v| v.to_string()).unwrap_or_default(),
            talk.segments.len().to_string(),
            talk.word_count.to_string(),
            talk.success.to_string(),
            csv_field(talk.error_message.as_deref().unwrap_or("")),
            csv_field(&talk.transcript),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Human-readable block per talk: metadata lines, blank line, transcript.
pub fn format_as_txt(talks: &[Talk]) -> String {
    let mut out = String::new();

    for (index, talk) in talks.iter().enumerate() {
        out.push_str(&format!("=== Talk {} ===\n", index + 1));
        out.push_str(&format!("URL: {}\n", talk.url));

        if talk.success {
            out.push_str(&format!("Title: {}\n", display_or_unknown(&talk.title)));
            out.push_str(&format!("Speaker: {}\n", display_or_unknown(&talk.speaker)));
            if !talk.language.is_empty() {
                out.push_str(&format!("Language: {}\n", talk.language));
            }
            out.push_str(&format!(
                "Duration: {}\n",
                talk.duration_seconds
                    .map(format_duration)
                    .unwrap_or_else(|| "Unknown".to_string())
            ));
            out.push_str(&format!(
                "Views: {}\n",
                talk.views
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "Unknown".to_string())
            ));
            out.push_str(&format!("Words: {}\n", talk.word_count));
            out.push('\n');
            out.push_str(&talk.transcript);
        } else {
            out.push_str(&format!(
                "Error: {}\n",
                talk.error_message.as_deref().unwrap_or("unknown error")
            ));
        }

        out.push_str("\n\n");
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");
    }

    out
}

/// RFC 4180 quoting: wrap when the field contains a comma, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn display_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "Unknown"
    } else {
        value
    }
}
