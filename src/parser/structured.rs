//! Primary extraction path: the JSON data blob embedded in the page.
//!
//! TED renders with Next.js, which serializes page state into
//! `<script type="application/json">` tags (notably `__NEXT_DATA__`). Talk
//! metadata lives under `props.pageProps.videoData` and the transcript under
//! `props.pageProps.transcriptData.translation.paragraphs[].cues[]`.

use scraper::{Html, Selector};
use serde_json::Value;

use super::{PageSource, RawSegment, TalkMetadata};

pub struct StructuredDataSource;

impl StructuredDataSource {
    /// Every parseable JSON blob in the page, in document order.
    ///
    /// Malformed blobs are skipped; an unrelated script failing to parse must
    /// not cost us the one that holds the talk data.
    fn json_blobs(doc: &Html) -> Vec<Value> {
        let selector =
            Selector::parse(r#"script[type="application/json"]"#).expect("static selector");

        doc.select(&selector)
            .filter_map(|el| serde_json::from_str(&el.text().collect::<String>()).ok())
            .collect()
    }

    fn page_props(blob: &Value) -> &Value {
        &blob["props"]["pageProps"]
    }

    fn metadata_from_blob(blob: &Value) -> Option<TalkMetadata> {
        let video_data = &Self::page_props(blob)["videoData"];
        if !video_data.is_object() {
            return None;
        }

        let title = video_data["title"].as_str().unwrap_or_default().to_string();
        if title.is_empty() {
            return None;
        }

        Some(TalkMetadata {
            title,
            speaker: video_data["presenterDisplayName"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            description: video_data["description"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            duration_seconds: video_data["duration"].as_u64(),
            views: video_data["viewedCount"].as_u64(),
        })
    }

    fn segments_from_blob(blob: &Value) -> Option<Vec<RawSegment>> {
        let paragraphs = Self::page_props(blob)["transcriptData"]["translation"]["paragraphs"]
            .as_array()?;

        let mut segments = Vec::new();
        let mut last_start = 0.0_f64;
        for paragraph in paragraphs {
            let Some(cues) = paragraph["cues"].as_array() else {
                continue;
            };
            for cue in cues {
                let Some(text) = cue["text"].as_str() else {
                    continue;
                };
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                // Blobs occasionally carry cues out of order; clamp so start
                // times stay non-decreasing across the sequence.
                last_start = Self::cue_start_seconds(cue).max(last_start);
                segments.push(RawSegment {
                    start_time: last_start,
                    text: text.to_string(),
                });
            }
        }

        (!segments.is_empty()).then_some(segments)
    }

    /// Cue start in seconds. Older blobs carry `startTime` in seconds, newer
    /// ones `time` in milliseconds.
    fn cue_start_seconds(cue: &Value) -> f64 {
        if let Some(seconds) = cue["startTime"].as_f64() {
            return seconds.max(0.0);
        }
        if let Some(millis) = cue["time"].as_f64() {
            return (millis / 1000.0).max(0.0);
        }
        0.0
    }
}

impl PageSource for StructuredDataSource {
    fn name(&self) -> &'static str {
        "structured_data"
    }

    fn metadata(&self, doc: &Html) -> Option<TalkMetadata> {
        Self::json_blobs(doc)
            .iter()
            .find_map(Self::metadata_from_blob)
    }

    fn segments(&self, doc: &Html) -> Option<Vec<RawSegment>> {
        Self::json_blobs(doc)
            .iter()
            .find_map(Self::segments_from_blob)
    }

    fn language(&self, doc: &Html) -> Option<String> {
        Self::json_blobs(doc).iter().find_map(|blob| {
            Self::page_props(blob)["transcriptData"]["translation"]["language"]["languageCode"]
                .as_str()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_requires_title() {
        let html = r#"<html><head><script type="application/json">
{"props":{"pageProps":{"videoData":{"viewedCount":5}}}}
</script></head></html>"#;
        let doc = Html::parse_document(html);

        assert!(StructuredDataSource.metadata(&doc).is_none());
    }

    #[test]
    fn test_missing_optional_fields_degrade_to_defaults() {
        let html = r#"<html><head><script type="application/json">
{"props":{"pageProps":{"videoData":{"title":"Just a title"}}}}
</script></head></html>"#;
        let doc = Html::parse_document(html);

        let metadata = StructuredDataSource.metadata(&doc).unwrap();
        assert_eq!(metadata.title, "Just a title");
        assert_eq!(metadata.speaker, "");
        assert_eq!(metadata.duration_seconds, None);
        assert_eq!(metadata.views, None);
    }

    #[test]
    fn test_cue_start_units() {
        let seconds_cue: Value = serde_json::json!({"startTime": 12.5});
        let millis_cue: Value = serde_json::json!({"time": 12500});
        let bare_cue: Value = serde_json::json!({"text": "hi"});

        assert_eq!(StructuredDataSource::cue_start_seconds(&seconds_cue), 12.5);
        assert_eq!(StructuredDataSource::cue_start_seconds(&millis_cue), 12.5);
        assert_eq!(StructuredDataSource::cue_start_seconds(&bare_cue), 0.0);
    }

    #[test]
    fn test_out_of_order_cues_are_clamped() {
        let html = r#"<html><head><script type="application/json">
{"props":{"pageProps":{"transcriptData":{"translation":{"paragraphs":[
  {"cues":[{"text":"Late cue first.","time":9000},
           {"text":"Early cue second.","time":1000},
           {"text":"Back in order.","time":12000}]}
]}}}}}
</script></head></html>"#;
        let doc = Html::parse_document(html);

        let segments = StructuredDataSource.segments(&doc).unwrap();
        let starts: Vec<f64> = segments.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![9.0, 9.0, 12.0]);
        for pair in starts.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_blank_cues_are_skipped() {
        let html = r#"<html><head><script type="application/json">
{"props":{"pageProps":{"transcriptData":{"translation":{"paragraphs":[
  {"cues":[{"text":"  ","time":0},{"text":"Real words","time":1000}]}
]}}}}}
</script></head></html>"#;
        let doc = Html::parse_document(html);

        let segments = StructuredDataSource.segments(&doc).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Real words");
        assert_eq!(segments[0].start_time, 1.0);
    }
}
