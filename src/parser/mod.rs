//! Page parsing: recover talk metadata and transcript segments from raw HTML.
//!
//! TED pages carry a structured JSON blob alongside the rendered markup, and
//! the markup conventions drift over time. Each extraction path is a
//! [`PageSource`]; sources are tried in priority order, independently for
//! metadata and for segments, so a page can yield metadata from the JSON blob
//! and segments from the markup (or vice versa) without losing usable data.

use scraper::Html;
use tracing::debug;

use crate::ExtractError;

pub mod markup;
pub mod structured;

pub use markup::MarkupSource;
pub use structured::StructuredDataSource;

/// Metadata recovered from a talk page. Missing fields degrade to defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TalkMetadata {
    pub title: String,
    pub speaker: String,
    pub description: String,
    pub duration_seconds: Option<u64>,
    pub views: Option<u64>,
}

/// An uncleaned transcript segment as found in the page.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    /// Start time in seconds
    pub start_time: f64,
    pub text: String,
}

/// Everything a page yielded, before text normalization.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub metadata: TalkMetadata,
    pub segments: Vec<RawSegment>,
    /// Transcript language code (e.g. "en"), empty if the page does not say
    pub language: String,
}

/// One way of reading a talk page.
///
/// Implementations return `None` (rather than an error) when their data shape
/// is absent, so the caller can fall through to the next source.
pub trait PageSource {
    fn name(&self) -> &'static str;

    /// Metadata, if this source finds at least a title.
    fn metadata(&self, doc: &Html) -> Option<TalkMetadata>;

    /// Transcript segments in spoken order, if this source finds any.
    fn segments(&self, doc: &Html) -> Option<Vec<RawSegment>>;

    /// Transcript language code, if this source carries one.
    fn language(&self, _doc: &Html) -> Option<String> {
        None
    }
}

/// Parse a talk page, trying the structured-data path first and the
/// markup-scan path as fallback.
///
/// Fails with [`ExtractError::Parse`] only when neither source finds a title
/// nor any transcript content; individual missing fields are not fatal.
pub fn parse_page(html: &str) -> Result<ParsedPage, ExtractError> {
    let doc = Html::parse_document(html);

    let sources: [&dyn PageSource; 2] = [&StructuredDataSource, &MarkupSource];

    let mut metadata: Option<TalkMetadata> = None;
    let mut segments: Option<Vec<RawSegment>> = None;
    let mut language: Option<String> = None;

    for source in sources {
        if metadata.is_none() {
            if let Some(found) = source.metadata(&doc) {
                debug!(source = source.name(), title = %found.title, "metadata found");
                metadata = Some(found);
            }
        }
        if segments.is_none() {
            if let Some(found) = source.segments(&doc) {
                debug!(source = source.name(), count = found.len(), "segments found");
                segments = Some(found);
            }
        }
        if language.is_none() {
            language = source.language(&doc);
        }
    }

    let metadata = metadata.unwrap_or_default();
    let segments = segments.unwrap_or_default();

    if metadata.title.is_empty() && segments.is_empty() {
        return Err(ExtractError::Parse(
            "neither structured data nor markup yielded a title or transcript".into(),
        ));
    }

    Ok(ParsedPage {
        metadata,
        segments,
        language: language.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Fallback title | TED</title></head><body>
<script type="application/json" id="__NEXT_DATA__">
{"props":{"pageProps":{
  "videoData":{"title":"The power of listening","presenterDisplayName":"Jane Doe",
    "description":"Why listening matters.","duration":754,"viewedCount":1234567},
  "transcriptData":{"translation":{"language":{"languageCode":"en"},"paragraphs":[
    {"cues":[{"text":"So here's the thing.","time":0},
             {"text":"We rarely listen.","time":4200}]},
    {"cues":[{"text":"(Applause)","time":9000},
             {"text":"Thank you.","time":12500}]}
  ]}}}}}
</script>
</body></html>"#;

    const MARKUP_ONLY_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en-GB"><head>
<title>An older talk | TED Talk</title>
<meta property="og:title" content="An older talk">
<meta name="author" content="John Smith">
<meta property="og:description" content="A talk from the archive.">
</head><body>
<div class="talk-transcript">
  <span class="talk-transcript__para__text">First paragraph of speech.</span>
  <span class="talk-transcript__para__text">Second paragraph of speech.</span>
</div>
</body></html>"#;

    const EMPTY_PAGE: &str = "<!DOCTYPE html><html><head></head><body><p>404</p></body></html>";

    #[test]
    fn test_structured_page_parses_metadata_and_segments() {
        let page = parse_page(STRUCTURED_PAGE).unwrap();

        assert_eq!(page.metadata.title, "The power of listening");
        assert_eq!(page.metadata.speaker, "Jane Doe");
        assert_eq!(page.metadata.duration_seconds, Some(754));
        assert_eq!(page.metadata.views, Some(1234567));
        assert_eq!(page.language, "en");

        assert_eq!(page.segments.len(), 4);
        assert_eq!(page.segments[0].text, "So here's the thing.");
        assert_eq!(page.segments[1].start_time, 4.2);
        // monotonically non-decreasing start times
        for pair in page.segments.windows(2) {
            assert!(pair[0].start_time <= pair[1].start_time);
        }
    }

    #[test]
    fn test_markup_fallback_when_no_json_blob() {
        let page = parse_page(MARKUP_ONLY_PAGE).unwrap();

        assert_eq!(page.metadata.title, "An older talk");
        assert_eq!(page.metadata.speaker, "John Smith");
        assert_eq!(page.metadata.duration_seconds, None);
        assert_eq!(page.language, "en-GB");

        assert_eq!(page.segments.len(), 2);
        assert_eq!(page.segments[0].text, "First paragraph of speech.");
    }

    #[test]
    fn test_mixed_sources() {
        // JSON blob carries metadata but no transcript; markup carries cues.
        let html = r#"<html><head>
<script type="application/json">
{"props":{"pageProps":{"videoData":{"title":"Mixed talk","presenterDisplayName":"A. Speaker"}}}}
</script>
</head><body>
<span class="talk-transcript__para__text">Spoken words here.</span>
</body></html>"#;

        let page = parse_page(html).unwrap();
        assert_eq!(page.metadata.title, "Mixed talk");
        assert_eq!(page.segments.len(), 1);
        assert_eq!(page.segments[0].text, "Spoken words here.");
        // No language anywhere on this page
        assert_eq!(page.language, "");
    }

    #[test]
    fn test_malformed_json_falls_through() {
        let html = r#"<html><head>
<script type="application/json">{not valid json</script>
<meta property="og:title" content="Still recoverable">
</head><body>
<span class="talk-transcript__para__text">Words.</span>
</body></html>"#;

        let page = parse_page(html).unwrap();
        assert_eq!(page.metadata.title, "Still recoverable");
        assert_eq!(page.segments.len(), 1);
    }

    #[test]
    fn test_unparseable_page_is_parse_error() {
        let err = parse_page(EMPTY_PAGE).unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }
}
