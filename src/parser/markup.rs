//! Fallback extraction path: scan the rendered markup.
//!
//! Used when the JSON blob is absent or malformed. Metadata comes from
//! standard meta tags, transcript cues from the element conventions TED has
//! used across site revisions. Markup rarely carries timing, so start times
//! fall back to the last one seen (keeping the sequence non-decreasing).

use scraper::{ElementRef, Html, Selector};

use super::{PageSource, RawSegment, TalkMetadata};

/// Transcript cue selectors, newest convention first.
const CUE_SELECTORS: &[&str] = &[
    "[data-transcript-cue]",
    "span.talk-transcript__para__text",
    "div.talk-transcript p",
];

pub struct MarkupSource;

impl MarkupSource {
    fn meta_content(doc: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        doc.select(&selector)
            .next()?
            .value()
            .attr("content")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn title(doc: &Html) -> Option<String> {
        if let Some(title) = Self::meta_content(doc, r#"meta[property="og:title"]"#) {
            return Some(title);
        }

        // <title> carries a " | TED" style suffix
        let selector = Selector::parse("title").expect("static selector");
        let raw = doc.select(&selector).next()?.text().collect::<String>();
        let title = raw.split('|').next().unwrap_or(&raw).trim().to_string();
        (!title.is_empty()).then_some(title)
    }

    fn description(doc: &Html) -> String {
        Self::meta_content(doc, r#"meta[property="og:description"]"#)
            .or_else(|| Self::meta_content(doc, r#"meta[name="description"]"#))
            .unwrap_or_default()
    }

    fn speaker(doc: &Html) -> String {
        Self::meta_content(doc, r#"meta[name="author"]"#).unwrap_or_default()
    }

    fn duration(doc: &Html) -> Option<u64> {
        Self::meta_content(doc, r#"meta[property="og:video:duration"]"#)?
            .parse()
            .ok()
    }

    fn cue_start(element: &ElementRef, last_start: f64) -> f64 {
        element
            .value()
            .attr("data-start")
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|start| *start >= last_start)
            .unwrap_or(last_start)
    }
}

impl PageSource for MarkupSource {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn metadata(&self, doc: &Html) -> Option<TalkMetadata> {
        let title = Self::title(doc)?;

        Some(TalkMetadata {
            title,
            speaker: Self::speaker(doc),
            description: Self::description(doc),
            duration_seconds: Self::duration(doc),
            views: None,
        })
    }

    fn segments(&self, doc: &Html) -> Option<Vec<RawSegment>> {
        for raw_selector in CUE_SELECTORS {
            let selector = Selector::parse(raw_selector).expect("static selector");

            let mut segments = Vec::new();
            let mut last_start = 0.0;
            for element in doc.select(&selector) {
                let text = element.text().collect::<String>();
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                last_start = Self::cue_start(&element, last_start);
                segments.push(RawSegment {
                    start_time: last_start,
                    text: text.to_string(),
                });
            }

            if !segments.is_empty() {
                return Some(segments);
            }
        }
        None
    }

    fn language(&self, doc: &Html) -> Option<String> {
        let selector = Selector::parse("html[lang]").expect("static selector");
        doc.select(&selector)
            .next()?
            .value()
            .attr("lang")
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_og_meta() {
        let html = r#"<html><head>
<title>From title tag | TED</title>
<meta property="og:title" content="From og meta">
</head></html>"#;
        let doc = Html::parse_document(html);

        assert_eq!(MarkupSource::title(&doc).unwrap(), "From og meta");
    }

    #[test]
    fn test_title_tag_suffix_is_stripped() {
        let html = "<html><head><title>A talk about maps | TED Talk</title></head></html>";
        let doc = Html::parse_document(html);

        assert_eq!(MarkupSource::title(&doc).unwrap(), "A talk about maps");
    }

    #[test]
    fn test_no_title_no_metadata() {
        let doc = Html::parse_document("<html><head></head><body></body></html>");
        assert!(MarkupSource.metadata(&doc).is_none());
    }

    #[test]
    fn test_cue_start_times_are_non_decreasing() {
        let html = r#"<html><body>
<p data-transcript-cue data-start="0">One.</p>
<p data-transcript-cue data-start="5.5">Two.</p>
<p data-transcript-cue>Three.</p>
<p data-transcript-cue data-start="2">Out of order.</p>
</body></html>"#;
        let doc = Html::parse_document(html);

        let segments = MarkupSource.segments(&doc).unwrap();
        let starts: Vec<f64> = segments.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![0.0, 5.5, 5.5, 5.5]);
    }

    #[test]
    fn test_legacy_cue_selector() {
        let html = r#"<html><body>
<span class="talk-transcript__para__text">Legacy cue text.</span>
</body></html>"#;
        let doc = Html::parse_document(html);

        let segments = MarkupSource.segments(&doc).unwrap();
        assert_eq!(segments[0].text, "Legacy cue text.");
        assert_eq!(segments[0].start_time, 0.0);
    }

    #[test]
    fn test_og_video_duration() {
        let html = r#"<html><head>
<meta property="og:title" content="T">
<meta property="og:video:duration" content="754">
</head></html>"#;
        let doc = Html::parse_document(html);

        let metadata = MarkupSource.metadata(&doc).unwrap();
        assert_eq!(metadata.duration_seconds, Some(754));
    }
}
