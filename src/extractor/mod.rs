//! The extraction pipeline: URL validation, fetch, parse, normalize.
//!
//! Failures at any stage are converted into failed [`Talk`] records rather
//! than propagated, so batch callers always get one record per input URL.

use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::model::Talk;
use crate::parser;
use crate::text;
use crate::utils::validate_talk_url;
use crate::ExtractError;

/// Progress callback for batch extraction: (completed, total, last record).
pub type ProgressCallback<'a> = &'a (dyn Fn(usize, usize, &Talk) + Send + Sync);

/// Sequential TED talk extractor.
pub struct TalkExtractor {
    fetcher: Box<dyn PageFetcher>,
}

impl TalkExtractor {
    /// Build an extractor with an HTTP fetcher from the given configuration.
    pub fn new(config: &Config) -> crate::Result<Self> {
        config.validate()?;

        Ok(Self {
            fetcher: Box::new(HttpFetcher::new(config)?),
        })
    }

    /// Build an extractor around an arbitrary fetcher (tests, replay).
    pub fn with_fetcher(fetcher: Box<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Extract one talk. Expected failures come back as a failed record, not
    /// an `Err`.
    pub async fn extract_single(&self, url: &str) -> Talk {
        match self.try_extract(url).await {
            Ok(talk) => {
                info!(
                    url = %talk.url,
                    words = talk.word_count,
                    segments = talk.segments.len(),
                    "extracted transcript"
                );
                talk
            }
            Err((url, err)) => {
                warn!(url = %url, error = %err, "extraction failed");
                Talk::failed(url, &err)
            }
        }
    }

    /// Extract a list of talks strictly sequentially, one record per URL in
    /// input order. The fetch layer's built-in delay is the only pacing.
    pub async fn extract_batch(
        &self,
        urls: &[String],
        progress: Option<ProgressCallback<'_>>,
    ) -> Vec<Talk> {
        let total = urls.len();
        info!(total, "starting batch extraction");

        let mut results = Vec::with_capacity(total);
        for (index, url) in urls.iter().enumerate() {
            let talk = self.extract_single(url).await;
            if let Some(callback) = progress {
                callback(index + 1, total, &talk);
            }
            results.push(talk);
        }

        let successful = results.iter().filter(|t| t.success).count();
        info!(successful, total, "batch extraction completed");

        results
    }

    /// The pipeline proper. The error side carries the best-known URL for the
    /// failed record: canonical once validation passed, raw input before.
    async fn try_extract(&self, raw_url: &str) -> Result<Talk, (String, ExtractError)> {
        let url = validate_talk_url(raw_url).map_err(|e| (raw_url.to_string(), e))?;
        let canonical = url.to_string();

        let html = self
            .fetcher
            .fetch_page(&url)
            .await
            .map_err(|e| (canonical.clone(), e))?;

        let page = parser::parse_page(&html).map_err(|e| (canonical.clone(), e))?;

        let (segments, transcript) = text::assemble(page.segments);
        if transcript.is_empty() {
            return Err((
                canonical,
                ExtractError::Parse("no transcript found".into()),
            ));
        }

        let word_count = text::word_count(&transcript);

        Ok(Talk {
            url: canonical,
            title: page.metadata.title,
            speaker: page.metadata.speaker,
            description: page.metadata.description,
            duration_seconds: page.metadata.duration_seconds,
            views: page.metadata.views,
            language: page.language,
            transcript,
            segments,
            word_count,
            success: true,
            error_message: None,
            extracted_at: Utc::now(),
        })
    }
}
