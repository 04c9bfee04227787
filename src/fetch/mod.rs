//! HTTP fetch layer: timeouts, retries with exponential backoff, and the
//! inter-request delay that rate-limits sequential extraction.
//!
//! The retry loop keeps its state explicit (attempt counter, computed delay)
//! and sleeps through the [`Sleeper`] seam, so the backoff schedule is unit
//! testable without real waiting or a network.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::ExtractError;

/// Default browser-style user agent (TED serves a reduced page to obvious bots).
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// First retry waits this long; each further retry doubles it.
const BASE_BACKOFF: Duration = Duration::from_secs(1);

/// Backoff ceiling so a long retry chain cannot stall a batch for minutes.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Fetches a talk page body for a validated URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &Url) -> Result<String, ExtractError>;
}

/// Clock abstraction: production sleeps on the tokio timer, tests record the
/// requested durations instead.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// One GET attempt, with the outcome already classified into [`ExtractError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<String, ExtractError>;
}

struct ReqwestTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<String, ExtractError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout(self.timeout_secs)
            } else {
                ExtractError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                ExtractError::Timeout(self.timeout_secs)
            } else {
                ExtractError::Network(e.to_string())
            }
        })
    }
}

/// HTTP page fetcher with retry, backoff and built-in request pacing.
pub struct HttpFetcher {
    transport: Box<dyn Transport>,
    sleeper: Box<dyn Sleeper>,
    max_retries: u32,
    request_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            transport: Box::new(ReqwestTransport {
                client,
                timeout_secs: config.timeout_secs,
            }),
            sleeper: Box::new(TokioSleeper),
            max_retries: config.max_retries,
            request_delay: Duration::from_secs_f64(config.delay_between_requests),
        })
    }

    #[cfg(test)]
    fn with_parts(
        transport: Box<dyn Transport>,
        sleeper: Box<dyn Sleeper>,
        max_retries: u32,
        request_delay: Duration,
    ) -> Self {
        Self {
            transport,
            sleeper,
            max_retries,
            request_delay,
        }
    }

    /// Backoff before retry number `attempt + 1` (doubling from [`BASE_BACKOFF`]).
    pub fn backoff_delay(attempt: u32) -> Duration {
        let exp = attempt.min(30); // avoid shift overflow on absurd retry counts
        (BASE_BACKOFF * 2u32.pow(exp)).min(MAX_BACKOFF)
    }

    async fn fetch_with_retries(&self, url: &Url) -> Result<String, ExtractError> {
        let mut attempt = 0;
        loop {
            match self.transport.get(url).await {
                Ok(body) => {
                    debug!(url = %url, bytes = body.len(), attempt, "page fetched");
                    return Ok(body);
                }
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let backoff = Self::backoff_delay(attempt);
                    warn!(
                        url = %url,
                        attempt = attempt + 1,
                        backoff_secs = backoff.as_secs(),
                        error = %err,
                        "transient fetch failure, retrying"
                    );
                    self.sleeper.sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(url = %url, attempts = attempt + 1, error = %err, "fetch failed");
                    return Err(err);
                }
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetch a page, then apply the inter-request delay regardless of outcome
    /// so sequential callers are throttled with no extra bookkeeping.
    async fn fetch_page(&self, url: &Url) -> Result<String, ExtractError> {
        let result = self.fetch_with_retries(url).await;

        if !self.request_delay.is_zero() {
            self.sleeper.sleep(self.request_delay).await;
        }

        result
    }
}
