use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::errors::FetchError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Something that can GET a page and hand back its body.
///
/// `HttpFetcher` is the plain implementation. A client that also satisfies
/// lightweight bot-detection challenges can implement this trait and be used
/// in its place.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP client with browser-like default headers. Build one per
/// batch; it keeps its connection pool across requests.
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).context("Invalid user agent header value")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            action = "configure",
            component = "http_client",
            timeout_secs = config.timeout.as_secs(),
            user_agent = user_agent,
            "HTTP client ready"
        );

        Ok(Self {
            client,
            timeout_secs: config.timeout.as_secs(),
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout_secs,
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url: url.to_string(),
            });
        }

        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout_secs,
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        debug!(
            action = "fetched",
            component = "http_client",
            url = url,
            status = status.as_u16(),
            bytes = body.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Page fetched"
        );
        Ok(body)
    }
}
