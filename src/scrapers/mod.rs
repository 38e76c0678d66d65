//! Page fetching and the site scraper built on top of it.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing**: walk the listing pages and collect article URLs
//! 2. **Fetching**: download one article and split it into segments
//!
//! Network access goes through the [`Fetch`] trait so the scraper can be
//! driven by canned HTML in tests.

pub mod gktoday;

use crate::error::ScrapeError;
use tracing::{debug, instrument};

/// Something that can turn a URL into an HTML document.
pub trait Fetch {
    /// `GET` the URL and return the response body as text.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// [`Fetch`] over a plain `reqwest` client. No custom headers, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
