//! Error types for each stage of the relay.
//!
//! Only [`PipelineError`] aborts a whole run. Everything else is either
//! contained per article by the pipeline or, for translation, swallowed by
//! [`crate::translate::translate_or_passthrough`].

use thiserror::Error;

/// Failures while fetching or parsing listing and article pages.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Page structure not found: {0}")]
    StructureNotFound(&'static str),
}

/// Failures reported by a translation provider.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The provider answered but had no translation for the text. Terminal.
    #[error("translation not found")]
    NotFound,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation provider returned status {0}")]
    HttpStatus(u16),

    #[error("malformed translation response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Conditions that end a run before any article is processed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("link discovery failed: {0}")]
    Discovery(#[source] ScrapeError),

    #[error("loading processed links failed: {0}")]
    Store(#[source] StoreError),
}

/// Failures that abandon a single article. The run moves on to the next URL
/// and the article stays unrecorded.
#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("scraping failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("publishing failed: {0}")]
    Publish(#[from] PublishError),

    #[error("recording failed: {0}")]
    Record(#[from] StoreError),
}
