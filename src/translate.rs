//! Text translation with fixed-delay retry and pass-through fallback.
//!
//! # Architecture
//!
//! - [`Translate`]: core trait, one text in, one translation out
//! - [`GoogleTranslate`]: talks to Google's public `translate_a/single` endpoint
//! - [`RetryTranslate`]: decorator that retries generic failures
//! - [`translate_or_passthrough`]: never fails; returns the input on any error
//!
//! # Retry Strategy
//!
//! - 3 attempts in total
//! - Fixed 2 second pause between attempts
//! - [`TranslateError::NotFound`] is terminal and never retried

use crate::error::TranslateError;
use crate::utils::truncate_for_log;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Trait for async text translation into a fixed target language.
pub trait Translate {
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;
}

/// Google Translate client. Source language is always auto-detected.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: reqwest::Client,
    endpoint: String,
    target: String,
}

impl GoogleTranslate {
    pub fn new(client: reqwest::Client, target: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            target: target.into(),
        }
    }

    fn request_url(&self, text: &str) -> String {
        format!(
            "{}?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.endpoint,
            urlencoding::encode(&self.target),
            urlencoding::encode(text)
        )
    }
}

impl Translate for GoogleTranslate {
    #[instrument(level = "debug", skip_all, fields(target = %self.target))]
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let response = self.client.get(self.request_url(text)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await?;
        parse_translation_response(&body)
    }
}

/// Decode a `translate_a/single` response body.
///
/// The first element is a list of `[translated, original, ...]` sentence
/// pairs; the translated halves concatenate into the full translation. A
/// response without any translated sentence means "not found".
pub fn parse_translation_response(body: &str) -> Result<String, TranslateError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TranslateError::Malformed(e.to_string()))?;
    let top = value
        .as_array()
        .ok_or_else(|| TranslateError::Malformed("expected a JSON array".to_string()))?;

    let translated: String = top
        .first()
        .and_then(Value::as_array)
        .map(|sentences| {
            sentences
                .iter()
                .filter_map(|s| s.get(0).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if translated.is_empty() {
        Err(TranslateError::NotFound)
    } else {
        Ok(translated)
    }
}

/// Wrapper that retries any [`Translate`] implementation with a fixed delay.
pub struct RetryTranslate<T> {
    inner: T,
    /// Total attempts, including the first one.
    max_attempts: usize,
    delay: Duration,
}

impl<T: Translate> RetryTranslate<T> {
    pub fn new(inner: T, max_attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Three attempts, two seconds apart.
    pub fn with_defaults(inner: T) -> Self {
        Self::new(inner, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl<T> fmt::Debug for RetryTranslate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTranslate")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T: Translate> Translate for RetryTranslate<T> {
    #[instrument(level = "debug", skip_all)]
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match self.inner.translate(text).await {
                Ok(translated) => return Ok(translated),
                Err(TranslateError::NotFound) => return Err(TranslateError::NotFound),
                Err(e) if attempt >= self.max_attempts => {
                    error!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_total = t0.elapsed().as_millis(),
                        error = %e,
                        "translate() exhausted retries"
                    );
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        delay = ?self.delay,
                        error = %e,
                        "translate() attempt failed; retrying"
                    );
                    sleep(self.delay).await;
                }
            }
        }
    }
}

/// Translate `text`, falling back to the untranslated text on any failure.
///
/// Whitespace-only input is returned as is without calling the provider.
pub async fn translate_or_passthrough<T: Translate>(translator: &T, text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    match translator.translate(text).await {
        Ok(translated) => {
            debug!(translated = %truncate_for_log(&translated, 80), "Translated segment");
            translated
        }
        Err(TranslateError::NotFound) => {
            warn!(text = %truncate_for_log(text, 80), "Translation not found; passing text through");
            text.to_string()
        }
        Err(e) => {
            warn!(error = %e, text = %truncate_for_log(text, 80), "Translation failed; passing text through");
            text.to_string()
        }
    }
}
