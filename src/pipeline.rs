//! One relay run: discover, filter, then scrape, translate, compose, publish
//! and record each new article in turn.
//!
//! All collaborators are injected, so a run owns its fetcher, translator,
//! publisher and store for exactly its own lifetime. Articles are handled
//! strictly one after another.

use crate::error::{ArticleError, PipelineError};
use crate::models::{ScrapedArticle, TranslatedSegment};
use crate::outputs::message::{compose, message_chunks};
use crate::outputs::telegram::{Publish, publish_chunks};
use crate::scrapers::Fetch;
use crate::scrapers::gktoday::{fetch_article, index_articles, should_skip_url};
use crate::store::LinkStore;
use crate::translate::{Translate, translate_or_passthrough};
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};

/// Fixed inputs of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub pages: usize,
    /// Footer appended to every message unit.
    pub footer: String,
}

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub discovered: usize,
    pub skipped_by_pattern: usize,
    pub already_seen: usize,
    pub published: usize,
    pub failed: usize,
}

/// Output of [`filter_new_urls`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilteredLinks {
    pub new_urls: Vec<String>,
    pub skipped_by_pattern: usize,
    pub already_seen: usize,
}

/// Drop quiz posts, already processed URLs and in-run duplicates, keeping the
/// discovery order of what remains.
pub fn filter_new_urls(discovered: &[String], seen: &HashSet<String>) -> FilteredLinks {
    let mut filtered = FilteredLinks::default();
    let mut queued = HashSet::new();

    for url in discovered {
        if should_skip_url(url) {
            filtered.skipped_by_pattern += 1;
        } else if seen.contains(url) {
            filtered.already_seen += 1;
        } else if queued.insert(url.as_str()) {
            filtered.new_urls.push(url.clone());
        }
    }
    filtered
}

pub struct Pipeline<F, T, P, S> {
    pub fetcher: F,
    pub translator: T,
    pub publisher: P,
    pub store: S,
    pub settings: Settings,
}

impl<F, T, P, S> Pipeline<F, T, P, S>
where
    F: Fetch,
    T: Translate,
    P: Publish,
    S: LinkStore,
{
    /// Run once over the configured listing pages.
    ///
    /// Only discovery and loading the seen set can fail the run; a failing
    /// article is logged, counted and left for the next run.
    #[instrument(level = "info", skip_all, fields(base_url = %self.settings.base_url, pages = self.settings.pages))]
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let discovered = index_articles(&self.fetcher, &self.settings.base_url, self.settings.pages)
            .await
            .map_err(PipelineError::Discovery)?;
        let seen = self.store.seen_urls().await.map_err(PipelineError::Store)?;
        let filtered = filter_new_urls(&discovered, &seen);

        let mut report = RunReport {
            discovered: discovered.len(),
            skipped_by_pattern: filtered.skipped_by_pattern,
            already_seen: filtered.already_seen,
            ..RunReport::default()
        };

        if filtered.new_urls.is_empty() {
            info!("No new URLs to scrape");
            return Ok(report);
        }

        info!(count = filtered.new_urls.len(), "New URLs to scrape");
        for (idx, url) in filtered.new_urls.iter().enumerate() {
            info!(index = idx + 1, %url, "New URL");
        }

        for url in &filtered.new_urls {
            info!(%url, "Scraping and sending");
            match self.process_article(url).await {
                Ok(()) => report.published += 1,
                Err(ArticleError::Scrape(e)) => {
                    warn!(%url, error = %e, "Skipping article");
                    report.failed += 1;
                }
                Err(e) => {
                    error!(%url, error = %e, "Article not completed; it will be retried next run");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    #[instrument(level = "info", skip(self))]
    async fn process_article(&self, url: &str) -> Result<(), ArticleError> {
        let article = fetch_article(&self.fetcher, url).await?;
        let (translated_heading, segments) = self.translate_article(&article).await;

        let message = compose(&article.heading, &translated_heading, &segments);
        let chunks = message_chunks(&message, &self.settings.footer);
        publish_chunks(&self.publisher, &chunks).await?;

        self.store.record(url).await?;
        Ok(())
    }

    async fn translate_article(&self, article: &ScrapedArticle) -> (String, Vec<TranslatedSegment>) {
        let heading = translate_or_passthrough(&self.translator, &article.heading).await;

        let mut segments = Vec::with_capacity(article.segments.len());
        for segment in &article.segments {
            let translated = if segment.role.is_translatable() {
                translate_or_passthrough(&self.translator, &segment.original).await
            } else {
                String::new()
            };
            segments.push(TranslatedSegment {
                role: segment.role,
                original: segment.original.clone(),
                translated,
            });
        }
        (heading, segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PublishError, ScrapeError, StoreError, TranslateError};
    use crate::outputs::message::promotion_footer;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BASE: &str = "https://www.gktoday.in/current-affairs/";

    struct FakeFetcher {
        pages: HashMap<String, String>,
    }

    impl Fetch for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScrapeError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    struct PrefixTranslator;

    impl Translate for PrefixTranslator {
        async fn translate(&self, text: &str) -> Result<String, TranslateError> {
            Ok(format!("GU:{text}"))
        }
    }

    #[derive(Default)]
    struct FakePublisher {
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    impl Publish for FakePublisher {
        async fn send(&self, text: &str) -> Result<(), PublishError> {
            if self.fail {
                return Err(teloxide::RequestError::Api(teloxide::ApiError::ChatNotFound).into());
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        urls: Mutex<Vec<String>>,
        writes: AtomicUsize,
    }

    impl MemoryStore {
        fn with(urls: &[&str]) -> Self {
            Self {
                urls: Mutex::new(urls.iter().map(|u| u.to_string()).collect()),
                writes: AtomicUsize::new(0),
            }
        }
    }

    impl LinkStore for MemoryStore {
        async fn seen_urls(&self) -> Result<HashSet<String>, StoreError> {
            Ok(self.urls.lock().unwrap().iter().cloned().collect())
        }

        async fn record(&self, url: &str) -> Result<bool, StoreError> {
            let mut urls = self.urls.lock().unwrap();
            if urls.iter().any(|u| u == url) {
                return Ok(false);
            }
            urls.push(url.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn listing(links: &[&str]) -> String {
        links
            .iter()
            .map(|l| format!(r#"<h1 id="list"><a href="{l}">title</a></h1>"#))
            .collect()
    }

    fn article(heading: &str, body: &str) -> String {
        format!(
            r#"<div class="inside_post column content_width"><h1 id="list">{heading}</h1>{body}<div class="prenext">nav</div></div>"#
        )
    }

    const QUIZ: &str = "https://www.gktoday.in/daily-current-affairs-quiz-august-7-2024/";
    const SEEN: &str = "https://www.gktoday.in/old-article/";
    const FRESH: &str = "https://www.gktoday.in/new-article/";

    fn pipeline(
        pages: &[(&str, String)],
        publisher: FakePublisher,
        store: MemoryStore,
    ) -> Pipeline<FakeFetcher, PrefixTranslator, FakePublisher, MemoryStore> {
        Pipeline {
            fetcher: FakeFetcher {
                pages: pages
                    .iter()
                    .map(|(u, h)| (u.to_string(), h.clone()))
                    .collect(),
            },
            translator: PrefixTranslator,
            publisher,
            store,
            settings: Settings {
                base_url: BASE.to_string(),
                pages: 1,
                footer: promotion_footer("https://telegram.me/currentadda"),
            },
        }
    }

    #[test]
    fn test_filter_new_urls() {
        let discovered: Vec<String> = [QUIZ, SEEN, FRESH, "https://www.gktoday.in/x/", FRESH]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let seen: HashSet<String> = [SEEN.to_string()].into_iter().collect();

        let filtered = filter_new_urls(&discovered, &seen);

        assert_eq!(filtered.new_urls, vec![FRESH, "https://www.gktoday.in/x/"]);
        assert_eq!(filtered.skipped_by_pattern, 1);
        assert_eq!(filtered.already_seen, 1);
    }

    #[test]
    fn test_filter_quiz_excluded_even_if_unseen_and_seen_is_exact_match() {
        let discovered = vec![QUIZ.to_string(), format!("{SEEN}?ref=1")];
        let seen: HashSet<String> = [SEEN.to_string()].into_iter().collect();
        let filtered = filter_new_urls(&discovered, &seen);
        assert_eq!(filtered.new_urls, vec![format!("{SEEN}?ref=1")]);
    }

    #[tokio::test]
    async fn test_end_to_end_publishes_only_new_article() {
        let pages = [
            (BASE, listing(&[QUIZ, SEEN, FRESH])),
            (FRESH, article("Fresh news", "<p>It happened.</p><ul><li>Point</li></ul>")),
        ];
        let pipeline = pipeline(&pages, FakePublisher::default(), MemoryStore::with(&[SEEN]));

        let report = pipeline.run().await.unwrap();

        assert_eq!(
            report,
            RunReport {
                discovered: 3,
                skipped_by_pattern: 1,
                already_seen: 1,
                published: 1,
                failed: 0,
            }
        );
        let sent = pipeline.publisher.sent.lock().unwrap();
        assert!(!sent.is_empty());
        let all = sent.concat();
        assert!(all.contains("🌟 GU:Fresh news"));
        assert!(all.contains("🌟 Fresh news"));
        assert!(all.contains("GU:It happened."));
        assert!(all.contains("🔸 It happened."));
        assert!(all.contains("• GU:Point\n• Point\n"));
        assert!(sent.iter().all(|m| m.contains("Join Our Telegram Channel")));
        assert_eq!(pipeline.store.writes.load(Ordering::SeqCst), 1);
        assert!(pipeline.store.urls.lock().unwrap().contains(&FRESH.to_string()));
    }

    #[tokio::test]
    async fn test_rerun_with_nothing_new_is_idempotent() {
        let pages = [(BASE, listing(&[SEEN, FRESH]))];
        let pipeline = pipeline(
            &pages,
            FakePublisher::default(),
            MemoryStore::with(&[SEEN, FRESH]),
        );

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.published, 0);
        assert_eq!(report.already_seen, 2);
        assert!(pipeline.publisher.sent.lock().unwrap().is_empty());
        assert_eq!(pipeline.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_structural_failure_skips_only_that_article() {
        let broken = "https://www.gktoday.in/broken/";
        let pages = [
            (BASE, listing(&[broken, FRESH])),
            (broken, "<html><body><p>redesigned page</p></body></html>".to_string()),
            (FRESH, article("Fresh", "<p>Body.</p>")),
        ];
        let pipeline = pipeline(&pages, FakePublisher::default(), MemoryStore::default());

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.published, 1);
        assert_eq!(report.failed, 1);
        let urls = pipeline.store.urls.lock().unwrap();
        assert_eq!(*urls, vec![FRESH.to_string()]);
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_article_unrecorded() {
        let pages = [
            (BASE, listing(&[FRESH])),
            (FRESH, article("Fresh", "<p>Body.</p>")),
        ];
        let publisher = FakePublisher {
            fail: true,
            ..FakePublisher::default()
        };
        let pipeline = pipeline(&pages, publisher, MemoryStore::default());

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.published, 0);
        assert_eq!(report.failed, 1);
        assert_eq!(pipeline.store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_discovery_failure_aborts_run() {
        let pipeline = pipeline(&[], FakePublisher::default(), MemoryStore::default());
        let result = pipeline.run().await;
        assert!(matches!(result, Err(PipelineError::Discovery(_))));
        assert!(pipeline.publisher.sent.lock().unwrap().is_empty());
    }
}
