//! GKToday current-affairs scraper.
//!
//! Listing pages live at `{base}` and `{base}page/{k}/`. Each article title on
//! a listing page is an `<h1 id="list">` wrapping a link to the article.
//!
//! Article pages keep their body in `div.inside_post.column.content_width`.
//! Only the direct children of that container are read, top to bottom, until
//! the previous/next navigation block.

use crate::error::ScrapeError;
use crate::models::{ContentSegment, ScrapedArticle, SegmentRole};
use crate::scrapers::Fetch;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1#list").expect("valid title selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("valid link selector"));
static CONTENT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.inside_post.column.content_width").expect("valid content selector")
});
static LIST_ITEM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li").expect("valid list item selector"));

/// Recurring daily quiz posts, e.g. `daily-current-affairs-quiz-august-7-2024/`.
static QUIZ_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"quiz-(?:[a-z]+-\d{1,2}-)?\d{4}/?$").expect("valid quiz pattern")
});

const SHARE_WIDGET_CLASSES: &[&str] = &[
    "sharethis-inline-share-buttons",
    "st-center",
    "st-has-labels",
    "st-inline-share-buttons",
    "st-animated",
];
const PREV_NEXT_CLASSES: &[&str] = &["prenext"];

/// Whether a URL is a recurring quiz post that must never be relayed.
pub fn should_skip_url(url: &str) -> bool {
    QUIZ_PATTERN.is_match(url)
}

/// URL of listing page `page` (1-based). Page 1 is the base URL itself.
pub fn listing_page_url(base_url: &str, page: usize) -> Result<Url, ScrapeError> {
    let mut base = base_url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base)?;
    if page <= 1 {
        Ok(base)
    } else {
        Ok(base.join(&format!("page/{page}/"))?)
    }
}

/// Collect article URLs from the first `pages` listing pages.
///
/// Links keep page order and are not de-duplicated. Any fetch failure fails
/// the whole index.
#[instrument(level = "info", skip(fetcher))]
pub async fn index_articles<F: Fetch>(
    fetcher: &F,
    base_url: &str,
    pages: usize,
) -> Result<Vec<String>, ScrapeError> {
    let mut article_urls = Vec::new();
    for page in 1..=pages.max(1) {
        let page_url = listing_page_url(base_url, page)?;
        let html = fetcher.fetch(page_url.as_str()).await?;
        let found = extract_listing_links(&html, &page_url);
        debug!(page, count = found.len(), "Parsed listing page");
        article_urls.extend(found);
    }

    info!(count = article_urls.len(), "Indexed article URLs");
    debug!(urls = ?article_urls, "Article URLs");
    Ok(article_urls)
}

/// Pull the first link out of every article title on a listing page.
pub fn extract_listing_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for title in document.select(&TITLE_SELECTOR) {
        let Some(href) = title
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        match page_url.join(href) {
            Ok(resolved) => links.push(resolved.to_string()),
            Err(e) => debug!(%href, error = %e, "Skipping unresolvable link"),
        }
    }
    links
}

/// Fetch one article page and extract its heading and body segments.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_article<F: Fetch>(fetcher: &F, url: &str) -> Result<ScrapedArticle, ScrapeError> {
    let html = fetcher.fetch(url).await?;
    let article = parse_article(url, &html)?;
    info!(segments = article.segments.len(), "Parsed article");
    Ok(article)
}

/// Extract heading and segments from an article document.
pub fn parse_article(url: &str, html: &str) -> Result<ScrapedArticle, ScrapeError> {
    let document = Html::parse_document(html);
    let content = document
        .select(&CONTENT_SELECTOR)
        .next()
        .ok_or(ScrapeError::StructureNotFound("main content container"))?;
    let heading = content
        .select(&TITLE_SELECTOR)
        .next()
        .ok_or(ScrapeError::StructureNotFound("article heading"))?;

    let mut segments = Vec::new();
    for child in content.children().filter_map(ElementRef::wrap) {
        if has_exact_classes(child, SHARE_WIDGET_CLASSES) {
            continue;
        }
        if has_exact_classes(child, PREV_NEXT_CLASSES) {
            break;
        }

        let role = match child.value().name() {
            "p" => SegmentRole::Paragraph,
            "h2" => SegmentRole::Subheading,
            "h4" => SegmentRole::Emphasis,
            "ul" => {
                for item in child.select(&LIST_ITEM_SELECTOR) {
                    segments.push(ContentSegment::new(SegmentRole::ListItem, element_text(item)));
                }
                segments.push(ContentSegment::list_break());
                continue;
            }
            _ => continue,
        };
        segments.push(ContentSegment::new(role, element_text(child)));
    }

    Ok(ScrapedArticle {
        url: url.to_string(),
        heading: element_text(heading),
        segments,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// True when the element's class list is exactly `expected`, in order.
fn has_exact_classes(element: ElementRef<'_>, expected: &[&str]) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.split_whitespace().eq(expected.iter().copied()))
}
