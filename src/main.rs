//! # Current Affairs Relay
//!
//! Scrapes current-affairs articles from GKToday, translates every heading,
//! paragraph and list item, and republishes original and translation side by
//! side to a Telegram channel. Published URLs are remembered in MongoDB so an
//! article is only relayed once.
//!
//! ## Usage
//!
//! ```sh
//! MONGO_CONNECTION_STRING=mongodb://localhost:27017 \
//! TELEGRAM_BOT_TOKEN=123:abc \
//! TELEGRAM_CHANNEL_USERNAME=@currentadda \
//! current_affairs_relay
//! ```
//!
//! ## Architecture
//!
//! A run is a linear pipeline:
//! 1. **Indexing**: collect article URLs from the first listing pages
//! 2. **Filtering**: drop quiz posts and URLs already in the store
//! 3. **Scraping**: extract heading and body segments of each new article
//! 4. **Translation**: translate each segment, falling back to the original
//! 5. **Publishing**: compose, chunk and send the messages, then record the URL

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use teloxide::Bot;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod store;
mod translate;
mod utils;

use cli::Cli;
use outputs::message::promotion_footer;
use outputs::telegram::{TelegramPublisher, parse_recipient};
use pipeline::{Pipeline, Settings};
use scrapers::HttpFetcher;
use store::MongoLinkStore;
use translate::{GoogleTranslate, RetryTranslate};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("current_affairs_relay starting up");
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    // Missing required settings make clap exit here, before any I/O.
    let args = Cli::parse();
    debug!(
        base_url = %args.base_url,
        pages = args.pages,
        target_language = %args.target_language,
        "Parsed configuration"
    );

    // --- Collaborators, scoped to this run ---
    let http = reqwest::Client::new();
    let store = MongoLinkStore::connect(
        &args.mongo_connection_string,
        &args.mongo_db_name,
        &args.mongo_collection_name,
    )
    .await?;
    let publisher = TelegramPublisher::new(
        Bot::new(&args.telegram_bot_token),
        parse_recipient(&args.telegram_channel),
    );
    let translator =
        RetryTranslate::with_defaults(GoogleTranslate::new(http.clone(), &args.target_language));

    let pipeline = Pipeline {
        fetcher: HttpFetcher::new(http),
        translator,
        publisher,
        store,
        settings: Settings {
            base_url: args.base_url.clone(),
            pages: usize::from(args.pages),
            footer: promotion_footer(&args.promo_link),
        },
    };

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Run aborted");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        discovered = report.discovered,
        skipped_by_pattern = report.skipped_by_pattern,
        already_seen = report.already_seen,
        published = report.published,
        failed = report.failed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
