//! Command-line interface definitions for the relay.
//!
//! Every option can also come from the environment (or a `.env` file), so a
//! scheduled run needs no flags at all. The connection string, bot token and
//! channel are required; clap refuses to start without them.

use clap::Parser;

/// Configuration for one relay run.
///
/// # Examples
///
/// ```sh
/// # Everything from the environment
/// MONGO_CONNECTION_STRING=mongodb://localhost:27017 \
/// TELEGRAM_BOT_TOKEN=123:abc \
/// TELEGRAM_CHANNEL_USERNAME=@currentadda \
/// current_affairs_relay
///
/// # Scrape three listing pages instead of two
/// current_affairs_relay --pages 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// MongoDB connection string
    #[arg(long, env = "MONGO_CONNECTION_STRING", hide_env_values = true)]
    pub mongo_connection_string: String,

    /// Telegram bot access token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: String,

    /// Destination channel: `@username` or numeric chat id
    #[arg(long, env = "TELEGRAM_CHANNEL_USERNAME")]
    pub telegram_channel: String,

    /// First listing page; later pages are `{base_url}page/{k}/`
    #[arg(long, env = "BASE_URL", default_value = "https://www.gktoday.in/current-affairs/")]
    pub base_url: String,

    /// Number of listing pages to scan
    #[arg(
        long,
        env = "PAGES",
        default_value_t = 2,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub pages: u16,

    /// Database holding the processed-links collection
    #[arg(long, env = "MONGO_DB_NAME", default_value = "indiabixurl")]
    pub mongo_db_name: String,

    /// Collection of `{url}` documents for already published articles
    #[arg(long, env = "MONGO_COLLECTION_NAME", default_value = "ScrapedLinks")]
    pub mongo_collection_name: String,

    /// Target language code for translations
    #[arg(long, env = "TARGET_LANGUAGE", default_value = "gu")]
    pub target_language: String,

    /// Channel link advertised in every message footer
    #[arg(long, env = "PROMO_LINK", default_value = "https://telegram.me/currentadda")]
    pub promo_link: String,
}
