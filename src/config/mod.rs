//! Configuration module for the Research Hub backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_ASSISTANT_MODEL: &str = "gpt-4o";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Root directory of the file object store
    pub storage_path: PathBuf,
    /// Base URL prepended to `/storage/<key>` when handing out file URLs
    pub public_base_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Assistant settings
    pub assistant: AssistantConfig,
}

/// Settings for the Aethon assistant.
#[derive(Debug, Clone, Default)]
pub struct AssistantConfig {
    /// Pause before each canned reply
    pub reply_delay: Duration,
    /// OpenAI-compatible chat-completions URL; canned replies only when unset
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("HUB_API_PSK").ok().filter(|s| !s.is_empty());

        let db_path = env::var("HUB_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let index_path = env::var("HUB_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let storage_path = env::var("HUB_STORAGE_PATH")
            .unwrap_or_else(|_| "./data/storage".to_string())
            .into();

        let bind_addr = match env::var("HUB_BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid HUB_BIND_ADDR {:?}, using {}", raw, DEFAULT_BIND_ADDR);
                default_bind_addr()
            }),
            Err(_) => default_bind_addr(),
        };

        let public_base_url = env::var("HUB_PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("http://{}", bind_addr));

        let log_level = env::var("HUB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let reply_delay = match env::var("HUB_ASSISTANT_DELAY_MS") {
            Ok(raw) => raw.parse::<u64>().map(Duration::from_millis).unwrap_or_else(|_| {
                tracing::warn!("Invalid HUB_ASSISTANT_DELAY_MS {:?}, using 0", raw);
                Duration::ZERO
            }),
            Err(_) => Duration::ZERO,
        };

        let assistant = AssistantConfig {
            reply_delay,
            api_url: env::var("HUB_ASSISTANT_API_URL").ok().filter(|s| !s.is_empty()),
            api_key: env::var("HUB_ASSISTANT_API_KEY").ok().filter(|s| !s.is_empty()),
            model: env::var("HUB_ASSISTANT_MODEL")
                .unwrap_or_else(|_| DEFAULT_ASSISTANT_MODEL.to_string()),
        };

        Self {
            api_psk,
            db_path,
            index_path,
            storage_path,
            public_base_url,
            bind_addr,
            log_level,
            assistant,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}
