use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".blog_session";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub session_file: PathBuf,
    pub log_level: String,
    pub http_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Настройки из произвольного источника переменных.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = non_empty(lookup("BLOG_API_URL"))
            .map(normalize_server)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_file = non_empty(lookup("BLOG_SESSION_FILE"))
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string())
            .into();
        let log_level = non_empty(lookup("LOG_LEVEL"))
            .or_else(|| non_empty(lookup("RUST_LOG")))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let http_timeout_secs = parse_u64(
            "BLOG_HTTP_TIMEOUT_SECS",
            lookup("BLOG_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        Ok(Self {
            api_url,
            session_file,
            log_level,
            http_timeout_secs,
        })
    }

    /// `--server` из командной строки важнее переменной окружения.
    pub fn with_server(mut self, server: Option<String>) -> Self {
        if let Some(server) = non_empty(server) {
            self.api_url = normalize_server(server);
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_u64(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    let value = non_empty(raw)
        .unwrap_or_else(|| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
