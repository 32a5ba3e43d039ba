use std::{env, path::PathBuf, str::FromStr, sync::Arc};

use timer_core::{ContentFilter, PlayerStore};

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_DATA_DIR: &str = "./data";
pub(crate) const DEFAULT_JSON_LIMIT_BYTES: usize = 16 * 1024;
pub(crate) const DEFAULT_HTTP_KEEP_ALIVE_SECS: u64 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) bind_addr: String,
    pub(crate) store_backend: StoreBackend,
    pub(crate) data_dir: PathBuf,
    pub(crate) seed_founder: bool,
    pub(crate) blocked_words: Vec<String>,
    pub(crate) json_limit: usize,
    pub(crate) http_workers: Option<usize>,
    pub(crate) http_keep_alive_secs: u64,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Self {
        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|err| {
                tracing::warn!("{err}. Falling back to sqlite.");
                StoreBackend::Sqlite
            }),
            Err(_) => StoreBackend::Sqlite,
        };

        Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            store_backend,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            seed_founder: read_env_bool("SEED_FOUNDER", false),
            blocked_words: read_env_list("BLOCKED_WORDS"),
            json_limit: read_env_usize("JSON_LIMIT_BYTES", DEFAULT_JSON_LIMIT_BYTES),
            http_workers: read_env_optional_usize("HTTP_WORKERS"),
            http_keep_alive_secs: read_env_u64(
                "HTTP_KEEP_ALIVE_SECS",
                DEFAULT_HTTP_KEEP_ALIVE_SECS,
            ),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn PlayerStore>,
    pub(crate) filter: Arc<dyn ContentFilter>,
    pub(crate) store_backend: StoreBackend,
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_optional_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
}

pub(crate) fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

/// Comma-separated list; blank entries are dropped.
pub(crate) fn read_env_list(name: &str) -> Vec<String> {
    env::var(name)
        .map(|value| split_list(&value))
        .unwrap_or_default()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<StoreBackend>(), Ok(StoreBackend::Sqlite));
        assert_eq!(" memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn split_list_drops_blanks() {
        assert_eq!(split_list("a, b,,  ,c "), ["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
