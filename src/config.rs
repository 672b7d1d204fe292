//! 运行配置，全部来自环境变量（启动时先加载 `.env`）。

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    /// 设置后从本地 JSON 文件加载，不走 HTTP
    pub catalog_file: Option<PathBuf>,
    pub page_size: usize,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
    pub http_max_tries: usize,
    pub http_retry_delay: Duration,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            catalog_file: None,
            page_size: 12,
            search_debounce: crate::view::DEFAULT_DEBOUNCE,
            http_timeout: Duration::from_secs(30),
            http_max_tries: 3,
            http_retry_delay: Duration::from_secs(2),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 便于测试：从任意键值来源读取
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let page_size = parse_or(get("VITRINE_PAGE_SIZE"), "VITRINE_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "VITRINE_PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        let http_max_tries = parse_or(
            get("VITRINE_HTTP_MAX_TRIES"),
            "VITRINE_HTTP_MAX_TRIES",
            defaults.http_max_tries,
        )?
        .max(1);
        let debounce_ms: u64 = parse_or(
            get("VITRINE_SEARCH_DEBOUNCE_MS"),
            "VITRINE_SEARCH_DEBOUNCE_MS",
            defaults.search_debounce.as_millis() as u64,
        )?;
        let timeout_secs: u64 = parse_or(
            get("VITRINE_HTTP_TIMEOUT_SECS"),
            "VITRINE_HTTP_TIMEOUT_SECS",
            defaults.http_timeout.as_secs(),
        )?;
        let retry_delay: f64 = parse_or(
            get("VITRINE_HTTP_RETRY_DELAY_SECS"),
            "VITRINE_HTTP_RETRY_DELAY_SECS",
            defaults.http_retry_delay.as_secs_f64(),
        )?;
        if !retry_delay.is_finite() || retry_delay < 0.0 {
            return Err(ConfigError::Invalid {
                key: "VITRINE_HTTP_RETRY_DELAY_SECS",
                value: retry_delay.to_string(),
            });
        }

        Ok(Self {
            api_url: get("VITRINE_API_URL").unwrap_or(defaults.api_url),
            catalog_file: get("VITRINE_CATALOG_FILE").map(PathBuf::from),
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
            http_timeout: Duration::from_secs(timeout_secs),
            http_max_tries,
            http_retry_delay: Duration::from_secs_f64(retry_delay),
            log_dir: get("VITRINE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse::<T>().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}
