use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 书目目录（editions / search 接口）的根地址
    pub open_library_base_url: String,
    /// 图书元数据目录（volumes 接口）的根地址
    pub google_books_base_url: String,
    /// volumes 接口的 API key，可选
    pub google_books_api_key: Option<String>,
    /// 单次外部请求的超时（秒）
    pub request_timeout_secs: u64,
    /// 一次完整解析的超时（秒）
    pub resolution_timeout_secs: u64,
    pub user_agent: String,
    /// 批量模式下同时解析的书本数量
    pub max_concurrent_books: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            open_library_base_url: "https://openlibrary.org".to_string(),
            google_books_base_url: "https://www.googleapis.com/books/v1".to_string(),
            google_books_api_key: None,
            request_timeout_secs: 5,
            resolution_timeout_secs: 15,
            user_agent: concat!("page-count-resolver/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent_books: 4,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖已有的值，无法解析的值保持不变
    pub fn with_env_overrides(self) -> Self {
        Self {
            open_library_base_url: std::env::var("OPEN_LIBRARY_BASE_URL").unwrap_or(self.open_library_base_url),
            google_books_base_url: std::env::var("GOOGLE_BOOKS_BASE_URL").unwrap_or(self.google_books_base_url),
            google_books_api_key: std::env::var("GOOGLE_BOOKS_API_KEY").ok().filter(|v| !v.trim().is_empty()).or(self.google_books_api_key),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            resolution_timeout_secs: std::env::var("RESOLUTION_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.resolution_timeout_secs),
            user_agent: std::env::var("PAGE_COUNT_USER_AGENT").unwrap_or(self.user_agent),
            max_concurrent_books: std::env::var("MAX_CONCURRENT_BOOKS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrent_books),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn resolution_timeout(&self) -> Duration {
        Duration::from_secs(self.resolution_timeout_secs)
    }
}
