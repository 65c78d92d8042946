//! 错误类型
//!
//! 这些错误只在 crate 内部流动：策略会把它们吸收为"无答案"，
//! `resolve_page_count` 永远不会把它们返回给调用方。

use thiserror::Error;

/// HTTP 获取 + JSON 解码原语的错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络层失败（DNS、连接、超时）
    #[error("网络请求失败 ({url}): {message}")]
    Transport { url: String, message: String },

    /// 服务端返回非 2xx 状态码
    #[error("API返回错误状态 ({url}): {status}")]
    Status { url: String, status: u16 },

    /// 响应体不是合法 JSON，或者与预期结构不符
    #[error("JSON解析失败 ({url}): {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    /// 把 serde_json 的解码错误包装为 `Decode`
    pub fn decode(url: impl Into<String>, err: serde_json::Error) -> Self {
        FetchError::Decode {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// 构造解析请求时的校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("书名不能为空")]
    EmptyTitle,
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 获取原语的结果类型
pub type FetchResult<T> = Result<T, FetchError>;
