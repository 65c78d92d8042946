/// HTTP 获取 + JSON 解码原语
///
/// 所有外部书目 API 的调用都经过这里，策略层只依赖 `JsonFetcher` trait，
/// 测试时可以换成 `MockFetcher`。
use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// 一次 GET 请求的描述：地址 + 未转义的查询参数
///
/// 查询参数由具体的获取实现负责 URL 转义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    /// 追加一个查询参数
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// 查找查询参数的值（第一个同名参数）
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 获取并解码 JSON 的能力
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, request: &ApiRequest) -> FetchResult<Value>;
}

/// 获取 JSON 并解码为指定的结构
pub async fn fetch_as<T: DeserializeOwned>(
    fetcher: &dyn JsonFetcher,
    request: &ApiRequest,
) -> FetchResult<T> {
    let value = fetcher.fetch_json(request).await?;
    serde_json::from_value(value).map_err(|e| FetchError::decode(&request.url, e))
}

/// 基于 reqwest 的实现
pub struct ReqwestFetcher {
    http_client: reqwest::Client,
}

impl ReqwestFetcher {
    /// 按配置创建客户端（单次请求超时 + User-Agent）
    pub fn new(config: &Config) -> FetchResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Transport {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self { http_client })
    }

    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn fetch_json(&self, request: &ApiRequest) -> FetchResult<Value> {
        debug!(url = %request.url, query = ?request.query, "发送 GET 请求");

        let response = self
            .http_client
            .get(&request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: request.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: request.url.clone(),
            message: e.to_string(),
        })
    }
}
