//! 内存中的 `JsonFetcher` 实现
//!
//! 按 URL 片段（可附加一个查询参数条件）返回预置的 JSON 或错误，并记录收到的所有请求。
//! 没有匹配的路由时返回 404。

use crate::clients::http_fetcher::{ApiRequest, JsonFetcher};
use crate::error::{FetchError, FetchResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockResponse {
    Json(Value),
    TransportError,
    Status(u16),
}

#[derive(Debug, Clone)]
struct MockRoute {
    url_fragment: String,
    query: Option<(String, String)>,
    response: MockResponse,
}

impl MockRoute {
    fn matches(&self, request: &ApiRequest) -> bool {
        if !request.url.contains(&self.url_fragment) {
            return false;
        }
        match &self.query {
            Some((key, value)) => request.query_value(key) == Some(value.as_str()),
            None => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Vec<MockRoute>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL 包含 `url_fragment` 时返回 `body`
    pub fn on(self, url_fragment: &str, body: Value) -> Self {
        self.route(url_fragment, None, MockResponse::Json(body))
    }

    /// URL 包含 `url_fragment` 且查询参数 `key` 等于 `value` 时返回 `body`
    pub fn on_query(self, url_fragment: &str, key: &str, value: &str, body: Value) -> Self {
        self.route(
            url_fragment,
            Some((key.to_string(), value.to_string())),
            MockResponse::Json(body),
        )
    }

    /// URL 包含 `url_fragment` 时模拟网络失败
    pub fn fail(self, url_fragment: &str) -> Self {
        self.route(url_fragment, None, MockResponse::TransportError)
    }

    pub fn fail_query(self, url_fragment: &str, key: &str, value: &str) -> Self {
        self.route(
            url_fragment,
            Some((key.to_string(), value.to_string())),
            MockResponse::TransportError,
        )
    }

    /// URL 包含 `url_fragment` 时返回指定的 HTTP 状态码
    pub fn status(self, url_fragment: &str, status: u16) -> Self {
        self.route(url_fragment, None, MockResponse::Status(status))
    }

    fn route(mut self, url_fragment: &str, query: Option<(String, String)>, response: MockResponse) -> Self {
        self.routes.push(MockRoute {
            url_fragment: url_fragment.to_string(),
            query,
            response,
        });
        self
    }

    /// 收到的全部请求（按顺序）
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// URL 包含 `url_fragment` 的请求数量
    pub fn call_count(&self, url_fragment: &str) -> usize {
        self.calls()
            .iter()
            .filter(|r| r.url.contains(url_fragment))
            .count()
    }
}

#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn fetch_json(&self, request: &ApiRequest) -> FetchResult<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let route = self.routes.iter().find(|r| r.matches(request));
        match route.map(|r| &r.response) {
            Some(MockResponse::Json(body)) => Ok(body.clone()),
            Some(MockResponse::TransportError) => Err(FetchError::Transport {
                url: request.url.clone(),
                message: "connection refused".to_string(),
            }),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                url: request.url.clone(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: request.url.clone(),
                status: 404,
            }),
        }
    }
}
