//! 书名检索策略 - 业务能力层
//!
//! 按书名（和作者姓氏）检索书目，取第一个页数中位数在区间内的文档。
//! 不做额外排序，直接信任数据源的相关度顺序。

use crate::clients::{fetch_as, ApiRequest, JsonFetcher};
use crate::config::Config;
use crate::models::page_count::lenient_page_count;
use crate::models::{ResolutionRequest, StrategyKind, ValidPageRange};
use crate::services::PageCountStrategy;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const SEARCH_LIMIT: &str = "5";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    key: Option<String>,
    #[serde(default, deserialize_with = "lenient_page_count")]
    number_of_pages_median: Option<i64>,
}

/// 书名检索策略
pub struct TitleSearchStrategy {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl TitleSearchStrategy {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            base_url: config.open_library_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_request(&self, request: &ResolutionRequest) -> ApiRequest {
        let mut api_request =
            ApiRequest::get(format!("{}/search.json", self.base_url)).param("title", request.title());

        if let Some(surname) = request.author_surname() {
            api_request = api_request.param("author", surname);
        }

        api_request
            .param("fields", "key,number_of_pages_median")
            .param("limit", SEARCH_LIMIT)
    }
}

#[async_trait]
impl PageCountStrategy for TitleSearchStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TitleSearch
    }

    async fn resolve(&self, request: &ResolutionRequest) -> Option<u32> {
        let api_request = self.search_request(request);

        let response: SearchResponse = match fetch_as(self.fetcher.as_ref(), &api_request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("书名检索失败: {}", e);
                return None;
            }
        };

        let hit = response.docs.iter().find_map(|doc| {
            let pages = doc.number_of_pages_median.and_then(ValidPageRange::accept)?;
            Some((doc.key.as_deref().unwrap_or("?"), pages))
        });

        match hit {
            Some((key, pages)) => {
                debug!("检索命中 {}: {} 页", key, pages);
                Some(pages)
            }
            None => {
                debug!("检索返回 {} 个文档，没有区间内的页数", response.docs.len());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockFetcher;
    use serde_json::json;

    fn strategy(fetcher: Arc<MockFetcher>) -> TitleSearchStrategy {
        TitleSearchStrategy::new(fetcher, &Config::default())
    }

    #[tokio::test]
    async fn test_query_uses_title_and_surname() {
        let fetcher = Arc::new(MockFetcher::new().on(
            "/search.json",
            json!({ "docs": [ { "key": "/works/OL1168083W", "number_of_pages_median": 328 } ] }),
        ));
        let request = ResolutionRequest::new("Nineteen Eighty-Four", Some("George Orwell"), None).unwrap();

        assert_eq!(strategy(fetcher.clone()).resolve(&request).await, Some(328));

        let call = &fetcher.calls()[0];
        assert_eq!(call.url, "https://openlibrary.org/search.json");
        assert_eq!(call.query_value("title"), Some("Nineteen Eighty-Four"));
        assert_eq!(call.query_value("author"), Some("Orwell"));
        assert_eq!(call.query_value("fields"), Some("key,number_of_pages_median"));
        assert_eq!(call.query_value("limit"), Some("5"));
    }

    #[tokio::test]
    async fn test_author_param_omitted_without_author() {
        let fetcher = Arc::new(MockFetcher::new().on("/search.json", json!({ "docs": [] })));
        let request = ResolutionRequest::new("Dune", None, None).unwrap();

        assert_eq!(strategy(fetcher.clone()).resolve(&request).await, None);
        assert_eq!(fetcher.calls()[0].query_value("author"), None);
    }

    #[tokio::test]
    async fn test_first_in_range_document_wins() {
        let body = json!({ "docs": [
            { "key": "/works/A" },
            { "key": "/works/B", "number_of_pages_median": 12 },
            { "key": "/works/C", "number_of_pages_median": 412 },
            { "key": "/works/D", "number_of_pages_median": 500 }
        ] });
        let fetcher = Arc::new(MockFetcher::new().on("/search.json", body));
        let request = ResolutionRequest::new("Dune", None, None).unwrap();

        assert_eq!(strategy(fetcher).resolve(&request).await, Some(412));
    }

    #[tokio::test]
    async fn test_failures_are_no_answer() {
        let request = ResolutionRequest::new("Dune", None, None).unwrap();

        let failing = Arc::new(MockFetcher::new().fail("/search.json"));
        assert_eq!(strategy(failing).resolve(&request).await, None);

        let malformed = Arc::new(MockFetcher::new().on("/search.json", json!("not an object")));
        assert_eq!(strategy(malformed).resolve(&request).await, None);

        let out_of_range = Arc::new(MockFetcher::new().on(
            "/search.json",
            json!({ "docs": [ { "number_of_pages_median": 9000 } ] }),
        ));
        assert_eq!(strategy(out_of_range).resolve(&request).await, None);
    }
}
