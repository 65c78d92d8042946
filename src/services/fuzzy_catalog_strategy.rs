//! 模糊目录策略 - 业务能力层（兜底）
//!
//! 在通用图书目录中检索，按标题相似度挑选候选。
//! 作者姓氏可信（长度 > 2）时先发一次带作者的查询，总是再跟一次只按书名的查询；
//! 前一次查询有结果就不再发下一次。

use crate::clients::{fetch_as, ApiRequest, JsonFetcher};
use crate::config::Config;
use crate::models::page_count::lenient_page_count;
use crate::models::{ResolutionRequest, StrategyKind, ValidPageRange};
use crate::services::PageCountStrategy;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const MAX_RESULTS: &str = "10";
const MIN_SURNAME_CHARS: usize = 3;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<VolumeItem>,
}

#[derive(Debug, Deserialize)]
struct VolumeItem {
    #[serde(default, rename = "volumeInfo")]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    #[allow(dead_code)] // 只在请求的 fields 中出现，排序不使用
    authors: Option<Vec<String>>,
    #[serde(default, rename = "pageCount", deserialize_with = "lenient_page_count")]
    page_count: Option<i64>,
}

/// 带标题相似度的候选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub page_count: u32,
    pub title_similarity_score: u32,
}

/// 模糊目录策略
pub struct FuzzyCatalogStrategy {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    api_key: Option<String>,
}

impl FuzzyCatalogStrategy {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            base_url: config.google_books_base_url.trim_end_matches('/').to_string(),
            api_key: config.google_books_api_key.clone(),
        }
    }

    fn volumes_request(&self, query: &str) -> ApiRequest {
        let api_request = ApiRequest::get(format!("{}/volumes", self.base_url))
            .param("q", query)
            .param("maxResults", MAX_RESULTS)
            .param("fields", "items(volumeInfo(title,authors,pageCount))");

        match &self.api_key {
            Some(key) => api_request.param("key", key.as_str()),
            None => api_request,
        }
    }

    /// 执行一次查询；请求失败按零结果处理
    async fn run_query(&self, query: &str, title: &str) -> Option<u32> {
        let api_request = self.volumes_request(query);

        let response: VolumesResponse = match fetch_as(self.fetcher.as_ref(), &api_request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("目录查询 '{}' 失败，按零结果处理: {}", query, e);
                return None;
            }
        };

        let candidates = response.items.iter().filter_map(|item| {
            let info = item.volume_info.as_ref()?;
            let page_count = info.page_count.and_then(ValidPageRange::accept)?;
            let score = title_similarity(title, info.title.as_deref().unwrap_or_default());
            Some(ScoredCandidate {
                page_count,
                title_similarity_score: score,
            })
        });

        let best = best_candidate(candidates)?;
        debug!(
            "目录查询 '{}' 选中 {} 页 (相似度: {})",
            query, best.page_count, best.title_similarity_score
        );
        Some(best.page_count)
    }
}

#[async_trait]
impl PageCountStrategy for FuzzyCatalogStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FuzzyCatalog
    }

    async fn resolve(&self, request: &ResolutionRequest) -> Option<u32> {
        for query in build_queries(request) {
            if let Some(pages) = self.run_query(&query, request.title()).await {
                return Some(pages);
            }
        }
        None
    }
}

/// 查询列表：可信姓氏时先带作者，最后总是只按书名
pub fn build_queries(request: &ResolutionRequest) -> Vec<String> {
    let mut queries = Vec::with_capacity(2);

    if let Some(surname) = request
        .author_surname()
        .filter(|s| s.chars().count() >= MIN_SURNAME_CHARS)
    {
        queries.push(format!("intitle:{} inauthor:{}", request.title(), surname));
    }
    queries.push(format!("intitle:{}", request.title()));

    queries
}

/// 标题相似度（不区分大小写）
///
/// 完全相同 100，候选包含查询 60，查询包含候选 40，其余 0。
pub fn title_similarity(query_title: &str, candidate_title: &str) -> u32 {
    let query = query_title.trim().to_lowercase();
    let candidate = candidate_title.trim().to_lowercase();

    if query.is_empty() || candidate.is_empty() {
        return 0;
    }

    if candidate == query {
        100
    } else if candidate.contains(&query) {
        60
    } else if query.contains(&candidate) {
        40
    } else {
        0
    }
}

/// 取分数最高的候选；同分时保留先出现的
pub fn best_candidate(candidates: impl IntoIterator<Item = ScoredCandidate>) -> Option<ScoredCandidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(b) if b.title_similarity_score >= candidate.title_similarity_score => Some(b),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockFetcher;
    use serde_json::json;

    fn strategy(fetcher: Arc<MockFetcher>) -> FuzzyCatalogStrategy {
        FuzzyCatalogStrategy::new(fetcher, &Config::default())
    }

    fn volume(title: &str, pages: i64) -> serde_json::Value {
        json!({ "volumeInfo": { "title": title, "authors": ["Frank Herbert"], "pageCount": pages } })
    }

    fn scored(page_count: u32, score: u32) -> ScoredCandidate {
        ScoredCandidate {
            page_count,
            title_similarity_score: score,
        }
    }

    #[test]
    fn test_title_similarity_scores() {
        assert_eq!(title_similarity("Dune", "Dune"), 100);
        assert_eq!(title_similarity("Dune", "DUNE"), 100);
        assert_eq!(title_similarity("Dune", "Dune Messiah"), 60);
        assert_eq!(title_similarity("Dune", "Classics: Dune"), 60);
        assert_eq!(title_similarity("Dune Messiah", "Dune"), 40);
        assert_eq!(title_similarity("Dune", "Neuromancer"), 0);
        assert_eq!(title_similarity("Dune", ""), 0);
    }

    #[test]
    fn test_best_candidate_is_stable_on_ties() {
        let best = best_candidate([scored(400, 60), scored(500, 60), scored(90, 40)]);
        assert_eq!(best, Some(scored(400, 60)));

        let best = best_candidate([scored(90, 0), scored(500, 100), scored(600, 100)]);
        assert_eq!(best, Some(scored(500, 100)));

        assert_eq!(best_candidate(Vec::new()), None);
    }

    #[test]
    fn test_build_queries() {
        let request = ResolutionRequest::new("Dune", Some("Frank Herbert"), None).unwrap();
        assert_eq!(
            build_queries(&request),
            vec!["intitle:Dune inauthor:Herbert".to_string(), "intitle:Dune".to_string()]
        );

        let short = ResolutionRequest::new("Dune", Some("F. Li"), None).unwrap();
        assert_eq!(build_queries(&short), vec!["intitle:Dune".to_string()]);

        let anonymous = ResolutionRequest::new("Beowulf", None, None).unwrap();
        assert_eq!(build_queries(&anonymous), vec!["intitle:Beowulf".to_string()]);
    }

    #[tokio::test]
    async fn test_highest_score_wins_and_out_of_range_discarded() {
        let body = json!({ "items": [
            volume("Dune Messiah", 330),
            volume("Dune", 4000),
            volume("Dune", 612),
            { "volumeInfo": { "title": "Dune" } },
            {}
        ] });
        let fetcher = Arc::new(MockFetcher::new().on("/volumes", body));
        let request = ResolutionRequest::new("Dune", None, None).unwrap();

        assert_eq!(strategy(fetcher.clone()).resolve(&request).await, Some(612));

        let call = &fetcher.calls()[0];
        assert_eq!(call.url, "https://www.googleapis.com/books/v1/volumes");
        assert_eq!(call.query_value("q"), Some("intitle:Dune"));
        assert_eq!(call.query_value("maxResults"), Some("10"));
        assert_eq!(call.query_value("fields"), Some("items(volumeInfo(title,authors,pageCount))"));
        assert_eq!(call.query_value("key"), None);
    }

    #[tokio::test]
    async fn test_second_query_skipped_when_first_answers() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .on_query("/volumes", "q", "intitle:Dune inauthor:Herbert", json!({ "items": [volume("Dune", 412)] }))
                .on("/volumes", json!({ "items": [volume("Dune", 999)] })),
        );
        let request = ResolutionRequest::new("Dune", Some("Frank Herbert"), None).unwrap();

        assert_eq!(strategy(fetcher.clone()).resolve(&request).await, Some(412));
        assert_eq!(fetcher.call_count("/volumes"), 1);
    }

    #[tokio::test]
    async fn test_failed_first_query_falls_through() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .fail_query("/volumes", "q", "intitle:Dune inauthor:Herbert")
                .on_query("/volumes", "q", "intitle:Dune", json!({ "items": [volume("Dune", 604)] })),
        );
        let request = ResolutionRequest::new("Dune", Some("Frank Herbert"), None).unwrap();

        assert_eq!(strategy(fetcher.clone()).resolve(&request).await, Some(604));
        assert_eq!(fetcher.call_count("/volumes"), 2);
    }

    #[tokio::test]
    async fn test_empty_results_everywhere_is_no_answer() {
        let fetcher = Arc::new(MockFetcher::new().on("/volumes", json!({})));
        let request = ResolutionRequest::new("Dune", Some("Frank Herbert"), None).unwrap();

        assert_eq!(strategy(fetcher.clone()).resolve(&request).await, None);
        assert_eq!(fetcher.call_count("/volumes"), 2);
    }

    #[tokio::test]
    async fn test_api_key_is_forwarded() {
        let config = Config {
            google_books_api_key: Some("secret".to_string()),
            ..Config::default()
        };
        let fetcher = Arc::new(MockFetcher::new().on("/volumes", json!({ "items": [volume("Dune", 412)] })));
        let s = FuzzyCatalogStrategy::new(fetcher.clone(), &config);
        let request = ResolutionRequest::new("Dune", None, None).unwrap();

        assert_eq!(s.resolve(&request).await, Some(412));
        assert_eq!(fetcher.calls()[0].query_value("key"), Some("secret"));
    }
}
