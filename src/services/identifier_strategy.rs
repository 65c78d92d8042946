//! 作品标识策略 - 业务能力层
//!
//! 按作品标识拉取最多 20 个版本，过滤掉区间外的页数后取中位数。
//! 单个版本（插图版、删节版、合集）噪声很大，区间内版本的中位数
//! 更接近"标准版"的页数。

use crate::clients::{fetch_as, ApiRequest, JsonFetcher};
use crate::config::Config;
use crate::models::page_count::lenient_page_count;
use crate::models::{ResolutionRequest, StrategyKind, ValidPageRange};
use crate::services::PageCountStrategy;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const EDITIONS_LIMIT: &str = "20";

#[derive(Debug, Deserialize)]
struct EditionsResponse {
    #[serde(default)]
    entries: Vec<EditionEntry>,
}

#[derive(Debug, Deserialize)]
struct EditionEntry {
    #[serde(default, deserialize_with = "lenient_page_count")]
    number_of_pages: Option<i64>,
}

/// 作品标识策略
pub struct IdentifierStrategy {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl IdentifierStrategy {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            base_url: config.open_library_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn editions_request(&self, work_id: &str) -> ApiRequest {
        ApiRequest::get(format!("{}/works/{}/editions.json", self.base_url, work_id))
            .param("limit", EDITIONS_LIMIT)
            .param("fields", "number_of_pages")
    }
}

#[async_trait]
impl PageCountStrategy for IdentifierStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Identifier
    }

    fn is_applicable(&self, request: &ResolutionRequest) -> bool {
        request.work_id().and_then(normalize_work_id).is_some()
    }

    async fn resolve(&self, request: &ResolutionRequest) -> Option<u32> {
        let work_id = request.work_id().and_then(normalize_work_id)?;
        let api_request = self.editions_request(work_id);

        let response: EditionsResponse = match fetch_as(self.fetcher.as_ref(), &api_request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("作品 {} 的版本列表获取失败: {}", work_id, e);
                return None;
            }
        };

        debug!("作品 {} 共返回 {} 个版本", work_id, response.entries.len());

        let estimate = median_page_count(response.entries.iter().filter_map(|e| e.number_of_pages));
        if estimate.is_none() {
            debug!("作品 {} 没有区间内的版本页数", work_id);
        }
        estimate
    }
}

/// 去掉前导 `/` 和 `works/` 段
///
/// `/works/OL1168083W`、`works/OL1168083W` 和 `OL1168083W` 都得到 `OL1168083W`。
pub fn normalize_work_id(raw: &str) -> Option<&str> {
    let id = raw.trim().trim_start_matches('/');
    let id = id.strip_prefix("works/").unwrap_or(id);
    let id = id.trim_matches('/');
    (!id.is_empty()).then_some(id)
}

/// 区间内样本排序后取下标 `n / 2` 的元素
///
/// 偶数个样本时取的是上中位数，不取两个中间值的平均。
pub fn median_page_count(samples: impl IntoIterator<Item = i64>) -> Option<u32> {
    let mut in_range: Vec<u32> = samples
        .into_iter()
        .filter_map(ValidPageRange::accept)
        .collect();

    if in_range.is_empty() {
        return None;
    }

    in_range.sort_unstable();
    Some(in_range[in_range.len() / 2])
}
