//! # Page Count Resolver
//!
//! 根据书名、作者和作品标识，从多个不可靠的外部书目数据源解析出一本书的页数
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - HTTP 获取 + JSON 解码原语（`JsonFetcher`），可替换为 `MockFetcher`
//!
//! ### ② 业务能力层（Services）
//! - `IdentifierStrategy` - 作品标识 → 版本页数中位数
//! - `TitleSearchStrategy` - 书名检索 → 第一个合理结果
//! - `FuzzyCatalogStrategy` - 通用目录 → 标题相似度排序
//!
//! ### ③ 流程层（Workflow）
//! - `Resolver` - 按优先级尝试策略，第一个成功的胜出
//!
//! ### ④ 编排层（Orchestration）
//! - `BatchResolver` - 批量书单，限制并发
//!
//! 每次解析都是无状态的一次性流程：不缓存、不去重、不限速、不持久化。

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

use std::sync::Arc;

// 重新导出常用类型
pub use clients::{ApiRequest, JsonFetcher, MockFetcher, ReqwestFetcher};
pub use config::Config;
pub use error::{ConfigError, FetchError, RequestError};
pub use models::{ResolutionRequest, StrategyKind, ValidPageRange};
pub use orchestrator::{BatchReport, BatchResolver};
pub use workflow::{Resolution, ResolutionState, Resolver};

/// 解析一本书的页数
///
/// 永远不返回错误：所有数据源都失败时结果为 `None`。
pub async fn resolve_page_count(
    fetcher: Arc<dyn JsonFetcher>,
    config: &Config,
    title: &str,
    author: Option<&str>,
    work_id: Option<&str>,
) -> Option<u32> {
    Resolver::new(fetcher, config)
        .resolve_page_count(title, author, work_id)
        .await
}
