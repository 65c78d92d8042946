//! 业务能力层：每个策略只负责从一个数据源得到页数

use crate::models::{ResolutionRequest, StrategyKind};
use async_trait::async_trait;

pub mod fuzzy_catalog_strategy;
pub mod identifier_strategy;
pub mod title_search_strategy;

pub use fuzzy_catalog_strategy::FuzzyCatalogStrategy;
pub use identifier_strategy::IdentifierStrategy;
pub use title_search_strategy::TitleSearchStrategy;

/// 页数解析策略
///
/// `resolve` 不返回错误：网络失败、解码失败和空结果都在策略内部吸收为 `None`。
/// 返回的页数已经过合法区间校验。
#[async_trait]
pub trait PageCountStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// 请求是否具备运行该策略的输入
    fn is_applicable(&self, _request: &ResolutionRequest) -> bool {
        true
    }

    async fn resolve(&self, request: &ResolutionRequest) -> Option<u32>;
}
