//! 页数解析流程 - 流程层
//!
//! 流程顺序：
//! 1. 作品标识策略（仅当有作品标识）
//! 2. 书名检索策略
//! 3. 模糊目录策略（兜底）
//!
//! 第一个给出合法页数的策略胜出，后面的策略不再执行。
//! 任何策略失败都不会阻止下一个策略；调用方只会看到页数或"未知"。

use crate::clients::JsonFetcher;
use crate::config::Config;
use crate::models::{ResolutionRequest, StrategyKind, ValidPageRange};
use crate::services::{FuzzyCatalogStrategy, IdentifierStrategy, PageCountStrategy, TitleSearchStrategy};
use crate::workflow::state::{ResolutionState, StateTrace};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 一次解析的详细结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub page_count: Option<u32>,
    /// 给出答案的策略
    pub source: Option<StrategyKind>,
    /// 经过的状态，从 `NotStarted` 开始，以终态结束
    pub trace: Vec<ResolutionState>,
}

impl Resolution {
    fn unresolved() -> Self {
        Self {
            page_count: None,
            source: None,
            trace: vec![ResolutionState::NotStarted, ResolutionState::Unresolved],
        }
    }
}

/// 页数解析器
///
/// 不持有可变状态，可以在多个任务间共享。
pub struct Resolver {
    strategies: Vec<Box<dyn PageCountStrategy>>,
    deadline: Option<Duration>,
}

impl Resolver {
    /// 按固定顺序组装三个策略，并使用配置中的整体超时
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &Config) -> Self {
        let strategies: Vec<Box<dyn PageCountStrategy>> = vec![
            Box::new(IdentifierStrategy::new(fetcher.clone(), config)),
            Box::new(TitleSearchStrategy::new(fetcher.clone(), config)),
            Box::new(FuzzyCatalogStrategy::new(fetcher, config)),
        ];

        Self {
            strategies,
            deadline: Some(config.resolution_timeout()),
        }
    }

    /// 用给定的策略列表组装（按列表顺序尝试，不设整体超时）
    pub fn from_strategies(strategies: Vec<Box<dyn PageCountStrategy>>) -> Self {
        Self {
            strategies,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// 解析页数，得不到时返回 `None`
    ///
    /// 书名为空时不发任何请求，直接返回 `None`。
    pub async fn resolve_page_count(
        &self,
        title: &str,
        author: Option<&str>,
        work_id: Option<&str>,
    ) -> Option<u32> {
        match ResolutionRequest::new(title, author, work_id) {
            Ok(request) => self.resolve(&request).await,
            Err(e) => {
                debug!("跳过解析: {}", e);
                None
            }
        }
    }

    pub async fn resolve(&self, request: &ResolutionRequest) -> Option<u32> {
        self.resolve_detailed(request).await.page_count
    }

    /// 解析并返回答案来源和状态轨迹
    ///
    /// 超过整体超时时放弃尚未完成的请求，结果为"未知"。
    pub async fn resolve_detailed(&self, request: &ResolutionRequest) -> Resolution {
        let Some(deadline) = self.deadline else {
            return self.run_strategies(request).await;
        };

        match tokio::time::timeout(deadline, self.run_strategies(request)).await {
            Ok(resolution) => resolution,
            Err(_) => {
                warn!("《{}》的页数解析超过 {:?}，放弃", request.title(), deadline);
                Resolution::unresolved()
            }
        }
    }

    async fn run_strategies(&self, request: &ResolutionRequest) -> Resolution {
        let mut trace = StateTrace::new();

        for strategy in &self.strategies {
            let kind = strategy.kind();
            if !strategy.is_applicable(request) {
                debug!("策略 {} 不适用，跳过", kind);
                continue;
            }

            trace.advance(ResolutionState::trying(kind));

            let accepted = strategy
                .resolve(request)
                .await
                .filter(|pages| ValidPageRange::contains(*pages));

            if let Some(page_count) = accepted {
                info!("✓ 《{}》页数: {} (来源: {})", request.title(), page_count, kind);
                trace.advance(ResolutionState::Resolved);
                return Resolution {
                    page_count: Some(page_count),
                    source: Some(kind),
                    trace: trace.into_states(),
                };
            }

            debug!("策略 {} 没有答案", kind);
        }

        info!("《{}》页数未知", request.title());
        trace.advance(ResolutionState::Unresolved);
        Resolution {
            page_count: None,
            source: None,
            trace: trace.into_states(),
        }
    }
}
