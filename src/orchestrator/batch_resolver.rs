//! 批量页数解析 - 编排层
//!
//! ## 职责
//!
//! 1. **加载书单**：从 TOML 文件读取 `[[books]]`
//! 2. **并发控制**：用 Semaphore 限制同时进行的解析数量
//! 3. **结果汇总**：统计已解析 / 未知的书本数量
//!
//! 每本书是一次独立的解析，书与书之间不共享任何结果。

use crate::models::{BookEntry, ResolutionRequest, StrategyKind};
use crate::utils::logging::{log_book_result, log_books_loaded};
use crate::workflow::Resolver;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, warn};

/// 单本书的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookOutcome {
    /// 书在书单中的序号（从 1 开始）
    pub index: usize,
    pub title: String,
    pub page_count: Option<u32>,
    pub source: Option<StrategyKind>,
}

/// 批量统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub resolved: usize,
    pub unknown: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// 按书单顺序排列
    pub outcomes: Vec<BookOutcome>,
    pub stats: BatchStats,
}

/// 批量解析器
pub struct BatchResolver {
    resolver: Arc<Resolver>,
    max_concurrent: usize,
}

impl BatchResolver {
    pub fn new(resolver: Arc<Resolver>, max_concurrent: usize) -> Self {
        Self {
            resolver,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// 解析整份书单
    pub async fn resolve_all(&self, books: Vec<BookEntry>) -> Result<BatchReport> {
        log_books_loaded(books.len(), self.max_concurrent);

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(books.len());

        for (idx, book) in books.into_iter().enumerate() {
            let index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;
            let resolver = self.resolver.clone();
            let title = book.title.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                resolve_book(&resolver, index, book).await
            });
            handles.push((index, title, handle));
        }

        let mut report = BatchReport::default();
        for (index, title, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("[书 {}] 任务执行失败: {}", index, e);
                    BookOutcome {
                        index,
                        title,
                        page_count: None,
                        source: None,
                    }
                }
            };

            if outcome.page_count.is_some() {
                report.stats.resolved += 1;
            } else {
                report.stats.unknown += 1;
            }
            report.outcomes.push(outcome);
        }
        report.stats.total = report.outcomes.len();

        Ok(report)
    }
}

async fn resolve_book(resolver: &Resolver, index: usize, book: BookEntry) -> BookOutcome {
    let request = match ResolutionRequest::new(&book.title, book.author.as_deref(), book.work_id.as_deref()) {
        Ok(request) => request,
        Err(e) => {
            warn!("[书 {}] 跳过: {}", index, e);
            return BookOutcome {
                index,
                title: book.title,
                page_count: None,
                source: None,
            };
        }
    };

    let resolution = resolver.resolve_detailed(&request).await;
    log_book_result(index, request.title(), resolution.page_count, resolution.source);

    BookOutcome {
        index,
        title: book.title,
        page_count: resolution.page_count,
        source: resolution.source,
    }
}
