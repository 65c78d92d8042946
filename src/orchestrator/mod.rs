//! 编排层（Orchestration Layer）
//!
//! ```text
//! batch_resolver (处理 Vec<BookEntry>)
//!     ↓
//! workflow::Resolver (处理单本书)
//!     ↓
//! services (能力层：identifier / title-search / fuzzy-catalog)
//!     ↓
//! clients (基础设施：JsonFetcher)
//! ```
//!
//! 只做调度和统计，不做具体的页数判断。

pub mod batch_resolver;

pub use batch_resolver::{BatchReport, BatchResolver, BatchStats, BookOutcome};
