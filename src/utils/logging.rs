/// 日志工具模块
///
/// 提供批量模式下日志格式化和输出的辅助函数
use crate::config::Config;
use crate::models::StrategyKind;
use crate::orchestrator::BatchStats;
use tracing::info;

const TITLE_PREVIEW_CHARS: usize = 40;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量页数解析模式");
    info!("📊 最大并发数: {}", config.max_concurrent_books);
    info!("⏱  单次请求超时: {}s / 单本书超时: {}s", config.request_timeout_secs, config.resolution_timeout_secs);
    info!("{}", "=".repeat(60));
}

/// 记录书单加载信息
pub fn log_books_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 本待解析的书", total);
    info!("📋 最多同时解析 {} 本", max_concurrent);
}

/// 记录单本书的结果
pub fn log_book_result(index: usize, title: &str, page_count: Option<u32>, source: Option<StrategyKind>) {
    let title = truncate_text(title, TITLE_PREVIEW_CHARS);
    match (page_count, source) {
        (Some(pages), Some(kind)) => info!("[书 {}] {} → {} 页 ({})", index, title, pages, kind),
        (Some(pages), None) => info!("[书 {}] {} → {} 页", index, title, pages),
        (None, _) => info!("[书 {}] {} → 未知", index, title),
    }
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &BatchStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部解析完成统计");
    info!("{}", "=".repeat(60));
    info!("✅ 已解析: {}/{}", stats.resolved, stats.total);
    info!("❔ 未知: {}", stats.unknown);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("Dune", 10), "Dune");
        assert_eq!(truncate_text("百年孤独的故事", 4), "百年孤独...");
        assert_eq!(truncate_text("", 3), "");
    }
}
