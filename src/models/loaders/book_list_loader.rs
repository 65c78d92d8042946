use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 批量模式的一本书
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BookEntry {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub work_id: Option<String>,
}

/// 批量模式的输入文件：若干 `[[books]]` 表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookList {
    #[serde(default)]
    pub books: Vec<BookEntry>,
}

/// 从 TOML 文件加载书单
pub async fn load_book_list(toml_file_path: &Path) -> Result<BookList> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let list: BookList = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    tracing::info!("成功加载 {} 本书", list.books.len());

    Ok(list)
}
