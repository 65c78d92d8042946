use crate::error::RequestError;
use std::fmt;

/// 一次页数解析的输入
///
/// 构造后不可变；书名去空白后不能为空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    title: String,
    author: Option<String>,
    work_id: Option<String>,
}

impl ResolutionRequest {
    pub fn new(
        title: &str,
        author: Option<&str>,
        work_id: Option<&str>,
    ) -> Result<Self, RequestError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RequestError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_string(),
            author: non_blank(author),
            work_id: non_blank(work_id),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// 作品标识；空白标识在构造时已丢弃
    pub fn work_id(&self) -> Option<&str> {
        self.work_id.as_deref()
    }

    /// 作者的最后一个空白分隔词（目录按姓氏索引更可靠）
    pub fn author_surname(&self) -> Option<&str> {
        self.author.as_deref().and_then(|a| a.split_whitespace().last())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 三种解析策略，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// 作品标识 → 版本列表 → 中位数
    Identifier,
    /// 书目检索 → 第一个合理结果
    TitleSearch,
    /// 通用图书目录 → 标题相似度排序
    FuzzyCatalog,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Identifier => "identifier",
            StrategyKind::TitleSearch => "title-search",
            StrategyKind::FuzzyCatalog => "fuzzy-catalog",
        };
        f.write_str(name)
    }
}
