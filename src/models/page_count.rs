//! 页数的合法区间与宽松解码

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 合法页数区间 `[50, 2000]`
///
/// 过滤掉接近 0 的小册子噪声，以及四位数的合集/选集。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidPageRange;

impl ValidPageRange {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 2000;

    pub fn contains(page_count: u32) -> bool {
        (Self::MIN..=Self::MAX).contains(&page_count)
    }

    /// 候选页数在区间内时返回 `Some`
    pub fn accept(candidate: i64) -> Option<u32> {
        u32::try_from(candidate).ok().filter(|p| Self::contains(*p))
    }
}

/// 把 JSON 中的页数字段解码为整数
///
/// 整数、整数值的浮点数和数字字符串都接受；其他类型视为缺失，
/// 这样单个脏字段不会让整个响应解码失败。
pub fn lenient_page_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(page_count_from_value))
}

fn page_count_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
