use crate::core::Record;
use serde_json::Value;

/// 移除空值欄位：null，以及去除空白後為空字串的文字。其他值原樣保留。
pub fn clean(record: Record) -> Record {
    record
        .data
        .into_iter()
        .filter(|(_, value)| !is_blank(value))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
