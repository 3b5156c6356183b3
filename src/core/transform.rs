use crate::core::Record;
use crate::domain::entity::EntityType;
use crate::utils::error::{ImportError, Result};
use serde_json::{json, Value};

pub const ORDER_LINE: &str = "order_line";

/// 依匯入目標套用清理後的轉換
pub fn apply(entity: EntityType, sheet: &str, row: usize, record: Record) -> Result<Record> {
    match entity {
        EntityType::Sales => decode_order_line(sheet, row, record),
        EntityType::Contacts | EntityType::Leads => Ok(record),
    }
}

/// 將文字欄位 `order_line` 解析為 JSON 陣列，並把每個明細物件包成 Odoo 的
/// create 指令 `[0, 0, {...}]`。已經是指令格式的項目維持不變。
pub fn decode_order_line(sheet: &str, row: usize, mut record: Record) -> Result<Record> {
    let Some(raw) = record
        .get(ORDER_LINE)
        .and_then(Value::as_str)
        .map(str::to_owned)
    else {
        return Ok(record);
    };

    let invalid = |reason: String| ImportError::OrderLineError {
        sheet: sheet.to_string(),
        row,
        reason,
    };

    let lines = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(lines)) => lines,
        Ok(other) => {
            return Err(invalid(format!(
                "expected a JSON array of order lines, got {}",
                other
            )))
        }
        Err(e) => return Err(invalid(e.to_string())),
    };

    let commands = lines
        .into_iter()
        .map(|line| match line {
            Value::Object(values) => json!([0, 0, values]),
            command => command,
        })
        .collect();

    record.insert(ORDER_LINE, Value::Array(commands));
    Ok(record)
}
