//! 讀取上傳的試算表。
//!
//! Excel / ODS 由 `calamine` 依副檔名自動判斷格式，CSV 由 `csv` 讀取並視為單一
//! 工作表。每個工作表的第一列是欄位名稱，之後每列轉成一筆 [`Record`]。

use crate::core::Record;
use crate::domain::model::{SheetData, SheetRow};
use crate::utils::error::{ImportError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{NaiveDate, TimeDelta};
use serde_json::{json, Number, Value};
use std::collections::HashSet;
use std::path::Path;

/// Odoo 伺服器端的日期時間格式
const ODOO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelection {
    All,
    Named(String),
}

impl SheetSelection {
    /// 未指定或空白的工作表名稱代表全部工作表
    pub fn from_option(sheet_name: Option<String>) -> Self {
        match sheet_name {
            Some(name) if !name.trim().is_empty() => SheetSelection::Named(name),
            _ => SheetSelection::All,
        }
    }
}

pub fn read_workbook(path: &Path, selection: &SheetSelection) -> Result<Vec<SheetData>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        if let SheetSelection::Named(name) = selection {
            tracing::debug!("Ignoring sheet name '{}' for CSV upload", name);
        }
        return Ok(vec![read_csv(path)?]);
    }

    let mut workbook = open_workbook_auto(path)?;
    let available: Vec<String> = workbook.sheet_names().to_vec();

    let names = match selection {
        SheetSelection::All => available,
        SheetSelection::Named(name) => {
            if !available.iter().any(|sheet| sheet == name) {
                return Err(ImportError::SheetNotFoundError {
                    sheet: name.clone(),
                });
            }
            vec![name.clone()]
        }
    };

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(sheet_from_range(&name, &range));
    }

    Ok(sheets)
}

fn sheet_from_range(name: &str, range: &Range<Data>) -> SheetData {
    // start() 是 0-based，試算表列號從 1 起算
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return SheetData {
            name: name.to_string(),
            rows: Vec::new(),
        };
    };

    let columns = header_columns(name, header_cells.iter().map(header_text));

    let rows = rows
        .enumerate()
        .map(|(offset, cells)| SheetRow {
            row: first_row + offset + 1,
            record: columns
                .iter()
                .map(|(index, field)| {
                    let value = cells.get(*index).map(cell_to_value).unwrap_or(Value::Null);
                    (field.clone(), value)
                })
                .collect(),
        })
        .collect();

    SheetData {
        name: name.to_string(),
        rows,
    }
}

/// 建立 (欄位索引, 欄位名稱)；略過空白標題，重複標題只保留第一欄
fn header_columns(sheet: &str, headers: impl Iterator<Item = String>) -> Vec<(usize, String)> {
    let mut seen = HashSet::new();
    headers
        .enumerate()
        .filter_map(|(index, header)| {
            if header.is_empty() {
                tracing::debug!("Sheet '{}': skipping column {} without header", sheet, index + 1);
                return None;
            }
            if !seen.insert(header.clone()) {
                tracing::warn!(
                    "Sheet '{}': duplicate column '{}' ignored, keeping the first one",
                    sheet,
                    header
                );
                return None;
            }
            Some((index, header))
        })
        .collect()
}

fn header_text(cell: &Data) -> String {
    match cell_to_value(cell) {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Excel 儲存格轉成 JSON 值
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => json!(*i),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                float_value(dt.as_f64())
            } else {
                excel_serial_to_datetime(dt.as_f64())
                    .map(Value::String)
                    .unwrap_or_else(|| float_value(dt.as_f64()))
            }
        }
        Data::DateTimeIso(s) => Value::String(s.clone()),
        Data::DurationIso(s) => Value::String(s.clone()),
    }
}

/// 整數值的浮點數（Excel 的數字一律是浮點）轉成整數，Odoo 的 many2one id 需要整數
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        json!(f as i64)
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn excel_serial_to_datetime(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let datetime = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)?;
    Some(datetime.format(ODOO_DATETIME_FORMAT).to_string())
}

fn read_csv(path: &Path) -> Result<SheetData> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("csv")
        .to_string();

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    let columns = header_columns(&name, headers.into_iter());

    let mut rows = Vec::new();
    for (offset, result) in reader.records().enumerate() {
        let cells = result?;
        let record: Record = columns
            .iter()
            .map(|(index, field)| {
                let value = cells.get(*index).map(infer_csv_value).unwrap_or(Value::Null);
                (field.clone(), value)
            })
            .collect();
        rows.push(SheetRow {
            row: offset + 2,
            record,
        });
    }

    Ok(SheetData { name, rows })
}

/// CSV 沒有型別，依內容推斷：布林、整數、浮點，其餘保留文字
fn infer_csv_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if looks_numeric(trimmed) {
        if let Ok(i) = trimmed.parse::<i64>() {
            return json!(i);
        }
        // 超出 i64 的純數字（帳號、條碼）轉成浮點會失去位數
        if !trimmed.contains('.') {
            return Value::String(raw.to_string());
        }
        if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}

/// 電話號碼之類以 0 或 + 開頭的字串必須維持文字
fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let Some(first) = digits.chars().next() else {
        return false;
    };
    if !first.is_ascii_digit() {
        return false;
    }
    if first == '0' && digits.len() > 1 && !digits.starts_with("0.") {
        return false;
    }
    digits.chars().all(|c| c.is_ascii_digit() || c == '.')
}
