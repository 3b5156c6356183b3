use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 試算表的一列資料：欄位名稱 → 值，保留欄位順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.data.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

/// 解析後的單一工作表
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub rows: Vec<SheetRow>,
}

/// 工作表中的一列，`row` 為試算表上看到的列號（從 1 起算）
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub row: usize,
    pub record: Record,
}

/// 單列匯入結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Created(i64),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
    pub sheet: String,
    pub row: usize,
    pub status: RowStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedRow {
    pub sheet: String,
    pub row: usize,
    pub reason: String,
}

/// 一次匯入呼叫的逐列結果，依工作表與列號排序
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub outcomes: Vec<RowOutcome>,
}

impl ImportReport {
    pub fn push(&mut self, sheet: &str, row: usize, status: RowStatus) {
        self.outcomes.push(RowOutcome {
            sheet: sheet.to_string(),
            row,
            status,
        });
    }

    pub fn created_ids(&self) -> Vec<i64> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome.status {
                RowStatus::Created(id) => Some(id),
                RowStatus::Failed(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<FailedRow> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.status {
                RowStatus::Failed(reason) => Some(FailedRow {
                    sheet: outcome.sheet.clone(),
                    row: outcome.row,
                    reason: reason.clone(),
                }),
                RowStatus::Created(_) => None,
            })
            .collect()
    }
}
