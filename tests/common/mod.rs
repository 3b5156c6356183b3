#![allow(dead_code)]

use async_trait::async_trait;
use odoo_sheet_import::{ImportError, OdooApi, Record, Result};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// 記憶體內的 Odoo，記錄所有呼叫
pub struct FakeOdoo {
    connected: Mutex<bool>,
    accept_login: bool,
    reject: Option<(String, Value)>,
    fail_reads: bool,
    next_id: AtomicI64,
    created: Mutex<Vec<(i64, String, Record)>>,
    connect_calls: AtomicUsize,
    create_calls: AtomicUsize,
    search_calls: AtomicUsize,
    last_fields: Mutex<Vec<String>>,
}

impl FakeOdoo {
    fn build(connected: bool, accept_login: bool) -> Self {
        Self {
            connected: Mutex::new(connected),
            accept_login,
            reject: None,
            fail_reads: false,
            next_id: AtomicI64::new(1),
            created: Mutex::new(Vec::new()),
            connect_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            last_fields: Mutex::new(Vec::new()),
        }
    }

    /// 已登入且接受所有資料
    pub fn new() -> Self {
        Self::build(true, true)
    }

    /// 尚未登入，但重新登入會成功
    pub fn disconnected() -> Self {
        Self::build(false, true)
    }

    /// 無法登入
    pub fn offline() -> Self {
        Self::build(false, false)
    }

    /// 欄位等於指定值的資料會被拒絕
    pub fn rejecting(field: &str, value: Value) -> Self {
        let mut fake = Self::new();
        fake.reject = Some((field.to_string(), value));
        fake
    }

    /// 建立成功，但回讀時 Odoo 回報錯誤
    pub fn failing_reads() -> Self {
        let mut fake = Self::new();
        fake.fail_reads = true;
        fake
    }

    pub fn created(&self) -> Vec<Record> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, record)| record.clone())
            .collect()
    }

    pub fn created_models(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(_, model, _)| model.clone())
            .collect()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn last_fields(&self) -> Vec<String> {
        self.last_fields.lock().unwrap().clone()
    }
}

#[async_trait]
impl OdooApi for FakeOdoo {
    async fn connect(&self) -> bool {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        *self.connected.lock().unwrap() = self.accept_login;
        self.accept_login
    }

    async fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }

    async fn create(&self, model: &str, values: &Record) -> Result<i64> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if !*self.connected.lock().unwrap() {
            return Err(ImportError::NotConnectedError);
        }

        if let Some((field, rejected)) = &self.reject {
            if values.get(field) == Some(rejected) {
                return Err(ImportError::FaultError {
                    code: "2".to_string(),
                    message: format!("ValidationError: invalid value for {}", field),
                });
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap()
            .push((id, model.to_string(), values.clone()));
        Ok(id)
    }

    async fn search_read(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
    ) -> Result<Vec<Record>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if !*self.connected.lock().unwrap() {
            return Err(ImportError::NotConnectedError);
        }
        *self.last_fields.lock().unwrap() = fields.iter().map(|f| f.to_string()).collect();
        if self.fail_reads {
            return Err(ImportError::FaultError {
                code: "1".to_string(),
                message: "AccessError: read access denied".to_string(),
            });
        }

        // 只支援 [["id", "in", [...]]]
        let ids: Vec<i64> = domain[0][2]
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
            .unwrap_or_default();

        let created = self.created.lock().unwrap();
        Ok(created
            .iter()
            .filter(|(id, created_model, _)| created_model == model && ids.contains(id))
            .map(|(id, _, record)| {
                fields
                    .iter()
                    .map(|field| {
                        let value = if *field == "id" {
                            Value::from(*id)
                        } else {
                            record.get(field).cloned().unwrap_or(Value::Bool(false))
                        };
                        (field.to_string(), value)
                    })
                    .collect()
            })
            .collect())
    }
}

/// 以 rust_xlsxwriter 建立測試用活頁簿；每個工作表第一列為欄位名稱
pub fn xlsx_bytes(sheets: &[(&str, Vec<Vec<Value>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();

        for (row_index, row) in rows.iter().enumerate() {
            for (col_index, value) in row.iter().enumerate() {
                let row = row_index as u32;
                let col = col_index as u16;
                match value {
                    Value::String(text) => {
                        worksheet.write_string(row, col, text).unwrap();
                    }
                    Value::Number(number) => {
                        worksheet
                            .write_number(row, col, number.as_f64().unwrap())
                            .unwrap();
                    }
                    Value::Bool(flag) => {
                        worksheet.write_boolean(row, col, *flag).unwrap();
                    }
                    Value::Null => {}
                    other => panic!("unsupported fixture value: {}", other),
                }
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

pub fn write_xlsx(dir: &Path, filename: &str, sheets: &[(&str, Vec<Vec<Value>>)]) -> PathBuf {
    let path = dir.join(filename);
    std::fs::write(&path, xlsx_bytes(sheets)).unwrap();
    path
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
