use crate::domain::model::Record;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Odoo 遠端介面，匯入管道與 HTTP 層都只依賴這個 trait
#[async_trait]
pub trait OdooApi: Send + Sync {
    /// 以設定中的帳號登入；失敗時清除 session 並回傳 false
    async fn connect(&self) -> bool;

    async fn is_connected(&self) -> bool;

    /// 建立單筆資料，回傳新的 id
    async fn create(&self, model: &str, values: &Record) -> Result<i64>;

    /// 依 domain 過濾並只讀回指定欄位
    async fn search_read(&self, model: &str, domain: Value, fields: &[&str])
        -> Result<Vec<Record>>;
}
