use crate::config::OdooConfig;
use crate::domain::model::Record;
use crate::domain::ports::OdooApi;
use crate::odoo::xmlrpc;
use crate::utils::error::{ImportError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::RwLock;

/// 透過 XML-RPC 存取 Odoo；登入後的 uid 是唯一跨請求共享的狀態
pub struct OdooClient {
    config: OdooConfig,
    client: Client,
    uid: RwLock<Option<i64>>,
}

impl OdooClient {
    pub fn new(config: OdooConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            uid: RwLock::new(None),
        })
    }

    fn endpoint(&self, service: &str) -> String {
        format!(
            "{}/xmlrpc/2/{}",
            self.config.url.trim_end_matches('/'),
            service
        )
    }

    async fn call(&self, service: &str, method: &str, params: &[Value]) -> Result<Value> {
        let url = self.endpoint(service);
        tracing::debug!("XML-RPC {} -> {}", method, url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/xml")
            .body(xmlrpc::encode_call(method, params))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        xmlrpc::decode_response(&body)
    }

    /// 呼叫 `common.authenticate`，成功時回傳 uid
    pub async fn authenticate(&self) -> Result<i64> {
        let result = self
            .call(
                "common",
                "authenticate",
                &[
                    json!(self.config.db),
                    json!(self.config.username),
                    json!(self.config.password),
                    json!({}),
                ],
            )
            .await?;

        // Odoo 帳密錯誤時回傳 False 而不是 fault
        match result.as_i64() {
            Some(uid) if uid > 0 => Ok(uid),
            _ => Err(ImportError::AuthenticationError {
                username: self.config.username.clone(),
                db: self.config.db.clone(),
            }),
        }
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Option<Value>,
    ) -> Result<Value> {
        let uid = (*self.uid.read().await).ok_or(ImportError::NotConnectedError)?;

        let mut params = vec![
            json!(self.config.db),
            json!(uid),
            json!(self.config.password),
            json!(model),
            json!(method),
            args,
        ];
        if let Some(kwargs) = kwargs {
            params.push(kwargs);
        }

        self.call("object", "execute_kw", &params).await
    }
}

#[async_trait]
impl OdooApi for OdooClient {
    async fn connect(&self) -> bool {
        match self.authenticate().await {
            Ok(uid) => {
                *self.uid.write().await = Some(uid);
                tracing::info!(
                    "🔌 Connected to Odoo {} (db: {}, uid: {})",
                    self.config.url,
                    self.config.db,
                    uid
                );
                true
            }
            Err(e) => {
                *self.uid.write().await = None;
                tracing::error!("❌ Connection error: {}", e);
                false
            }
        }
    }

    async fn is_connected(&self) -> bool {
        self.uid.read().await.is_some()
    }

    async fn create(&self, model: &str, values: &Record) -> Result<i64> {
        let result = self
            .execute_kw(
                model,
                "create",
                Value::Array(vec![Value::Object(values.data.clone())]),
                None,
            )
            .await?;

        // 新版 Odoo 對 create([vals]) 可能回傳 [id]
        let id = match &result {
            Value::Number(n) => n.as_i64(),
            Value::Array(ids) if ids.len() == 1 => ids[0].as_i64(),
            _ => None,
        };
        id.ok_or_else(|| ImportError::protocol(format!("create on {} returned {}", model, result)))
    }

    async fn search_read(
        &self,
        model: &str,
        domain: Value,
        fields: &[&str],
    ) -> Result<Vec<Record>> {
        let result = self
            .execute_kw(
                model,
                "search_read",
                json!([domain]),
                Some(json!({ "fields": fields })),
            )
            .await?;

        match result {
            Value::Array(rows) => rows
                .into_iter()
                .map(|row| match row {
                    Value::Object(map) => Ok(Record::from(map)),
                    other => Err(ImportError::protocol(format!(
                        "search_read row is not a struct: {}",
                        other
                    ))),
                })
                .collect(),
            other => Err(ImportError::protocol(format!(
                "search_read on {} returned {}",
                model, other
            ))),
        }
    }
}
