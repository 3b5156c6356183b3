use crate::core::workbook::{self, SheetSelection};
use crate::core::{clean::clean, transform, OdooApi, Record};
use crate::domain::entity::{verify_fields_for_model, EntityType};
use crate::domain::model::{ImportReport, RowStatus, SheetData};
use crate::utils::error::{ImportError, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// 清理並轉換完成、準備送往 Odoo 的一列
#[derive(Debug, Clone)]
pub struct PreparedRow {
    pub sheet: String,
    pub row: usize,
    pub record: Record,
}

/// 試算表匯入管道：讀檔 → 清理 → 轉換 → 逐列建立 → 回讀驗證
#[derive(Clone)]
pub struct Importer {
    client: Arc<dyn OdooApi>,
}

impl Importer {
    pub fn new(client: Arc<dyn OdooApi>) -> Self {
        Self { client }
    }

    pub async fn import_sheet(
        &self,
        path: &Path,
        selection: SheetSelection,
        entity: EntityType,
    ) -> Result<ImportReport> {
        let path = path.to_path_buf();
        let sheets = tokio::task::spawn_blocking(move || workbook::read_workbook(&path, &selection))
            .await
            .map_err(|e| ImportError::ProcessingError {
                message: format!("Spreadsheet reader task failed: {}", e),
            })??;

        // 整份檔案先完成轉換，結構錯誤不會留下部分匯入
        let prepared = prepare_rows(entity, sheets)?;

        self.ensure_connected().await?;

        let model = entity.model();
        let mut report = ImportReport::default();
        for PreparedRow { sheet, row, record } in prepared {
            match self.client.create(model, &record).await {
                Ok(id) => {
                    tracing::debug!("Created {} record with ID: {}", model, id);
                    report.push(&sheet, row, RowStatus::Created(id));
                }
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Skipping sheet '{}' row {}: {} (values: {})",
                        sheet,
                        row,
                        e,
                        serde_json::Value::Object(record.data)
                    );
                    report.push(&sheet, row, RowStatus::Failed(e.to_string()));
                }
            }
        }

        tracing::info!(
            "📥 {} import finished: {} created, {} failed",
            entity,
            report.created_ids().len(),
            report.failures().len()
        );
        Ok(report)
    }

    pub async fn verify(&self, entity: EntityType, ids: &[i64]) -> Result<Vec<Record>> {
        self.verify_model(entity.model(), ids).await
    }

    /// 依 model 回讀指定欄位，未知 model 使用通用欄位
    pub async fn verify_model(&self, model: &str, ids: &[i64]) -> Result<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.client
            .search_read(
                model,
                json!([["id", "in", ids]]),
                verify_fields_for_model(model),
            )
            .await
    }

    async fn ensure_connected(&self) -> Result<()> {
        if self.client.is_connected().await {
            return Ok(());
        }

        tracing::warn!("Odoo session missing, reconnecting before import");
        if self.client.connect().await {
            Ok(())
        } else {
            Err(ImportError::NotConnectedError)
        }
    }
}

/// 清理、轉換並過濾空白列，保持工作表與列的順序
pub fn prepare_rows(entity: EntityType, sheets: Vec<SheetData>) -> Result<Vec<PreparedRow>> {
    let mut prepared = Vec::new();

    for sheet in sheets {
        tracing::info!("Processing sheet: {} ({} rows)", sheet.name, sheet.rows.len());

        for sheet_row in sheet.rows {
            let cleaned = clean(sheet_row.record);
            let record = transform::apply(entity, &sheet.name, sheet_row.row, cleaned)?;

            if record.is_empty() {
                tracing::debug!("Sheet '{}' row {} is empty, skipped", sheet.name, sheet_row.row);
                continue;
            }

            prepared.push(PreparedRow {
                sheet: sheet.name.clone(),
                row: sheet_row.row,
                record,
            });
        }
    }

    Ok(prepared)
}
