use crate::core::workbook::SheetSelection;
use crate::core::Record;
use crate::domain::entity::EntityType;
use crate::domain::model::FailedRow;
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::spreadsheet_extension;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    pub sheet_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    pub entity_type: EntityType,
    pub record_ids: Vec<i64>,
    pub verified_records: Vec<Record>,
    pub failed_rows: Vec<FailedRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub odoo_connected: bool,
}

struct Upload {
    filename: String,
    extension: String,
    bytes: Vec<u8>,
}

/// POST /import/{entity_type}
pub async fn import_data(
    State(state): State<AppState>,
    Path(entity_type): Path<String>,
    Query(params): Query<ImportParams>,
    mut multipart: Multipart,
) -> std::result::Result<Json<ImportResponse>, ApiError> {
    tracing::info!("Received request to import {}", entity_type);

    let entity: EntityType = entity_type.parse()?;
    let upload = read_upload(&mut multipart).await?;

    // 離開這個函式時（包含錯誤路徑）NamedTempFile 會被刪除
    let temp_file = save_upload(&state, &upload)?;
    tracing::debug!(
        "Saved '{}' ({} bytes) to {}",
        upload.filename,
        upload.bytes.len(),
        temp_file.path().display()
    );

    let selection = SheetSelection::from_option(params.sheet_name);
    let report = state
        .importer
        .import_sheet(temp_file.path(), selection, entity)
        .await?;

    let record_ids = report.created_ids();
    let mut warnings = Vec::new();

    // 資料已經建立，回讀失敗時仍回傳 id，避免呼叫端重送造成重複
    let verified_records = match state.importer.verify(entity, &record_ids).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                "⚠️ Created {} {} (IDs: {:?}) but verification failed: {}",
                record_ids.len(),
                entity,
                record_ids,
                e
            );
            warnings.push(format!("Created records could not be verified: {}", e));
            Vec::new()
        }
    };
    tracing::info!("✅ Successfully imported {} {}", record_ids.len(), entity);

    Ok(Json(ImportResponse {
        message: format!("Successfully imported {} {}", record_ids.len(), entity),
        entity_type: entity,
        record_ids,
        verified_records,
        failed_rows: report.failures(),
        warnings,
    }))
}

/// GET /health
pub async fn health(
    State(state): State<AppState>,
) -> std::result::Result<Json<HealthResponse>, ApiError> {
    if !state.client.is_connected().await && !state.client.connect().await {
        return Err(ImportError::NotConnectedError.into());
    }

    Ok(Json(HealthResponse {
        status: "healthy",
        odoo_connected: true,
    }))
}

/// 取出 `file` 欄位；副檔名在讀取內容之前檢查
async fn read_upload(multipart: &mut Multipart) -> std::result::Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ImportError::UploadError {
                message: format!("field '{}' has no file name", UPLOAD_FIELD),
            })?;
        let extension = spreadsheet_extension(&filename)?;
        let bytes = field.bytes().await?.to_vec();

        return Ok(Upload {
            filename,
            extension,
            bytes,
        });
    }

    Err(ImportError::UploadError {
        message: format!("multipart field '{}' is required", UPLOAD_FIELD),
    }
    .into())
}

fn save_upload(state: &AppState, upload: &Upload) -> Result<NamedTempFile> {
    std::fs::create_dir_all(&state.upload_dir)?;

    // 保留副檔名，calamine 依副檔名判斷格式
    let mut temp_file = tempfile::Builder::new()
        .prefix("upload_")
        .suffix(&format!(".{}", upload.extension))
        .tempfile_in(&state.upload_dir)?;
    temp_file.write_all(&upload.bytes)?;
    temp_file.flush()?;

    Ok(temp_file)
}
