use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Odoo request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Odoo fault {code}: {message}")]
    FaultError { code: String, message: String },

    #[error("Malformed XML-RPC response: {0}")]
    XmlError(#[from] roxmltree::Error),

    #[error("Unexpected XML-RPC payload: {message}")]
    ProtocolError { message: String },

    #[error("Not connected to Odoo server")]
    NotConnectedError,

    #[error("Authentication rejected for user '{username}' on database '{db}'")]
    AuthenticationError { username: String, db: String },

    #[error("Spreadsheet could not be read: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sheet '{sheet}' not found in workbook")]
    SheetNotFoundError { sheet: String },

    #[error("Invalid order_line JSON format in sheet '{sheet}' row {row}: {reason}")]
    OrderLineError {
        sheet: String,
        row: usize,
        reason: String,
    },

    #[error("Unsupported data type: {name}. Use: contacts, leads, or sales")]
    UnsupportedEntityError { name: String },

    #[error("File must be a spreadsheet (.xlsx, .xlsm, .xlsb, .xls, .ods, .csv), got '{filename}'")]
    UnsupportedFileError { filename: String },

    #[error("Missing upload: {message}")]
    UploadError { message: String },

    #[error("Upload too large: {message}")]
    UploadTooLargeError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，決定 HTTP 狀態碼與是否中止整批匯入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入錯誤，在任何遠端呼叫前拒絕
    Validation,
    /// 沒有可用的 Odoo session
    Authentication,
    /// Odoo 回報錯誤或傳輸失敗
    Remote,
    /// 上傳檔案結構損壞，整批中止
    Structural,
    Internal,
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::UnsupportedEntityError { .. }
            | ImportError::UnsupportedFileError { .. }
            | ImportError::UploadError { .. }
            | ImportError::UploadTooLargeError { .. }
            | ImportError::SheetNotFoundError { .. }
            | ImportError::ConfigError { .. }
            | ImportError::InvalidConfigValueError { .. } => ErrorCategory::Validation,
            ImportError::NotConnectedError | ImportError::AuthenticationError { .. } => {
                ErrorCategory::Authentication
            }
            ImportError::ApiError(_)
            | ImportError::FaultError { .. }
            | ImportError::XmlError(_)
            | ImportError::ProtocolError { .. } => ErrorCategory::Remote,
            ImportError::WorkbookError(_)
            | ImportError::CsvError(_)
            | ImportError::OrderLineError { .. } => ErrorCategory::Structural,
            ImportError::IoError(_) | ImportError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        ImportError::ProtocolError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
