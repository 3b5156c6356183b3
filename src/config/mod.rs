pub mod cli;
pub mod toml_config;

pub use cli::CliConfig;

use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub odoo: OdooConfig,
    pub server: ServerConfig,
}

#[derive(Clone)]
pub struct OdooConfig {
    pub url: String,
    pub db: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

// 密碼不進日誌
impl fmt::Debug for OdooConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdooConfig")
            .field("url", &self.url)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub upload_dir: PathBuf,
    pub max_upload_mb: u64,
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

impl Validate for OdooConfig {
    fn validate(&self) -> Result<()> {
        validate_url("odoo_url", &self.url)?;
        validate_non_empty_string("odoo_db", &self.db)?;
        validate_non_empty_string("odoo_username", &self.username)?;
        validate_positive_number("odoo_timeout_secs", self.timeout_secs, 1)?;
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("bind", &self.bind)?;
        validate_positive_number("max_upload_mb", self.max_upload_mb, 1)?;
        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.odoo.validate()?;
        self.server.validate()
    }
}
