use crate::config::toml_config::FileConfig;
use crate::config::{AppConfig, OdooConfig, ServerConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_ODOO_URL: &str = "http://localhost:8069";
pub const DEFAULT_ODOO_DB: &str = "odoo";
pub const DEFAULT_ODOO_USERNAME: &str = "admin";
pub const DEFAULT_ODOO_PASSWORD: &str = "admin";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 20;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "odoo-sheet-import")]
#[command(about = "HTTP service that imports spreadsheet rows into Odoo")]
pub struct CliConfig {
    #[arg(long, env = "ODOO_URL")]
    pub odoo_url: Option<String>,

    #[arg(long, env = "ODOO_DB")]
    pub odoo_db: Option<String>,

    #[arg(long, env = "ODOO_USERNAME")]
    pub odoo_username: Option<String>,

    #[arg(long, env = "ODOO_PASSWORD", hide_env_values = true)]
    pub odoo_password: Option<String>,

    #[arg(long, env = "ODOO_TIMEOUT_SECS")]
    pub odoo_timeout_secs: Option<u64>,

    #[arg(long, env = "BIND_ADDR")]
    pub bind: Option<String>,

    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    #[arg(long, env = "MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<u64>,

    #[arg(long, env = "IMPORT_CONFIG", help = "Optional TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 合併命令列/環境變數、設定檔與預設值，優先順序依序遞減
    pub fn resolve(&self) -> Result<AppConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Ok(self.resolve_with(file))
    }

    pub fn resolve_with(&self, file: FileConfig) -> AppConfig {
        let FileConfig { odoo, server } = file;

        let odoo = OdooConfig {
            url: pick(&self.odoo_url, odoo.url, DEFAULT_ODOO_URL),
            db: pick(&self.odoo_db, odoo.db, DEFAULT_ODOO_DB),
            username: pick(&self.odoo_username, odoo.username, DEFAULT_ODOO_USERNAME),
            password: pick(&self.odoo_password, odoo.password, DEFAULT_ODOO_PASSWORD),
            timeout_secs: self
                .odoo_timeout_secs
                .or(odoo.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let server = ServerConfig {
            bind: pick(&self.bind, server.bind, DEFAULT_BIND),
            upload_dir: self
                .upload_dir
                .clone()
                .or(server.upload_dir)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_mb: self
                .max_upload_mb
                .or(server.max_upload_mb)
                .unwrap_or(DEFAULT_MAX_UPLOAD_MB),
        };

        AppConfig { odoo, server }
    }
}

fn pick(flag: &Option<String>, file: Option<String>, default: &str) -> String {
    flag.clone()
        .or(file)
        .unwrap_or_else(|| default.to_string())
}
