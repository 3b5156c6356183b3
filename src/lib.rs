pub mod config;
pub mod core;
pub mod domain;
pub mod odoo;
pub mod server;
pub mod utils;

pub use config::{AppConfig, CliConfig};
pub use crate::core::importer::Importer;
pub use crate::core::workbook::SheetSelection;
pub use domain::entity::EntityType;
pub use domain::model::{ImportReport, Record};
pub use domain::ports::OdooApi;
pub use odoo::OdooClient;
pub use utils::error::{ImportError, Result};
