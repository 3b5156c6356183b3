pub mod clean;
pub mod importer;
pub mod transform;
pub mod workbook;

pub use crate::domain::model::{ImportReport, Record};
pub use crate::domain::ports::OdooApi;
pub use crate::utils::error::Result;
