use crate::utils::error::ImportError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 可匯入的目標，每個對應一個 Odoo model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Contacts,
    Leads,
    Sales,
}

const PARTNER_FIELDS: &[&str] = &["id", "name", "email", "phone", "company_type"];
const LEAD_FIELDS: &[&str] = &["id", "name", "contact_name", "email_from", "stage_id"];
const ORDER_FIELDS: &[&str] = &["id", "name", "partner_id", "amount_total"];
const DEFAULT_FIELDS: &[&str] = &["id", "name", "create_date"];

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Contacts, EntityType::Leads, EntityType::Sales];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Contacts => "contacts",
            EntityType::Leads => "leads",
            EntityType::Sales => "sales",
        }
    }

    pub fn model(self) -> &'static str {
        match self {
            EntityType::Contacts => "res.partner",
            EntityType::Leads => "crm.lead",
            EntityType::Sales => "sale.order",
        }
    }

    pub fn verify_fields(self) -> &'static [&'static str] {
        verify_fields_for_model(self.model())
    }
}

/// 匯入後回讀時要求的欄位；未知的 model 使用通用欄位
pub fn verify_fields_for_model(model: &str) -> &'static [&'static str] {
    match model {
        "res.partner" => PARTNER_FIELDS,
        "crm.lead" => LEAD_FIELDS,
        "sale.order" => ORDER_FIELDS,
        _ => DEFAULT_FIELDS,
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| ImportError::UnsupportedEntityError {
                name: s.to_string(),
            })
    }
}
