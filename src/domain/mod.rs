// Domain layer: records, entity types and the Odoo port. No transport code here.

pub mod entity;
pub mod model;
pub mod ports;
