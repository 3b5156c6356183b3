pub mod client;
pub mod xmlrpc;

pub use client::OdooClient;
