//! market-hex: hexagonal marketplace API library (services + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use market_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
