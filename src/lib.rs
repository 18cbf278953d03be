pub mod allowlist;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod header;
pub mod mapping;
pub mod output;
pub mod selection;
pub mod store;
