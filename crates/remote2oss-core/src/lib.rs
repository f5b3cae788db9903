pub mod config;
pub mod logging;

pub mod cache;
pub mod error;
pub mod fetch;
pub mod transfer;
pub mod upload;
pub mod url_model;
