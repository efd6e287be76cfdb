//! Data models: configuration and extraction requests/results.

pub mod config;
pub mod request;
