//! Shared configuration structures for the sortlab service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level service configuration, loaded from a TOML file by the binary.
///
/// Every field has a default so a missing or partial file still yields a
/// runnable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP gateway binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Path of the redb database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Origin allowed by CORS; the browser front end is served from here.
    #[serde(default = "default_client_origin")]
    pub client_origin: String,
    /// Per-IP sustained request rate.
    #[serde(default = "default_rps")]
    pub rps: u32,
    /// Per-IP burst allowance.
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Maximum request body size, in KiB.
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// CIDRs of proxies whose `x-forwarded-for` headers are trusted.
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("sortlab.redb")
}
fn default_client_origin() -> String {
    "http://localhost:5173".to_string()
}
fn default_rps() -> u32 {
    50
}
fn default_burst() -> u32 {
    100
}
fn default_body_limit_kb() -> usize {
    256
}
fn default_request_timeout_secs() -> u64 {
    2
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: default_db_path(),
            client_origin: default_client_origin(),
            rps: default_rps(),
            burst: default_burst(),
            body_limit_kb: default_body_limit_kb(),
            request_timeout_secs: default_request_timeout_secs(),
            trusted_proxies: Vec::new(),
        }
    }
}
