#![deny(warnings)]

//! Backend access for the energy-audit desk.
//!
//! [`Backend`] is the async surface the pages talk to. [`HttpBackend`] speaks
//! JSON over HTTP to the audit API; [`MemoryBackend`] keeps everything in
//! process and is used by tests and the offline CLI.

pub mod backend;
pub mod config;
pub mod http;
pub mod memory;

pub use backend::{AuditBody, Backend, EnergyAccountingBody, ImportBody, ReportBody};
pub use config::ClientConfig;
pub use http::HttpBackend;
pub use memory::{MemoryBackend, Op};

use thiserror::Error;

/// Failure talking to the backend. Every variant renders to a message fit
/// for display.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// Non-success HTTP status.
    #[error("{}", status_message(.method, .path, .status, .body))]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },
    #[error("network error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The raw response body when there is one, otherwise a generic line.
fn status_message(method: &str, path: &str, status: &u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("{method} {path} failed ({status})")
    } else {
        body.to_string()
    }
}

impl ClientError {
    /// HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_)) || self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<serde_yaml::Error> for ClientError {
    fn from(e: serde_yaml::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Config(e.to_string())
    }
}
