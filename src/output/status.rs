//! Machine-readable status messages
//!
//! Every stage reports progress to stdout as pretty-printed JSON objects
//! with a `status` and an `info` field. Logging goes to stderr so the two
//! never interleave on the same stream.

use serde::Serialize;

/// Outcome carried by a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Info,
    Error,
    Failure,
}

/// A single status line for the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub status: Status,
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl StatusMessage {
    fn new(status: Status, info: impl Into<String>) -> Self {
        Self {
            status,
            info: Some(info.into()),
            url: None,
        }
    }

    pub fn success(info: impl Into<String>) -> Self {
        Self::new(Status::Success, info)
    }

    pub fn info(info: impl Into<String>) -> Self {
        Self::new(Status::Info, info)
    }

    pub fn error(info: impl Into<String>) -> Self {
        Self::new(Status::Error, info)
    }

    pub fn failure(info: impl Into<String>) -> Self {
        Self::new(Status::Failure, info)
    }

    /// Attaches the URL the message is about
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Prints the message to stdout
    pub fn emit(&self) {
        match self.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize status message: {}", e),
        }
    }
}
