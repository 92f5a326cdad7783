//! The slice of the Tact backend the timers talk to: turning a line of free text such as
//! "1h30m Fix auth bug" into a server side entry.

pub mod client;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::HttpEntryClient;

/// A work entry as returned by the backend. Only the fields the cli shows are kept, the rest of
/// the response is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub raw_text: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub entry_date: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryClient: Send + Sync {
    /// Creates a remote entry from free text. The backend parses duration and description out of
    /// it on its own.
    async fn create_entry(&self, raw_text: &str) -> Result<Entry>;
}
