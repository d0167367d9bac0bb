//! In-memory record store keyed by user.
//!
//! Records are loaded once (from a JSON document or the mock generator) and
//! only read afterwards. The JSON layout is:
//!
//! ```json
//! {
//!   "users": [{"id": "u1", "name": "Alice"}],
//!   "records": {"u1": [{"sector": "Retail", "startDate": "2024-04-01", "...": "..."}]}
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{Record, User};

/// Per-user spend records plus the ordered list of selectable users.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSource {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    records: HashMap<String, Vec<Record>>,
}

impl RecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a source from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let source: RecordSource = serde_json::from_str(json)?;
        log::info!(
            "loaded {} records for {} users",
            source.record_count(),
            source.users.len()
        );
        Ok(source)
    }

    /// Read and parse a JSON document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("reading record source from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize back to a pretty-printed JSON document.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a user with their records, replacing any existing entry for the
    /// same id. A replaced user keeps their position in the list.
    pub fn insert_user(&mut self, user: User, records: Vec<Record>) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => self.users.push(user.clone()),
        }
        self.records.insert(user.id, records);
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Records for `id`; empty for unknown users.
    pub fn records_for(&self, id: &str) -> &[Record] {
        self.records.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total records across all users.
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}
