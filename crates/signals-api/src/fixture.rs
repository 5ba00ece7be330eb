//! JSON fixtures: a snapshot of signals and principals on disk.
//!
//! ```json
//! {
//!   "signals": [ { "id": 1, "text": "...", ... } ],
//!   "principals": [ { "email": "a@example.com", "departments": [1], "permissions": ["sia_read"] } ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use signals_core::{Principal, Signal};
use thiserror::Error;

use crate::store::MemoryStore;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate signal id {0} in fixture")]
    DuplicateSignal(i64),

    #[error("no principal with email {0:?} in fixture")]
    UnknownPrincipal(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub principals: Vec<Principal>,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture: Self =
            serde_json::from_str(&contents).map_err(|source| FixtureError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        fixture.validate()?;
        tracing::debug!(
            path = %path.display(),
            signals = fixture.signals.len(),
            principals = fixture.principals.len(),
            "loaded fixture"
        );
        Ok(fixture)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let mut seen = std::collections::BTreeSet::new();
        for signal in &self.signals {
            if !seen.insert(signal.id) {
                return Err(FixtureError::DuplicateSignal(signal.id));
            }
        }
        Ok(())
    }

    /// Case-insensitive lookup by email.
    pub fn principal(&self, email: &str) -> Result<&Principal, FixtureError> {
        self.principals
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email.trim()))
            .ok_or_else(|| FixtureError::UnknownPrincipal(email.to_string()))
    }

    #[must_use]
    pub fn store(&self) -> MemoryStore {
        self.signals.iter().cloned().collect()
    }
}
