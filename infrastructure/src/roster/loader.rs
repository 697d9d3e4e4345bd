//! Roster file loading
//!
//! Rosters are TOML files with one `[[electors]]` table per participant.
//! Ids are assigned densely in file order.
//!
//! ```toml
//! [[electors]]
//! name = "Pietro Parolin"
//! background = "Secretary of State, diplomat"
//!
//! [[electors]]
//! name = "Luis Antonio Tagle"
//! background = "Pro-Prefect for Evangelization"
//! vote_for = 0      # scripted electors only
//! urgency = 80      # scripted electors only
//! ```

use conclave_domain::{AgentId, Roster};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a roster file
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse roster: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Roster contains no electors")]
    Empty,

    #[error("Elector #{0} has an empty name")]
    EmptyName(usize),
}

/// One `[[electors]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub background: String,
    /// Fixed preference for scripted electors
    #[serde(default)]
    pub vote_for: Option<usize>,
    /// Fixed urgency for scripted electors
    #[serde(default)]
    pub urgency: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    electors: Vec<RosterEntry>,
}

/// A parsed roster together with the raw entries it was built from
#[derive(Debug, Clone)]
pub struct LoadedRoster {
    pub roster: Roster,
    pub entries: Vec<RosterEntry>,
}

impl LoadedRoster {
    /// Keep only the first `limit` electors
    ///
    /// A limit that leaves nobody is rejected like an empty file.
    pub fn truncated(self, limit: usize) -> Result<Self, RosterError> {
        if limit == 0 {
            return Err(RosterError::Empty);
        }
        let mut entries = self.entries;
        entries.truncate(limit);
        Ok(Self {
            roster: self.roster.truncated(limit),
            entries,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry for elector `id`
    pub fn entry(&self, id: AgentId) -> Option<&RosterEntry> {
        self.entries.get(id.index())
    }
}

/// Reads roster files
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedRoster, RosterError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<LoadedRoster, RosterError> {
        let file: RosterFile = toml::from_str(content)?;
        if file.electors.is_empty() {
            return Err(RosterError::Empty);
        }
        if let Some(position) = file.electors.iter().position(|e| e.name.trim().is_empty()) {
            return Err(RosterError::EmptyName(position));
        }

        let roster = Roster::from_entries(
            file.electors
                .iter()
                .map(|entry| (entry.name.trim(), entry.background.trim())),
        );

        Ok(LoadedRoster {
            roster,
            entries: file.electors,
        })
    }
}
