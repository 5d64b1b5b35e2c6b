//! Reference packet-type enumeration.
//!
//! The per-packet-type version table is keyed against an externally
//! maintained, ordered list of packet-type names (the declaration order of
//! the peer's `PacketType` enum). This module loads that list from a plain
//! text artifact: one name per line, `#` comments and blank lines ignored.
//! The artifact is consumed read-only; only its count and name-to-index
//! assignments matter here.

use std::path::Path;

use crate::error::{Result, SignatureError};

/// Ordered packet-type name list with name-to-index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketTypeRegistry {
    names: Vec<String>,
}

impl PacketTypeRegistry {
    /// Parse a name list from text.
    ///
    /// Duplicate names are rejected: overrides are keyed by name lookups, so
    /// an ambiguous name would make index assignment depend on scan order.
    pub fn from_str(content: &str) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for line in content.lines() {
            let name = line.split('#').next().unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }
            if names.iter().any(|n| n == name) {
                return Err(SignatureError::DuplicateName(name.to_owned()).into());
            }
            names.push(name.to_owned());
        }
        Ok(Self { names })
    }

    /// Load a name list from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Build directly from an ordered name sequence.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut content = String::new();
        for name in names {
            content.push_str(&name.into());
            content.push('\n');
        }
        Self::from_str(&content)
    }

    /// Number of packet types in the enumeration.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index assigned to `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Index assigned to `name`, or an error naming the missing type.
    pub fn require(&self, name: &str) -> std::result::Result<usize, SignatureError> {
        self.index_of(name)
            .ok_or_else(|| SignatureError::UnknownPacketType(name.to_owned()))
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
