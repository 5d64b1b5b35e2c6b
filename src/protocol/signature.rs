//! Protocol-version fingerprinting.
//!
//! Two peers agree on the wire format when they agree on the version of every
//! packet type. Rather than exchanging each version individually, both sides
//! hash the packed version table and compare 16-byte digests:
//!
//! ```text
//! [count:u8] [version[0]:u8] [version[1]:u8] ... [version[count-1]:u8]
//! ```
//!
//! then MD5 over that sequence. This is a compatibility checksum, not a
//! security boundary; the digest must simply match the reference
//! implementation bit-for-bit.
//!
//! The table is described by a [`VersionTableSpec`]: a default version for
//! every slot, plus ordered overrides. An override's value is either a
//! literal or a reference to a named version constant (entity packets, for
//! example, all track a shared "entity version" counter), resolved before
//! packing. All validation happens before any digest work; there is no
//! partial signature.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::SignatureError;
use crate::protocol::registry::PacketTypeRegistry;

/// Where an override's version number comes from.
///
/// Named sources keep indirected values (a shared counter several packet
/// types track) symbolic until [`VersionTableSpec::compute`], so the table
/// stays reviewable against the reference enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionSource {
    Literal(u16),
    Named(String),
}

/// One override entry: packet-type index, version source, and an optional
/// note flagging reverse-engineered values that still need confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOverride {
    pub index: usize,
    pub source: VersionSource,
    pub note: Option<String>,
}

/// Declarative description of a per-packet-type version table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTableSpec {
    num_packet_types: usize,
    default_version: u16,
    constants: BTreeMap<String, u16>,
    overrides: Vec<VersionOverride>,
}

impl VersionTableSpec {
    pub fn new(num_packet_types: usize, default_version: u16) -> Self {
        Self {
            num_packet_types,
            default_version,
            constants: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }

    /// Seed a spec with the entry count of a reference enumeration.
    pub fn for_registry(registry: &PacketTypeRegistry, default_version: u16) -> Self {
        Self::new(registry.len(), default_version)
    }

    pub fn num_packet_types(&self) -> usize {
        self.num_packet_types
    }

    pub fn default_version(&self) -> u16 {
        self.default_version
    }

    pub fn overrides(&self) -> &[VersionOverride] {
        &self.overrides
    }

    /// Define a named version constant that overrides may reference.
    pub fn constant(mut self, name: impl Into<String>, value: u16) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    /// Override one index with a literal version.
    pub fn override_literal(mut self, index: usize, version: u16) -> Self {
        self.overrides.push(VersionOverride {
            index,
            source: VersionSource::Literal(version),
            note: None,
        });
        self
    }

    /// Override one index with a named constant's value.
    pub fn override_named(mut self, index: usize, name: impl Into<String>) -> Self {
        self.overrides.push(VersionOverride {
            index,
            source: VersionSource::Named(name.into()),
            note: None,
        });
        self
    }

    /// Append a fully-specified override entry (index, source, note).
    pub fn override_entry(mut self, entry: VersionOverride) -> Self {
        self.overrides.push(entry);
        self
    }

    /// Override a packet type by name, resolved against the reference
    /// enumeration at build time.
    pub fn override_packet(
        self,
        registry: &PacketTypeRegistry,
        name: &str,
        source: VersionSource,
    ) -> Result<Self, SignatureError> {
        let index = registry.require(name)?;
        Ok(self.override_entry(VersionOverride {
            index,
            source,
            note: None,
        }))
    }

    /// Build the resolved per-index version bytes.
    ///
    /// Overrides apply in insertion order, so two overrides addressing the
    /// same index resolve last-applied-wins, identically on every run.
    pub fn resolve(&self) -> Result<Vec<u8>, SignatureError> {
        if self.num_packet_types == 0 {
            return Err(SignatureError::EmptyEnumeration);
        }
        if self.num_packet_types > u8::MAX as usize {
            return Err(SignatureError::EnumerationTooLarge(self.num_packet_types));
        }
        if self.default_version > u8::MAX as u16 {
            return Err(SignatureError::DefaultVersionTooLarge(self.default_version));
        }

        let mut versions = vec![self.default_version as u8; self.num_packet_types];
        for entry in &self.overrides {
            if entry.index >= self.num_packet_types {
                return Err(SignatureError::IndexOutOfRange {
                    index: entry.index,
                    count: self.num_packet_types,
                });
            }
            let version = match &entry.source {
                VersionSource::Literal(v) => *v,
                VersionSource::Named(name) => *self
                    .constants
                    .get(name)
                    .ok_or_else(|| SignatureError::UnknownConstant(name.clone()))?,
            };
            if version > u8::MAX as u16 {
                return Err(SignatureError::VersionTooLarge {
                    index: entry.index,
                    version,
                });
            }
            versions[entry.index] = version as u8;
        }
        Ok(versions)
    }

    /// Serialize the table: one count byte, then one byte per packet type.
    pub fn pack(&self) -> Result<Vec<u8>, SignatureError> {
        let versions = self.resolve()?;
        let mut packed = Vec::with_capacity(1 + versions.len());
        packed.push(versions.len() as u8);
        packed.extend_from_slice(&versions);
        Ok(packed)
    }

    /// Validate, pack, and digest the table.
    pub fn compute(&self) -> Result<ProtocolSignature, SignatureError> {
        let packed = self.pack()?;
        let digest = Md5::digest(&packed);
        Ok(ProtocolSignature(digest.into()))
    }
}

/// The 16-byte compatibility fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolSignature([u8; 16]);

impl ProtocolSignature {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Standard base64 with padding.
    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(self.0)
    }

    /// Byte-array literal for embedding in a peer codebase.
    pub fn to_source_snippet(&self) -> String {
        let bytes = self
            .0
            .iter()
            .map(|b| format!("{b:#04x}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("pub const PROTOCOL_SIGNATURE: [u8; 16] = [{bytes}];")
    }
}

impl fmt::Display for ProtocolSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
