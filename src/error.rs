//! # Error Types
//!
//! Error handling for the entity wire protocol.
//!
//! Failures are grouped by the stage that detects them:
//! - **Encode errors**: caller-supplied messages that cannot be represented
//!   on the wire (embedded NUL in a string field)
//! - **Decode errors**: malformed or truncated datagrams
//! - **Signature errors**: invalid version-table inputs, rejected before any
//!   digest is computed
//! - **I/O errors**: socket and file failures, passed through untransformed
//!
//! There is no recovery path at the point of detection: nothing is clamped,
//! truncated, or retried. All errors implement `std::error::Error`.

use std::io;
use thiserror::Error;

/// A message field cannot be encoded as supplied.
///
/// Encoding is total for well-formed input; the only rejection is a string
/// field that contains the wire terminator byte, which would change meaning
/// on the receiving side if silently truncated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("field `{field}` contains an embedded NUL byte")]
    EmbeddedNul { field: &'static str },
}

/// A received datagram does not parse as an entity message.
///
/// The decoder never reads past the end of the buffer; every variant here is
/// detected by a bounds check before the offending read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer truncated: needed {needed} more bytes for {field}")]
    Truncated { field: &'static str, needed: usize },

    #[error("string field `{field}` has no NUL terminator before end of buffer")]
    MissingTerminator { field: &'static str },

    #[error("string field `{field}` is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("unknown packet type byte: {0:#04x}")]
    UnknownPacketType(u8),

    #[error("edit flags {0:#04x} set undefined bits")]
    UnknownFlags(u8),

    #[error("{0} trailing bytes after end of message")]
    TrailingBytes(usize),
}

/// Version-table input rejected before fingerprint computation.
///
/// A partial or best-effort signature is never produced; any of these aborts
/// the whole computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("packet-type enumeration is empty")]
    EmptyEnumeration,

    #[error("packet-type enumeration has {0} entries, maximum is 255")]
    EnumerationTooLarge(usize),

    #[error("override index {index} out of range for {count} packet types")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("default version {0} does not fit in a byte")]
    DefaultVersionTooLarge(u16),

    #[error("version {version} at index {index} does not fit in a byte")]
    VersionTooLarge { index: usize, version: u16 },

    #[error("unknown version constant `{0}`")]
    UnknownConstant(String),

    #[error("unknown packet type `{0}`")]
    UnknownPacketType(String),

    #[error("duplicate packet type `{0}` in enumeration")]
    DuplicateName(String),
}

// ProtocolError is the top-level error type for library consumers
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("no handler registered for packet type {0:?}")]
    UnhandledPacket(crate::core::packet::PacketKind),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
