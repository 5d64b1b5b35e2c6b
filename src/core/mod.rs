//! # Core Wire Components
//!
//! Low-level datagram handling: primitive wire I/O and the entity message
//! codec.
//!
//! ## Components
//! - **Wire**: bounds-checked little-endian readers/writers
//! - **Packet**: the three entity-control messages and their layouts
//!
//! ## Wire Format
//! ```text
//! [Type(1)] [EntityId(8)] [variant-specific payload]
//! ```
//!
//! One message per datagram, little-endian, no padding. Strings are
//! NUL-terminated UTF-8, which is why an embedded NUL in a field is an
//! encode-time error rather than a silent truncation.

pub mod packet;
pub mod wire;
