//! # entity-protocol
//!
//! Entity-control wire codec and protocol-version fingerprinting for
//! Overte-style virtual-world clients.
//!
//! Two independent pieces, composed only by the caller:
//!
//! - **Packet codec** ([`core::packet`]): the three fixed-layout entity
//!   messages (add / edit / erase) carried one-per-datagram over UDP.
//! - **Signature computer** ([`protocol::signature`]): the deterministic
//!   16-byte fingerprint over a packed per-packet-type version table, used to
//!   verify that two peers agree on the wire format.
//!
//! ## Example
//! ```
//! use entity_protocol::{EntityAdd, EntityMessage, Quat, Vec3};
//!
//! let msg = EntityMessage::Add(EntityAdd {
//!     id: 1001,
//!     name: "RedCube".into(),
//!     position: Vec3::new(0.0, 1.5, -2.0),
//!     rotation: Quat::IDENTITY,
//!     dimensions: Vec3::splat(0.3),
//!     model_url: String::new(),
//!     texture_url: String::new(),
//!     color: Vec3::new(1.0, 0.0, 0.0),
//! });
//!
//! let bytes = msg.encode()?;
//! assert_eq!(EntityMessage::decode(&bytes)?, msg);
//! # Ok::<(), entity_protocol::error::ProtocolError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod utils;

pub use crate::core::packet::{
    EntityAdd, EntityEdit, EntityErase, EntityId, EntityMessage, PacketKind, Quat, Vec3,
};
pub use error::{DecodeError, EncodeError, ProtocolError, Result, SignatureError};
pub use protocol::registry::PacketTypeRegistry;
pub use protocol::signature::{ProtocolSignature, VersionSource, VersionTableSpec};
pub use transport::{EntityInjector, EntityListener, DEFAULT_INJECT_PORT};
