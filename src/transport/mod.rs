//! # Transport
//!
//! Datagram binding for the entity wire protocol.
//!
//! One encoded message per UDP datagram, fire-and-forget. The codec itself
//! is transport-agnostic; sockets and destinations live here.

pub mod udp;

pub use udp::{EntityInjector, EntityListener, DEFAULT_INJECT_PORT};
