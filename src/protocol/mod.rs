//! # Protocol Components
//!
//! Version-compatibility fingerprinting and receiver-side message routing.
//!
//! ## Components
//! - **Signature**: deterministic MD5 fingerprint over the packed
//!   per-packet-type version table
//! - **Registry**: the reference packet-type enumeration the table is keyed
//!   against
//! - **Overte**: the reverse-engineered 2025.05 table as preset data
//! - **Dispatcher**: per-packet-type handler routing for a receiver
//!
//! The signature is computed once per process and compared against the
//! peer's; it is never involved in per-packet encode/decode.

pub mod dispatcher;
pub mod overte;
pub mod registry;
pub mod signature;
