#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Signature computer tests: reference vectors, determinism, and the full
//! input-validation surface.

use entity_protocol::error::SignatureError;
use entity_protocol::protocol::overte;
use entity_protocol::{PacketTypeRegistry, VersionSource, VersionTableSpec};

// ============================================================================
// REFERENCE VECTORS
// ============================================================================

#[test]
fn test_example_vector_packs_and_digests() {
    let spec = VersionTableSpec::new(3, 1);
    assert_eq!(spec.pack().unwrap(), vec![0x03, 0x01, 0x01, 0x01]);

    let sig = spec.compute().unwrap();
    assert_eq!(sig.to_hex(), "4dc448bff05efae7aea7475fcdbedfa9");
    assert_eq!(sig.to_base64(), "TcRIv/Be+ueup0dfzb7fqQ==");
    assert_eq!(
        sig.as_bytes(),
        &[
            0x4d, 0xc4, 0x48, 0xbf, 0xf0, 0x5e, 0xfa, 0xe7, 0xae, 0xa7, 0x47, 0x5f, 0xcd, 0xbe,
            0xdf, 0xa9
        ]
    );
}

#[test]
fn test_stable_overte_style_table() {
    let spec = VersionTableSpec::new(137, 22)
        .override_literal(1, 17)
        .override_literal(2, 25);
    let sig = spec.compute().unwrap();
    assert_eq!(sig.to_hex(), "90b242059c5c5b18b41559d2191fb928");
}

// ============================================================================
// DETERMINISM
// ============================================================================

#[test]
fn test_identical_inputs_identical_digest() {
    let build = || {
        VersionTableSpec::new(137, 22)
            .override_literal(1, 17)
            .override_literal(2, 25)
    };
    let first = build().compute().unwrap();
    let second = build().compute().unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
    assert_eq!(first.to_hex(), second.to_hex());
}

#[test]
fn test_override_changes_digest() {
    let base = VersionTableSpec::new(137, 22).compute().unwrap();
    let overridden = VersionTableSpec::new(137, 22)
        .override_literal(1, 17)
        .compute()
        .unwrap();
    assert_ne!(base.as_bytes(), overridden.as_bytes());
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

#[test]
fn test_override_index_out_of_range() {
    let err = VersionTableSpec::new(137, 22)
        .override_literal(200, 5)
        .compute()
        .unwrap_err();
    assert_eq!(
        err,
        SignatureError::IndexOutOfRange {
            index: 200,
            count: 137
        }
    );
}

#[test]
fn test_index_just_past_end_is_rejected() {
    let err = VersionTableSpec::new(137, 22)
        .override_literal(137, 5)
        .compute()
        .unwrap_err();
    assert!(matches!(err, SignatureError::IndexOutOfRange { .. }));

    // last valid slot works
    VersionTableSpec::new(137, 22)
        .override_literal(136, 5)
        .compute()
        .unwrap();
}

#[test]
fn test_default_version_out_of_range() {
    let err = VersionTableSpec::new(137, 300).compute().unwrap_err();
    assert_eq!(err, SignatureError::DefaultVersionTooLarge(300));
}

#[test]
fn test_override_version_out_of_range() {
    let err = VersionTableSpec::new(137, 22)
        .override_literal(3, 256)
        .compute()
        .unwrap_err();
    assert_eq!(
        err,
        SignatureError::VersionTooLarge {
            index: 3,
            version: 256
        }
    );
}

#[test]
fn test_empty_enumeration_rejected() {
    let err = VersionTableSpec::new(0, 22).compute().unwrap_err();
    assert_eq!(err, SignatureError::EmptyEnumeration);
}

#[test]
fn test_oversized_enumeration_rejected() {
    let err = VersionTableSpec::new(256, 22).compute().unwrap_err();
    assert_eq!(err, SignatureError::EnumerationTooLarge(256));
}

#[test]
fn test_unknown_constant_rejected() {
    let err = VersionTableSpec::new(10, 22)
        .override_named(2, "entity_version")
        .compute()
        .unwrap_err();
    assert_eq!(
        err,
        SignatureError::UnknownConstant("entity_version".into())
    );
}

#[test]
fn test_resolved_constant_out_of_range() {
    let err = VersionTableSpec::new(10, 22)
        .constant("entity_version", 999)
        .override_named(2, "entity_version")
        .compute()
        .unwrap_err();
    assert_eq!(
        err,
        SignatureError::VersionTooLarge {
            index: 2,
            version: 999
        }
    );
}

// ============================================================================
// REGISTRY INTEGRATION
// ============================================================================

const PACKET_LIST: &str = "\
Unknown
StunResponse
DomainList
Ping
PingReply
KillAvatar
AvatarData
";

#[test]
fn test_override_by_packet_name() {
    let registry = PacketTypeRegistry::from_str(PACKET_LIST).unwrap();
    let spec = VersionTableSpec::for_registry(&registry, 22)
        .override_packet(&registry, "DomainList", VersionSource::Literal(25))
        .unwrap();

    let versions = spec.resolve().unwrap();
    assert_eq!(versions.len(), 7);
    assert_eq!(versions[2], 25);
}

#[test]
fn test_override_unknown_packet_name() {
    let registry = PacketTypeRegistry::from_str(PACKET_LIST).unwrap();
    let err = VersionTableSpec::for_registry(&registry, 22)
        .override_packet(&registry, "EntityAdd", VersionSource::Literal(68))
        .unwrap_err();
    assert_eq!(err, SignatureError::UnknownPacketType("EntityAdd".into()));
}

// ============================================================================
// OVERTE PRESET
// ============================================================================

#[test]
fn test_overte_preset_computes() {
    let sig = overte::version_table_spec().compute().unwrap();
    assert_eq!(sig.to_hex().len(), 32);
    assert_eq!(sig.to_base64().len(), 24);
}

#[test]
fn test_overte_preset_named_groups_resolve() {
    let versions = overte::version_table_spec().resolve().unwrap();
    // entity group all track the shared counter
    for index in [23, 88, 25, 21, 68] {
        assert_eq!(versions[index], 68);
    }
    // avatar group
    for index in [29, 6, 11, 5] {
        assert_eq!(versions[index], 25);
    }
}

#[test]
fn test_source_snippet_contains_all_bytes() {
    let sig = VersionTableSpec::new(3, 1).compute().unwrap();
    let snippet = sig.to_source_snippet();
    assert!(snippet.contains("[u8; 16]"));
    assert!(snippet.contains("0x4d"));
    assert!(snippet.ends_with("];"));
}
