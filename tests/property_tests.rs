//! Property-based tests using proptest
//!
//! These tests validate codec and signature invariants across a wide range of
//! randomly generated inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use entity_protocol::{
    EntityAdd, EntityEdit, EntityErase, EntityMessage, Quat, Vec3, VersionTableSpec,
};
use proptest::prelude::*;

fn arb_wire_string() -> impl Strategy<Value = String> {
    // Any UTF-8 content is representable except the terminator byte itself
    any::<String>().prop_map(|s| s.replace('\0', ""))
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (any::<f32>(), any::<f32>(), any::<f32>()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_quat() -> impl Strategy<Value = Quat> {
    (any::<f32>(), any::<f32>(), any::<f32>(), any::<f32>())
        .prop_map(|(x, y, z, w)| Quat::new(x, y, z, w))
}

fn arb_add() -> impl Strategy<Value = EntityAdd> {
    (
        any::<u64>(),
        arb_wire_string(),
        arb_vec3(),
        arb_quat(),
        arb_vec3(),
        arb_wire_string(),
        arb_wire_string(),
        arb_vec3(),
    )
        .prop_map(
            |(id, name, position, rotation, dimensions, model_url, texture_url, color)| {
                EntityAdd {
                    id,
                    name,
                    position,
                    rotation,
                    dimensions,
                    model_url,
                    texture_url,
                    color,
                }
            },
        )
}

fn arb_edit() -> impl Strategy<Value = EntityEdit> {
    (
        any::<u64>(),
        prop::option::of(arb_vec3()),
        prop::option::of(arb_quat()),
        prop::option::of(arb_vec3()),
    )
        .prop_map(|(id, position, rotation, dimensions)| EntityEdit {
            id,
            position,
            rotation,
            dimensions,
        })
}

fn arb_message() -> impl Strategy<Value = EntityMessage> {
    prop_oneof![
        arb_add().prop_map(EntityMessage::Add),
        arb_edit().prop_map(EntityMessage::Edit),
        any::<u64>().prop_map(|id| EntityMessage::Erase(EntityErase { id })),
    ]
}

// Property: every representable message round-trips exactly
proptest! {
    #[test]
    fn prop_message_roundtrip(msg in arb_message()) {
        let bytes = msg.encode().expect("encoding is total for valid messages");
        let decoded = EntityMessage::decode(&bytes).expect("own encoding must decode");
        prop_assert_eq!(decoded, msg);
    }
}

// Property: encoding is deterministic
proptest! {
    #[test]
    fn prop_encoding_deterministic(msg in arb_message()) {
        prop_assert_eq!(msg.encode().unwrap(), msg.encode().unwrap());
    }
}

// Property: encoded_len predicts the exact wire size
proptest! {
    #[test]
    fn prop_encoded_len_accurate(msg in arb_message()) {
        prop_assert_eq!(msg.encode().unwrap().len(), msg.encoded_len());
    }
}

// Property: the leading byte always identifies the variant
proptest! {
    #[test]
    fn prop_type_byte_matches_kind(msg in arb_message()) {
        let bytes = msg.encode().unwrap();
        prop_assert_eq!(bytes[0], msg.kind().as_byte());
    }
}

// Property: decoding arbitrary bytes returns an error or a message (never panics)
proptest! {
    #[test]
    fn prop_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = EntityMessage::decode(&data);
        prop_assert!(true);
    }
}

// Property: whatever decodes must re-encode to the identical bytes
proptest! {
    #[test]
    fn prop_decode_encode_identity(data in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(msg) = EntityMessage::decode(&data) {
            let encoded = msg.encode().unwrap();
            prop_assert_eq!(encoded.as_ref(), &data[..]);
        }
    }
}

// Property: signatures are deterministic, and in-range tables always compute
proptest! {
    #[test]
    fn prop_signature_deterministic(
        count in 1usize..=255,
        default in 0u16..=255,
        overrides in prop::collection::vec((0usize..255, 0u16..=255), 0..16)
    ) {
        let mut spec = VersionTableSpec::new(count, default);
        let mut in_range = true;
        for (index, version) in overrides {
            in_range &= index < count;
            spec = spec.override_literal(index, version);
        }

        let first = spec.compute();
        let second = spec.compute();
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a.as_bytes(), b.as_bytes()),
            (Err(a), Err(b)) => {
                prop_assert!(!in_range, "errors only arise from out-of-range overrides here");
                prop_assert_eq!(a, b);
            }
            _ => prop_assert!(false, "compute must be deterministic"),
        }
    }
}

// Property: the packed table is one count byte plus one byte per entry
proptest! {
    #[test]
    fn prop_packed_layout(count in 1usize..=255, default in 0u16..=255) {
        let packed = VersionTableSpec::new(count, default).pack().unwrap();
        prop_assert_eq!(packed.len(), count + 1);
        prop_assert_eq!(packed[0] as usize, count);
        prop_assert!(packed[1..].iter().all(|&v| v == default as u8));
    }
}
