//! Overte 2025.05 version-table preset.
//!
//! The reverse-engineered `versionForPacketType()` mapping for the stable
//! Overte release, recorded as data so individual entries can be corrected
//! independently as they are confirmed against a live peer. Groups that the
//! reference implementation indirects through shared counters
//! (`EntityVersion`, `DomainListVersion::SocketTypes`, ...) use named
//! constants here so the indirection survives into the table.
//!
//! Entries still carrying a `note` are unconfirmed; treat this preset as a
//! starting point and override per deployment via `SignatureConfig`.

use crate::protocol::signature::{VersionOverride, VersionSource, VersionTableSpec};

/// `PacketType::NUM_PACKET_TYPE` in the reference enumeration.
pub const NUM_PACKET_TYPES: usize = 137;

/// Version applied to every packet type without an explicit override.
/// 22 as of 2025.05.1 (master used 23).
pub const DEFAULT_VERSION: u16 = 22;

/// The full 2025.05 table: default version plus every known override.
pub fn version_table_spec() -> VersionTableSpec {
    let mut spec = VersionTableSpec::new(NUM_PACKET_TYPES, DEFAULT_VERSION)
        .constant("entity_version", 68)
        .constant("socket_types", 25)
        .constant("remove_attachments", 25)
        .constant("stop_injectors", 24)
        .constant("baking_texture_meta", 24)
        // DomainConnectRequestPending
        .override_literal(1, 17)
        // DomainList
        .override_named(2, "socket_types");

    // EntityAdd, EntityClone, EntityEdit, EntityData, EntityPhysics all track
    // the shared entity-version counter.
    for index in [23, 88, 25, 21, 68] {
        spec = spec.override_named(index, "entity_version");
    }

    // EntityQuery (ConicalFrustums, same as the 2025.05 default)
    spec = spec.override_literal(22, 22);

    // AvatarIdentity, AvatarData, BulkAvatarData, KillAvatar
    for index in [29, 6, 11, 5] {
        spec = spec.override_named(index, "remove_attachments");
    }

    // MessagesData (TextOrBinaryData)
    spec = spec.override_literal(57, 18);

    // ICEServerPeerInformation, ICEServerHeartbeatACK, ICEServerQuery,
    // ICEPingReply
    for index in [18, 63, 19, 40] {
        spec = spec.override_literal(index, 17);
    }
    // ICEServerHeartbeat, ICEPing (SendICEPeerID)
    spec = spec.override_literal(38, 18).override_literal(39, 18);

    // AssetMappingOperation, AssetMappingOperationReply, AssetGetInfo,
    // AssetGet, AssetUpload
    for index in [61, 62, 53, 49, 51] {
        spec = spec.override_named(index, "baking_texture_meta");
    }

    // NodeIgnoreRequest, DomainConnectionDenied (IncludesExtraInfo)
    spec = spec.override_literal(30, 18).override_literal(16, 18);

    // DomainConnectRequest, DomainListRequest, DomainServerAddedNode
    for index in [31, 13, 17] {
        spec = spec.override_named(index, "socket_types");
    }

    // EntityScriptCallMethod (ClientCallable)
    spec = spec.override_literal(92, 19);

    // MixedAudio, SilentAudioFrame, InjectAudio, MicrophoneAudioNoEcho,
    // MicrophoneAudioWithEcho, AudioStreamStats, StopInjector. Index 18 also
    // appears in the ICE group above; the audio group is applied later, so
    // the packed table carries 24 there, matching the reference scripts.
    for index in [8, 12, 7, 9, 10, 18, 103] {
        spec = spec.override_named(index, "stop_injectors");
    }

    // DomainSettings, Ping (IncludeConnectionID), AvatarQuery (ConicalFrustums)
    spec = spec
        .override_literal(48, 18)
        .override_literal(3, 18)
        .override_literal(72, 22);

    // Unconfirmed entries, kept visibly flagged rather than folded into the
    // literals above.
    spec = spec
        .override_entry(VersionOverride {
            index: 89,
            source: VersionSource::Literal(68),
            note: Some("EntityQueryInitialResultsComplete: ParticleSpin era, exact value unconfirmed".into()),
        })
        .override_entry(VersionOverride {
            index: 102,
            source: VersionSource::Literal(26),
            note: Some("BulkAvatarTraitsAck: unconfirmed against 2025.05 peer".into()),
        })
        .override_entry(VersionOverride {
            index: 90,
            source: VersionSource::Literal(26),
            note: Some("BulkAvatarTraits: unconfirmed against 2025.05 peer".into()),
        });

    spec
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn preset_resolves() {
        let versions = version_table_spec().resolve().unwrap();
        assert_eq!(versions.len(), NUM_PACKET_TYPES);
        assert_eq!(versions[0], DEFAULT_VERSION as u8);
        assert_eq!(versions[1], 17);
        assert_eq!(versions[23], 68);
    }

    #[test]
    fn audio_group_wins_index_18() {
        // ICE writes 17 at index 18, the audio group later writes 24;
        // insertion order makes the table deterministic.
        let versions = version_table_spec().resolve().unwrap();
        assert_eq!(versions[18], 24);
    }

    #[test]
    fn preset_digest_is_stable() {
        let first = version_table_spec().compute().unwrap();
        let second = version_table_spec().compute().unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn unconfirmed_entries_carry_notes() {
        let spec = version_table_spec();
        let noted: Vec<usize> = spec
            .overrides()
            .iter()
            .filter(|o| o.note.is_some())
            .map(|o| o.index)
            .collect();
        assert_eq!(noted, vec![89, 102, 90]);
    }
}
