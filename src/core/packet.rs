//! Entity message types and the datagram codec.
//!
//! Three fixed-layout messages travel between an injection tool and a
//! running client, one message per datagram:
//!
//! ```text
//! EntityAdd    [0x10] [id:u64] [name\0] [pos:3f32] [rot:4f32] [dims:3f32]
//!              [model_url\0] [texture_url\0] [color:3f32]
//! EntityEdit   [0x11] [id:u64] [flags:u8] [groups for each set flag]
//! EntityErase  [0x12] [id:u64]
//! ```
//!
//! Everything is little-endian with no padding. Edit groups appear in flag-bit
//! order (position, rotation, dimensions); absent groups contribute zero
//! bytes. The decoder is strict: undefined flag bits and bytes left over
//! after a complete message are errors.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::core::wire;
use crate::error::{DecodeError, EncodeError};

/// Wire identifier for each message variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PacketKind {
    EntityAdd = 0x10,
    EntityEdit = 0x11,
    EntityErase = 0x12,
}

impl PacketKind {
    /// Map a leading type byte to its variant.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x10 => Some(PacketKind::EntityAdd),
            0x11 => Some(PacketKind::EntityEdit),
            0x12 => Some(PacketKind::EntityErase),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Caller-chosen 64-bit entity identifier.
///
/// The wire format places no uniqueness constraint; the receiver decides what
/// duplicates or unknown ids mean.
pub type EntityId = u64;

/// Three `f32` world-unit components (meters).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }
}

// Equality is over raw bit patterns: two messages are equal exactly when
// their encodings are byte-identical, which keeps round-trip equality
// reflexive for NaN payloads.
impl PartialEq for Vec3 {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }
}

impl Eq for Vec3 {}

/// Rotation quaternion (x, y, z, w).
///
/// No normalization is enforced on the wire; a non-unit quaternion is a
/// valid-but-nonsensical payload, not a protocol error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about the Y axis.
    pub fn from_y_angle(angle: f32) -> Self {
        let half = angle / 2.0;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }
}

// Same bit-pattern equality as Vec3.
impl PartialEq for Quat {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
            && self.w.to_bits() == other.w.to_bits()
    }
}

impl Eq for Quat {}

/// Introduce an entity with its full initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAdd {
    pub id: EntityId,
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub dimensions: Vec3,
    /// Optional, empty string when unset.
    pub model_url: String,
    /// Optional, empty string when unset.
    pub texture_url: String,
    /// RGB, each component 0.0–1.0 by convention (not enforced).
    pub color: Vec3,
}

/// Update a subset of an entity's transform.
///
/// Absent fields are not transmitted: the flags byte records which groups
/// follow, and omitted groups are left unspecified rather than zero-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEdit {
    pub id: EntityId,
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub dimensions: Option<Vec3>,
}

impl EntityEdit {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            position: None,
            rotation: None,
            dimensions: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_dimensions(mut self, dimensions: Vec3) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.position.is_some() {
            flags |= FLAG_POSITION;
        }
        if self.rotation.is_some() {
            flags |= FLAG_ROTATION;
        }
        if self.dimensions.is_some() {
            flags |= FLAG_DIMENSIONS;
        }
        flags
    }
}

/// Remove an entity. No payload beyond the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityErase {
    pub id: EntityId,
}

/// Property-flags bitfield for [`EntityEdit`].
pub const FLAG_POSITION: u8 = 0x01;
pub const FLAG_ROTATION: u8 = 0x02;
pub const FLAG_DIMENSIONS: u8 = 0x04;
const FLAG_MASK: u8 = FLAG_POSITION | FLAG_ROTATION | FLAG_DIMENSIONS;

/// A single entity-control message, exactly one per datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityMessage {
    Add(EntityAdd),
    Edit(EntityEdit),
    Erase(EntityErase),
}

impl EntityMessage {
    pub fn kind(&self) -> PacketKind {
        match self {
            EntityMessage::Add(_) => PacketKind::EntityAdd,
            EntityMessage::Edit(_) => PacketKind::EntityEdit,
            EntityMessage::Erase(_) => PacketKind::EntityErase,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            EntityMessage::Add(m) => m.id,
            EntityMessage::Edit(m) => m.id,
            EntityMessage::Erase(m) => m.id,
        }
    }

    /// Encode into a single datagram payload.
    ///
    /// Total for all well-formed messages; the only rejection is an embedded
    /// NUL in a string field, reported before any bytes reach the caller.
    pub fn encode(&self) -> Result<Bytes, EncodeError> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(self.kind().as_byte());
        match self {
            EntityMessage::Add(m) => {
                buf.put_u64_le(m.id);
                wire::put_cstring(&mut buf, "name", &m.name)?;
                put_vec3(&mut buf, m.position);
                put_quat(&mut buf, m.rotation);
                put_vec3(&mut buf, m.dimensions);
                wire::put_cstring(&mut buf, "model_url", &m.model_url)?;
                wire::put_cstring(&mut buf, "texture_url", &m.texture_url)?;
                put_vec3(&mut buf, m.color);
            }
            EntityMessage::Edit(m) => {
                buf.put_u64_le(m.id);
                buf.put_u8(m.flags());
                if let Some(position) = m.position {
                    put_vec3(&mut buf, position);
                }
                if let Some(rotation) = m.rotation {
                    put_quat(&mut buf, rotation);
                }
                if let Some(dimensions) = m.dimensions {
                    put_vec3(&mut buf, dimensions);
                }
            }
            EntityMessage::Erase(m) => {
                buf.put_u64_le(m.id);
            }
        }
        Ok(buf.freeze())
    }

    /// Exact on-wire size of this message.
    pub fn encoded_len(&self) -> usize {
        match self {
            // type + id + 10 floats + three cstrings
            EntityMessage::Add(m) => {
                1 + 8
                    + (m.name.len() + 1)
                    + 12
                    + 16
                    + 12
                    + (m.model_url.len() + 1)
                    + (m.texture_url.len() + 1)
                    + 12
            }
            EntityMessage::Edit(m) => {
                1 + 8
                    + 1
                    + m.position.map_or(0, |_| 12)
                    + m.rotation.map_or(0, |_| 16)
                    + m.dimensions.map_or(0, |_| 12)
            }
            EntityMessage::Erase(_) => 1 + 8,
        }
    }

    /// Parse one datagram back into a message.
    ///
    /// The leading type byte selects the variant; fixed fields and
    /// NUL-terminated strings follow. Never reads out of bounds.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut buf = bytes;
        let type_byte = wire::get_u8(&mut buf, "packet type")?;
        let kind =
            PacketKind::from_byte(type_byte).ok_or(DecodeError::UnknownPacketType(type_byte))?;

        let message = match kind {
            PacketKind::EntityAdd => EntityMessage::Add(decode_add(&mut buf)?),
            PacketKind::EntityEdit => EntityMessage::Edit(decode_edit(&mut buf)?),
            PacketKind::EntityErase => EntityMessage::Erase(EntityErase {
                id: wire::get_u64_le(&mut buf, "id")?,
            }),
        };

        if !buf.is_empty() {
            return Err(DecodeError::TrailingBytes(buf.len()));
        }
        Ok(message)
    }
}

impl From<EntityAdd> for EntityMessage {
    fn from(m: EntityAdd) -> Self {
        EntityMessage::Add(m)
    }
}

impl From<EntityEdit> for EntityMessage {
    fn from(m: EntityEdit) -> Self {
        EntityMessage::Edit(m)
    }
}

impl From<EntityErase> for EntityMessage {
    fn from(m: EntityErase) -> Self {
        EntityMessage::Erase(m)
    }
}

fn decode_add(buf: &mut &[u8]) -> Result<EntityAdd, DecodeError> {
    Ok(EntityAdd {
        id: wire::get_u64_le(buf, "id")?,
        name: wire::get_cstring(buf, "name")?,
        position: get_vec3(buf, "position")?,
        rotation: get_quat(buf, "rotation")?,
        dimensions: get_vec3(buf, "dimensions")?,
        model_url: wire::get_cstring(buf, "model_url")?,
        texture_url: wire::get_cstring(buf, "texture_url")?,
        color: get_vec3(buf, "color")?,
    })
}

fn decode_edit(buf: &mut &[u8]) -> Result<EntityEdit, DecodeError> {
    let id = wire::get_u64_le(buf, "id")?;
    let flags = wire::get_u8(buf, "flags")?;
    if flags & !FLAG_MASK != 0 {
        return Err(DecodeError::UnknownFlags(flags));
    }
    // Groups follow in fixed bit order regardless of which are present.
    let position = if flags & FLAG_POSITION != 0 {
        Some(get_vec3(buf, "position")?)
    } else {
        None
    };
    let rotation = if flags & FLAG_ROTATION != 0 {
        Some(get_quat(buf, "rotation")?)
    } else {
        None
    };
    let dimensions = if flags & FLAG_DIMENSIONS != 0 {
        Some(get_vec3(buf, "dimensions")?)
    } else {
        None
    };
    Ok(EntityEdit {
        id,
        position,
        rotation,
        dimensions,
    })
}

fn put_vec3(buf: &mut BytesMut, v: Vec3) {
    buf.put_f32_le(v.x);
    buf.put_f32_le(v.y);
    buf.put_f32_le(v.z);
}

fn put_quat(buf: &mut BytesMut, q: Quat) {
    buf.put_f32_le(q.x);
    buf.put_f32_le(q.y);
    buf.put_f32_le(q.z);
    buf.put_f32_le(q.w);
}

fn get_vec3(buf: &mut &[u8], field: &'static str) -> Result<Vec3, DecodeError> {
    Ok(Vec3::new(
        wire::get_f32_le(buf, field)?,
        wire::get_f32_le(buf, field)?,
        wire::get_f32_le(buf, field)?,
    ))
}

fn get_quat(buf: &mut &[u8], field: &'static str) -> Result<Quat, DecodeError> {
    Ok(Quat::new(
        wire::get_f32_le(buf, field)?,
        wire::get_f32_le(buf, field)?,
        wire::get_f32_le(buf, field)?,
        wire::get_f32_le(buf, field)?,
    ))
}
