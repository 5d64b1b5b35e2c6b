//! Primitive wire I/O.
//!
//! All integers and floats are little-endian, strings are UTF-8 bytes with a
//! single 0x00 terminator, and there is no alignment padding anywhere.
//! Readers take `&mut &[u8]` so a caller can thread one cursor through a
//! whole datagram; every read is bounds-checked before it touches the buffer.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{DecodeError, EncodeError};

/// Append a NUL-terminated UTF-8 string.
///
/// A string containing the terminator byte itself is rejected: truncating at
/// the embedded NUL would silently change meaning on the receiving side.
pub fn put_cstring(buf: &mut BytesMut, field: &'static str, s: &str) -> Result<(), EncodeError> {
    if s.as_bytes().contains(&0) {
        return Err(EncodeError::EmbeddedNul { field });
    }
    buf.put_slice(s.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Read a NUL-terminated UTF-8 string, consuming the terminator.
pub fn get_cstring(buf: &mut &[u8], field: &'static str) -> Result<String, DecodeError> {
    let nul = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(DecodeError::MissingTerminator { field })?;
    let s = std::str::from_utf8(&buf[..nul])
        .map_err(|_| DecodeError::InvalidUtf8 { field })?
        .to_owned();
    buf.advance(nul + 1);
    Ok(s)
}

pub fn get_u8(buf: &mut &[u8], field: &'static str) -> Result<u8, DecodeError> {
    ensure(buf, field, 1)?;
    Ok(buf.get_u8())
}

pub fn get_u64_le(buf: &mut &[u8], field: &'static str) -> Result<u64, DecodeError> {
    ensure(buf, field, 8)?;
    Ok(buf.get_u64_le())
}

pub fn get_f32_le(buf: &mut &[u8], field: &'static str) -> Result<f32, DecodeError> {
    ensure(buf, field, 4)?;
    Ok(buf.get_f32_le())
}

fn ensure(buf: &[u8], field: &'static str, needed: usize) -> Result<(), DecodeError> {
    if buf.len() < needed {
        return Err(DecodeError::Truncated {
            field,
            needed: needed - buf.len(),
        });
    }
    Ok(())
}
