//! OpenRGB SDK network protocol — packet ids and framing.
//!
//! Every packet is a 16-byte header followed by `data_size` payload bytes:
//! `"ORGB"` magic, `device_index: u32`, `packet_id: u32`, `data_size: u32`,
//! all integers little-endian. Colors travel as `0x00BBGGRR` words.

use super::{LightingError, Result};
use crate::color::Rgb;

/// Packet magic, first four header bytes.
pub const MAGIC: [u8; 4] = *b"ORGB";

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Request the number of controllers the server exposes. Reply: `u32`.
pub const REQUEST_CONTROLLER_COUNT: u32 = 0;

/// Announce this client's name. Payload: NUL-terminated string. No reply.
pub const SET_CLIENT_NAME: u32 = 50;

/// Server push telling clients the device list changed. Payload: none.
pub const DEVICE_LIST_UPDATED: u32 = 100;

/// Set a single LED. Payload: `led: i32`, `color: u32`. No reply.
pub const UPDATE_SINGLE_LED: u32 = 1052;

/// Encode a packet header.
pub fn encode_header(device_index: u32, packet_id: u32, data_size: u32) -> [u8; HEADER_SIZE] {
    let mut hdr = [0u8; HEADER_SIZE];
    hdr[0..4].copy_from_slice(&MAGIC);
    hdr[4..8].copy_from_slice(&device_index.to_le_bytes());
    hdr[8..12].copy_from_slice(&packet_id.to_le_bytes());
    hdr[12..16].copy_from_slice(&data_size.to_le_bytes());
    hdr
}

/// Decode and validate a packet header, returning
/// `(device_index, packet_id, data_size)`.
pub fn decode_header(hdr: &[u8; HEADER_SIZE]) -> Result<(u32, u32, u32)> {
    if hdr[0..4] != MAGIC {
        return Err(LightingError::Protocol(format!(
            "bad packet magic {:02X?}",
            &hdr[0..4]
        )));
    }
    let field = |at: usize| u32::from_le_bytes(hdr[at..at + 4].try_into().unwrap_or_default());
    Ok((field(4), field(8), field(12)))
}

/// Pack a color into the wire format (`red` in the low byte).
pub fn pack_color(color: Rgb) -> u32 {
    u32::from(color.r) | (u32::from(color.g) << 8) | (u32::from(color.b) << 16)
}

/// Encode an [`UPDATE_SINGLE_LED`] payload.
pub fn encode_single_led(led: u32, color: Rgb) -> [u8; 8] {
    let mut payload = [0u8; 8];
    payload[0..4].copy_from_slice(&(led as i32).to_le_bytes());
    payload[4..8].copy_from_slice(&pack_color(color).to_le_bytes());
    payload
}
