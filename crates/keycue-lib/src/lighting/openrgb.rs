//! OpenRGB TCP backend.
//!
//! Speaks to a local OpenRGB SDK server. The handshake announces the
//! client name and confirms the configured controller index exists; after
//! that, every indicator update is one single-LED packet.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Mutex;
use std::time::Duration;

use super::protocol::{self, HEADER_SIZE};
use super::{LightingDevice, LightingError, Result};
use crate::color::Rgb;

/// Name announced to the server.
const CLIENT_NAME: &[u8] = b"keycue\0";

/// How long to wait for a handshake reply.
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on accepted payload sizes; anything larger is a framing error.
const MAX_PAYLOAD: u32 = 1 << 20;

/// One controller on an OpenRGB SDK server.
#[derive(Debug)]
pub struct OpenRgbDevice {
    stream: Mutex<TcpStream>,
    device_index: u32,
}

impl OpenRgbDevice {
    /// Connect to the server, announce ourselves, and verify that
    /// `device_index` names an existing controller.
    pub fn connect(addr: &str, device_index: u32) -> Result<Self> {
        let mut stream = TcpStream::connect(addr)
            .map_err(|e| LightingError::ConnectFailed(format!("{addr}: {e}")))?;
        stream
            .set_read_timeout(Some(REPLY_TIMEOUT))
            .map_err(|e| LightingError::ConnectFailed(format!("{addr}: {e}")))?;

        send_packet(&mut stream, 0, protocol::SET_CLIENT_NAME, CLIENT_NAME)?;

        send_packet(&mut stream, 0, protocol::REQUEST_CONTROLLER_COUNT, &[])?;
        let count = loop {
            let (_, packet_id, payload) = read_packet(&mut stream)?;
            if packet_id != protocol::REQUEST_CONTROLLER_COUNT {
                // Unsolicited push (e.g. device-list update), not our reply.
                continue;
            }
            if payload.len() < 4 {
                return Err(LightingError::Protocol(format!(
                    "controller count reply too short ({} bytes)",
                    payload.len()
                )));
            }
            break u32::from_le_bytes(payload[0..4].try_into().unwrap_or_default());
        };
        if device_index >= count {
            return Err(LightingError::DeviceMissing {
                index: device_index,
                count,
            });
        }
        log::debug!("lighting server at {addr}: {count} controllers, using {device_index}");

        Ok(OpenRgbDevice {
            stream: Mutex::new(stream),
            device_index,
        })
    }

    pub fn device_index(&self) -> u32 {
        self.device_index
    }
}

impl LightingDevice for OpenRgbDevice {
    fn set_color(&self, led: u32, color: Rgb) -> Result<()> {
        let mut stream = self
            .stream
            .lock()
            .map_err(|_| LightingError::WriteFailed("lighting stream lock poisoned".into()))?;
        send_packet(
            &mut stream,
            self.device_index,
            protocol::UPDATE_SINGLE_LED,
            &protocol::encode_single_led(led, color),
        )
    }
}

fn send_packet(stream: &mut TcpStream, device: u32, packet_id: u32, payload: &[u8]) -> Result<()> {
    let hdr = protocol::encode_header(device, packet_id, payload.len() as u32);
    stream
        .write_all(&hdr)
        .and_then(|()| stream.write_all(payload))
        .and_then(|()| stream.flush())
        .map_err(|e| LightingError::WriteFailed(format!("packet {packet_id}: {e}")))
}

fn read_packet(stream: &mut TcpStream) -> Result<(u32, u32, Vec<u8>)> {
    let mut hdr = [0u8; HEADER_SIZE];
    stream
        .read_exact(&mut hdr)
        .map_err(|e| LightingError::Protocol(format!("read header: {e}")))?;
    let (device, packet_id, data_size) = protocol::decode_header(&hdr)?;
    if data_size > MAX_PAYLOAD {
        return Err(LightingError::Protocol(format!(
            "packet {packet_id} claims {data_size} payload bytes"
        )));
    }
    let mut payload = vec![0u8; data_size as usize];
    stream
        .read_exact(&mut payload)
        .map_err(|e| LightingError::Protocol(format!("read payload: {e}")))?;
    Ok((device, packet_id, payload))
}
