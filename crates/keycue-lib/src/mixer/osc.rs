//! OSC/UDP mixer backend.
//!
//! Parameters live at `/strip/<index>/<name>`. A read sends the address
//! with no arguments and the mixer answers with the current value on the
//! same address; a write sends the address with one argument. Replies are
//! awaited with a deadline so a dead mixer surfaces as a timeout, never a
//! hang.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant};

use rosc::{OscMessage, OscPacket, OscType};

use super::{MixerError, MixerParams, Result};
use crate::binding::StripParam;

/// OSC address for a mixer parameter location.
pub fn osc_address(param: &StripParam) -> String {
    format!("/strip/{}/{}", param.strip, param.name)
}

/// UDP client for an OSC-speaking mixer.
#[derive(Debug)]
pub struct OscMixer {
    socket: UdpSocket,
    target: SocketAddr,
    timeout: Duration,
}

impl OscMixer {
    /// Bind a local socket and resolve the mixer address.
    ///
    /// UDP has no handshake, so reachability is only proven by the first
    /// reply; call [`probe`](Self::probe) after connecting to fail at
    /// startup instead of first use.
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let target = addr
            .to_socket_addrs()
            .map_err(|e| MixerError::ConnectFailed(format!("{addr}: {e}")))?
            .next()
            .ok_or_else(|| MixerError::ConnectFailed(format!("{addr}: no address resolved")))?;
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| MixerError::ConnectFailed(format!("UDP bind: {e}")))?;
        Ok(OscMixer {
            socket,
            target,
            timeout,
        })
    }

    /// Verify the mixer answers queries by reading one known parameter.
    pub fn probe(&self, param: &StripParam) -> Result<()> {
        self.query(&osc_address(param)).map(|_| ())
    }

    fn send(&self, addr: &str, args: Vec<OscType>) -> Result<()> {
        let packet = OscPacket::Message(OscMessage {
            addr: addr.to_string(),
            args,
        });
        let buf = rosc::encoder::encode(&packet)
            .map_err(|e| MixerError::WriteFailed(format!("{addr}: encode: {e}")))?;
        self.socket
            .send_to(&buf, self.target)
            .map_err(|e| MixerError::WriteFailed(format!("{addr}: send: {e}")))?;
        Ok(())
    }

    /// Send an address-only query and wait for the reply carrying the same
    /// address. Replies for other addresses (stale or unsolicited traffic)
    /// are discarded while the deadline allows.
    fn query(&self, addr: &str) -> Result<OscType> {
        self.send(addr, vec![])?;

        let deadline = Instant::now() + self.timeout;
        let mut buf = [0u8; 1536];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(MixerError::Timeout(addr.to_string()));
            }
            self.socket
                .set_read_timeout(Some(remaining))
                .map_err(|e| MixerError::ReadFailed(format!("{addr}: {e}")))?;
            match self.socket.recv(&mut buf) {
                Ok(n) => {
                    let Ok((_, packet)) = rosc::decoder::decode_udp(&buf[..n]) else {
                        continue;
                    };
                    if let Some(msg) = find_reply(&packet, addr) {
                        return msg.args.first().cloned().ok_or_else(|| {
                            MixerError::ReadFailed(format!("{addr}: empty reply"))
                        });
                    }
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                    ) =>
                {
                    return Err(MixerError::Timeout(addr.to_string()));
                }
                Err(e) => return Err(MixerError::ReadFailed(format!("{addr}: recv: {e}"))),
            }
        }
    }
}

/// Find the message for `addr` in a packet, looking through bundles.
fn find_reply<'a>(packet: &'a OscPacket, addr: &str) -> Option<&'a OscMessage> {
    match packet {
        OscPacket::Message(msg) if msg.addr == addr => Some(msg),
        OscPacket::Message(_) => None,
        OscPacket::Bundle(bundle) => bundle.content.iter().find_map(|p| find_reply(p, addr)),
    }
}

/// Interpret a reply payload as a boolean. Mixers differ on encoding, so
/// int, float, and bool payloads are all accepted.
fn as_switch(addr: &str, arg: &OscType) -> Result<bool> {
    match arg {
        OscType::Bool(b) => Ok(*b),
        OscType::Int(i) => Ok(*i != 0),
        OscType::Long(l) => Ok(*l != 0),
        OscType::Float(v) => Ok(*v != 0.0),
        OscType::Double(v) => Ok(*v != 0.0),
        other => Err(MixerError::ReadFailed(format!(
            "{addr}: unexpected reply type {other:?}"
        ))),
    }
}

/// Interpret a reply payload as a continuous level.
fn as_level(addr: &str, arg: &OscType) -> Result<f32> {
    match arg {
        OscType::Float(v) => Ok(*v),
        OscType::Double(v) => Ok(*v as f32),
        OscType::Int(i) => Ok(*i as f32),
        OscType::Long(l) => Ok(*l as f32),
        other => Err(MixerError::ReadFailed(format!(
            "{addr}: unexpected reply type {other:?}"
        ))),
    }
}

impl MixerParams for OscMixer {
    fn read_switch(&self, param: &StripParam) -> Result<bool> {
        let addr = osc_address(param);
        let arg = self.query(&addr)?;
        as_switch(&addr, &arg)
    }

    fn read_level(&self, param: &StripParam) -> Result<f32> {
        let addr = osc_address(param);
        let arg = self.query(&addr)?;
        as_level(&addr, &arg)
    }

    fn write_switch(&self, param: &StripParam, on: bool) -> Result<()> {
        self.send(&osc_address(param), vec![OscType::Int(i32::from(on))])
    }

    fn write_level(&self, param: &StripParam, value: f32) -> Result<()> {
        self.send(&osc_address(param), vec![OscType::Float(value)])
    }
}
