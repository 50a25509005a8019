//! RTP fixed-header wire format (RFC 3550 §5.1) and data-packet framing.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |V=2|P|X|  CC   |M|     PT      |       Sequence Number         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           Timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             SSRC                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Data packets carry a 4-byte reserved field between the fixed header
//! and the application payload. It is written as zeros on send and
//! stripped on receive; it carries no semantic meaning and is kept only
//! for wire compatibility.
//!
//! Version is always 2. Padding, extension, marker, and CSRC count are
//! always 0 for data packets.

use crate::error::{DataError, Result};

/// Length of the RTP fixed header in bytes.
pub const RTP_HEADER_LEN: usize = 12;

/// Length of the reserved all-zero field following the header.
pub const RESERVED_PREFIX_LEN: usize = 4;

/// RTP protocol version (RFC 3550).
pub const RTP_VERSION: u8 = 2;

const VERSION_MASK: u8 = 0b1100_0000;
const PAYLOAD_TYPE_MASK: u8 = 0b0111_1111;

/// Parsed RTP fixed-header fields of a data packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeader {
    /// RTP payload type (7-bit, RFC 3551 dynamic range for data).
    pub payload_type: u8,
    /// Sequence number (16-bit, wrapping).
    pub sequence: u16,
    /// Media-clock timestamp (32-bit, wrapping).
    pub timestamp: u32,
    /// Synchronization source identifier.
    pub ssrc: u32,
}

impl RtpHeader {
    /// Serialize as a 12-byte fixed header.
    pub fn serialize(&self) -> [u8; RTP_HEADER_LEN] {
        let mut header = [0u8; RTP_HEADER_LEN];
        header[0] = RTP_VERSION << 6;
        header[1] = self.payload_type & PAYLOAD_TYPE_MASK;
        header[2..4].copy_from_slice(&self.sequence.to_be_bytes());
        header[4..8].copy_from_slice(&self.timestamp.to_be_bytes());
        header[8..12].copy_from_slice(&self.ssrc.to_be_bytes());
        header
    }

    /// Parse the fixed header from the front of a raw packet.
    ///
    /// Anything shorter than 12 bytes is rejected before any field is
    /// read; a version other than 2 is rejected after.
    pub fn parse(packet: &[u8]) -> Result<Self> {
        if packet.len() < RTP_HEADER_LEN {
            return Err(DataError::PacketTooShort(packet.len()));
        }

        let version = (packet[0] & VERSION_MASK) >> 6;
        if version != RTP_VERSION {
            return Err(DataError::BadRtpVersion(version));
        }

        Ok(Self {
            payload_type: packet[1] & PAYLOAD_TYPE_MASK,
            sequence: u16::from_be_bytes([packet[2], packet[3]]),
            timestamp: u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]]),
            ssrc: u32::from_be_bytes([packet[8], packet[9], packet[10], packet[11]]),
        })
    }
}

/// Build a complete data packet: fixed header, reserved zeros, payload.
pub fn packetize(header: &RtpHeader, payload: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(RTP_HEADER_LEN + RESERVED_PREFIX_LEN + payload.len());
    packet.extend_from_slice(&header.serialize());
    packet.extend_from_slice(&[0u8; RESERVED_PREFIX_LEN]);
    packet.extend_from_slice(payload);
    packet
}

/// Application payload of a parsed data packet: the bytes after the
/// fixed header and the reserved field. A body shorter than the reserved
/// field yields an empty payload.
pub fn packet_payload(packet: &[u8]) -> &[u8] {
    packet
        .get(RTP_HEADER_LEN + RESERVED_PREFIX_LEN..)
        .unwrap_or(&[])
}
