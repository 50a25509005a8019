//! Data codec descriptors and send/receive negotiation.
//!
//! A "codec" here is an RTP payload-type descriptor (id, name, clock
//! rate), not a media compressor. The signaling layer proposes ordered
//! codec lists; [`CodecRegistry`] decides which of them this engine can
//! actually use, with different strictness per direction:
//!
//! - **Send**: one usable codec is enough. Unknown alternatives in the
//!   proposed list are filtered out, and the first match wins.
//! - **Receive**: every proposed codec must be understood, because the
//!   peer may use any of them. One unknown entry rejects the whole list.

use std::collections::HashMap;

use crate::error::{DataError, Result};

/// Largest value that fits the 7-bit RTP payload-type field.
pub const MAX_PAYLOAD_TYPE_ID: u8 = 127;

/// Payload type id of the google-data codec (dynamic range, RFC 3551).
pub const GOOGLE_DATA_CODEC_ID: u8 = 103;

/// Codec name of the google-data payload format.
pub const GOOGLE_DATA_CODEC_NAME: &str = "google-data";

/// RTP clock rate of the google-data codec in Hz.
pub const GOOGLE_DATA_CLOCK_RATE: u32 = 90_000;

/// An RTP payload-type descriptor for data transport.
///
/// Identity for negotiation is the `(id, name)` pair. Names compare
/// ASCII-case-insensitively, matching `rtpmap` conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCodec {
    /// Payload type id (7-bit, 0..=127).
    pub id: u8,
    /// Codec name as it would appear in an `a=rtpmap` line.
    pub name: String,
    /// RTP clock rate in Hz.
    pub clock_rate: u32,
}

impl DataCodec {
    pub fn new(id: u8, name: &str, clock_rate: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            clock_rate,
        }
    }

    /// The google-data codec at 90 kHz.
    pub fn google_data() -> Self {
        Self::new(
            GOOGLE_DATA_CODEC_ID,
            GOOGLE_DATA_CODEC_NAME,
            GOOGLE_DATA_CLOCK_RATE,
        )
    }

    /// Whether two descriptors denote the same codec: equal id and
    /// case-insensitively equal name. Clock rate does not participate.
    pub fn matches(&self, other: &DataCodec) -> bool {
        self.id == other.id && self.name.eq_ignore_ascii_case(&other.name)
    }
}

/// The set of codecs this engine supports, and the negotiation rules
/// that reconcile it with peer-proposed lists.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    supported: Vec<DataCodec>,
}

impl CodecRegistry {
    pub fn new(supported: Vec<DataCodec>) -> Self {
        Self { supported }
    }

    /// Returns the locally supported codecs (offered during signaling).
    pub fn supported(&self) -> &[DataCodec] {
        &self.supported
    }

    fn is_supported(&self, codec: &DataCodec) -> Option<&DataCodec> {
        self.supported.iter().find(|local| local.matches(codec))
    }

    /// Negotiate the send direction: the first proposed codec that is
    /// locally supported becomes the send codec. Unmatched proposals are
    /// ignored; the call fails only when nothing matches.
    ///
    /// The negotiated codec adopts the local clock rate, since proposed
    /// lists arrive from signaling as `(id, name)` pairs without an
    /// authoritative rate.
    ///
    /// Entries whose id exceeds [`MAX_PAYLOAD_TYPE_ID`] cannot go on the
    /// wire and are filtered like any other unusable proposal.
    pub fn negotiate_send(&self, proposed: &[DataCodec]) -> Result<DataCodec> {
        for codec in proposed {
            if codec.id > MAX_PAYLOAD_TYPE_ID {
                tracing::trace!(id = codec.id, name = %codec.name, "proposed codec id out of range");
                continue;
            }
            if let Some(local) = self.is_supported(codec) {
                return Ok(DataCodec::new(codec.id, &codec.name, local.clock_rate));
            }
        }
        Err(DataError::NoMatchingCodec)
    }

    /// Negotiate the receive direction: all-or-nothing. Every proposed
    /// codec must fit the payload-type field and be locally supported;
    /// on success the negotiated set is exactly the proposed list, keyed
    /// by payload type id.
    pub fn negotiate_recv(&self, proposed: &[DataCodec]) -> Result<HashMap<u8, DataCodec>> {
        let mut negotiated = HashMap::with_capacity(proposed.len());
        for codec in proposed {
            if codec.id > MAX_PAYLOAD_TYPE_ID {
                return Err(DataError::InvalidPayloadType(codec.id));
            }
            let Some(local) = self.is_supported(codec) else {
                return Err(DataError::UnsupportedCodec(codec.name.clone()));
            };
            negotiated.insert(
                codec.id,
                DataCodec::new(codec.id, &codec.name, local.clock_rate),
            );
        }
        Ok(negotiated)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new(vec![DataCodec::google_data()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> DataCodec {
        DataCodec::new(103, "google-data", 0)
    }

    fn unknown() -> DataCodec {
        DataCodec::new(104, "unknown-data", 0)
    }

    #[test]
    fn matches_on_id_and_name() {
        let a = DataCodec::new(103, "google-data", 90_000);
        assert!(a.matches(&DataCodec::new(103, "google-data", 0)));
        assert!(!a.matches(&DataCodec::new(104, "google-data", 90_000)));
        assert!(!a.matches(&DataCodec::new(103, "other-data", 90_000)));
    }

    #[test]
    fn matches_name_case_insensitive() {
        let a = DataCodec::new(103, "google-data", 90_000);
        assert!(a.matches(&DataCodec::new(103, "Google-Data", 0)));
    }

    #[test]
    fn send_accepts_known() {
        let registry = CodecRegistry::default();
        let codec = registry.negotiate_send(&[known()]).unwrap();
        assert_eq!(codec.id, 103);
    }

    #[test]
    fn send_rejects_all_unknown() {
        let registry = CodecRegistry::default();
        assert!(registry.negotiate_send(&[unknown()]).is_err());
    }

    #[test]
    fn send_filters_mixed_list() {
        let registry = CodecRegistry::default();
        let codec = registry.negotiate_send(&[unknown(), known()]).unwrap();
        assert_eq!(codec.id, 103);
        assert_eq!(codec.name, "google-data");
    }

    #[test]
    fn send_adopts_local_clock_rate() {
        let registry = CodecRegistry::default();
        // Proposed entry has no meaningful rate; local table supplies 90 kHz.
        let codec = registry.negotiate_send(&[known()]).unwrap();
        assert_eq!(codec.clock_rate, GOOGLE_DATA_CLOCK_RATE);
    }

    #[test]
    fn recv_accepts_known() {
        let registry = CodecRegistry::default();
        let codecs = registry.negotiate_recv(&[known()]).unwrap();
        assert_eq!(codecs.len(), 1);
        assert!(codecs.contains_key(&103));
    }

    #[test]
    fn recv_rejects_unknown() {
        let registry = CodecRegistry::default();
        assert!(registry.negotiate_recv(&[unknown()]).is_err());
    }

    #[test]
    fn recv_rejects_mixed_list() {
        let registry = CodecRegistry::default();
        assert!(registry.negotiate_recv(&[known(), unknown()]).is_err());
    }

    #[test]
    fn send_never_negotiates_out_of_range_id() {
        // Even a registry that lists the oversized id cannot negotiate it.
        let oversized = DataCodec::new(200, "big-data", 90_000);
        let registry = CodecRegistry::new(vec![oversized.clone(), DataCodec::google_data()]);

        assert!(matches!(
            registry.negotiate_send(&[oversized.clone()]),
            Err(DataError::NoMatchingCodec)
        ));

        // Filtered like any other unusable entry in a mixed list.
        let codec = registry.negotiate_send(&[oversized, known()]).unwrap();
        assert_eq!(codec.id, 103);
    }

    #[test]
    fn recv_rejects_out_of_range_id() {
        let oversized = DataCodec::new(200, "big-data", 90_000);
        let registry = CodecRegistry::new(vec![oversized.clone(), DataCodec::google_data()]);

        assert!(matches!(
            registry.negotiate_recv(&[known(), oversized]),
            Err(DataError::InvalidPayloadType(200))
        ));
    }

    #[test]
    fn default_registry_supports_google_data() {
        let registry = CodecRegistry::default();
        assert_eq!(registry.supported().len(), 1);
        assert_eq!(registry.supported()[0], DataCodec::google_data());
    }
}
