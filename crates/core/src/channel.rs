//! The data media channel: send/receive orchestration.
//!
//! One [`DataMediaChannel`] represents one logical data channel bound to
//! one network sink. It gates the data path on two independent enable
//! flags (send, receive), the negotiated codecs, and the registered
//! streams/receivers. Configuration can happen in any order; each
//! send or receive validates its own preconditions at call time.
//!
//! The channel is a synchronous, single-threaded state machine. Callers
//! invoking it from multiple threads must serialize access themselves.

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{CodecRegistry, DataCodec};
use crate::error::{DataError, Result};
use crate::rtp::{self, RtpHeader};
use crate::sequence::SequenceGenerator;
use crate::stream::{DataReceiver, ReceiveDataParams, StreamParams, StreamRegistry};

/// Largest application payload accepted by a single send.
///
/// The wire format carries one message per RTP packet, so the bound
/// keeps packets within a single comfortable datagram.
pub const MAX_SEND_PAYLOAD_LEN: usize = 16 * 1024;

/// Outbound transport capability: transmits one fully framed packet per
/// call. Connection state, retries, and delivery confirmation are the
/// sink's own concern.
pub trait NetworkSink: Send + Sync {
    fn send_packet(&self, packet: &[u8]) -> std::io::Result<()>;
}

/// Per-send parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendDataParams {
    /// SSRC of the registered send stream to emit on.
    pub ssrc: u32,
}

/// One logical data channel.
///
/// Created by [`DataEngine::create_channel`](crate::engine::DataEngine::create_channel).
/// Channel state (enable flags, negotiated codecs, streams, sequencing)
/// is exclusive to the instance; only the clock may be shared between
/// channels, read-only.
pub struct DataMediaChannel {
    codecs: CodecRegistry,
    sequencer: SequenceGenerator,
    streams: StreamRegistry,
    sending: bool,
    receiving: bool,
    send_codec: Option<DataCodec>,
    recv_codecs: HashMap<u8, DataCodec>,
    sink: Option<Arc<dyn NetworkSink>>,
}

impl DataMediaChannel {
    pub(crate) fn new(codecs: CodecRegistry, sequencer: SequenceGenerator) -> Self {
        Self {
            codecs,
            sequencer,
            streams: StreamRegistry::new(),
            sending: false,
            receiving: false,
            send_codec: None,
            recv_codecs: HashMap::new(),
            sink: None,
        }
    }

    /// Attach the outbound network sink. Sends fail until one is set.
    pub fn set_sink(&mut self, sink: Arc<dyn NetworkSink>) {
        self.sink = Some(sink);
    }

    /// Enable or disable the send direction.
    pub fn set_send(&mut self, enabled: bool) {
        tracing::debug!(enabled, "send direction toggled");
        self.sending = enabled;
    }

    /// Enable or disable the receive direction.
    pub fn set_receive(&mut self, enabled: bool) {
        tracing::debug!(enabled, "receive direction toggled");
        self.receiving = enabled;
    }

    /// Negotiate the send codec from a peer-proposed list.
    ///
    /// The first supported entry wins; unknown entries are filtered. On
    /// failure any previously negotiated send codec is left unchanged.
    pub fn set_send_codecs(&mut self, proposed: &[DataCodec]) -> Result<()> {
        let codec = self.codecs.negotiate_send(proposed)?;
        tracing::debug!(id = codec.id, name = %codec.name, "send codec negotiated");
        self.send_codec = Some(codec);
        Ok(())
    }

    /// Negotiate the receive codec set from a peer-proposed list.
    ///
    /// All-or-nothing: one unsupported entry rejects the whole list,
    /// leaving the previously negotiated set unchanged.
    pub fn set_recv_codecs(&mut self, proposed: &[DataCodec]) -> Result<()> {
        let codecs = self.codecs.negotiate_recv(proposed)?;
        tracing::debug!(count = codecs.len(), "receive codecs negotiated");
        self.recv_codecs = codecs;
        Ok(())
    }

    /// Register a stream for sending.
    pub fn add_send_stream(&mut self, params: StreamParams) -> Result<()> {
        tracing::debug!(ssrcs = ?params.ssrcs, "send stream added");
        self.streams.add_send(params)
    }

    /// Register a stream for receiving.
    pub fn add_recv_stream(&mut self, params: StreamParams) -> Result<()> {
        tracing::debug!(ssrcs = ?params.ssrcs, "receive stream added");
        self.streams.add_recv(params)
    }

    /// Attach a receiver for an inbound SSRC, replacing any prior one.
    pub fn set_receiver(&mut self, ssrc: u32, receiver: Arc<dyn DataReceiver>) {
        self.streams.set_receiver(ssrc, receiver);
    }

    /// Frame `data` into an RTP packet and hand it to the network sink.
    ///
    /// Preconditions, each checked before any state changes: payload
    /// within [`MAX_SEND_PAYLOAD_LEN`], send direction enabled, `ssrc`
    /// registered as a send stream, a send codec negotiated, and a sink
    /// attached. The sequence generator advances exactly once per
    /// successful call; a failed call does not advance it.
    pub fn send_data(&mut self, params: SendDataParams, data: &[u8]) -> Result<()> {
        if data.len() > MAX_SEND_PAYLOAD_LEN {
            return Err(DataError::PayloadTooLarge {
                len: data.len(),
                max: MAX_SEND_PAYLOAD_LEN,
            });
        }
        if !self.sending {
            return Err(DataError::NotSending);
        }
        if !self.streams.is_send_stream(params.ssrc) {
            return Err(DataError::UnknownStream(params.ssrc));
        }
        let codec = self.send_codec.as_ref().ok_or(DataError::NoSendCodec)?;
        let sink = self.sink.as_ref().ok_or(DataError::NoSink)?;

        let (sequence, timestamp) = self.sequencer.peek(codec.clock_rate);
        let header = RtpHeader {
            payload_type: codec.id,
            sequence,
            timestamp,
            ssrc: params.ssrc,
        };
        let packet = rtp::packetize(&header, data);

        // A sink rejection is a failed send: the sequence number is
        // consumed only once the packet is accepted.
        sink.send_packet(&packet)?;
        self.sequencer.commit();

        tracing::trace!(
            ssrc = params.ssrc,
            sequence,
            timestamp,
            len = packet.len(),
            "data packet sent"
        );
        Ok(())
    }

    /// Demultiplex one raw inbound packet.
    ///
    /// Silently drops (no receiver invocation, no error surfaced) when
    /// receiving is disabled, the packet fails header parsing, the
    /// payload type is not negotiated, the SSRC is not a registered
    /// receive stream, or no receiver is attached. On success the
    /// receiver is invoked synchronously with the stripped payload.
    pub fn on_packet_received(&self, packet: &[u8]) {
        if let Err(error) = self.demux(packet) {
            tracing::trace!(%error, len = packet.len(), "inbound packet dropped");
        }
    }

    fn demux(&self, packet: &[u8]) -> Result<()> {
        if !self.receiving {
            return Err(DataError::NotReceiving);
        }

        let header = RtpHeader::parse(packet)?;

        if !self.recv_codecs.contains_key(&header.payload_type) {
            return Err(DataError::UnknownPayloadType(header.payload_type));
        }
        if !self.streams.is_recv_stream(header.ssrc) {
            return Err(DataError::UnknownStream(header.ssrc));
        }
        let receiver = self
            .streams
            .receiver_for(header.ssrc)
            .ok_or(DataError::NoReceiver(header.ssrc))?;

        let params = ReceiveDataParams {
            ssrc: header.ssrc,
            payload_type: header.payload_type,
            sequence: header.sequence,
            timestamp: header.timestamp,
        };
        let payload = rtp::packet_payload(packet);

        tracing::trace!(
            ssrc = header.ssrc,
            sequence = header.sequence,
            len = payload.len(),
            "data packet delivered"
        );
        receiver.receive_data(&params, payload);
        Ok(())
    }
}
