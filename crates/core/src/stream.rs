//! Stream registration and inbound dispatch targets.
//!
//! A channel tracks which SSRCs are registered for sending and for
//! receiving, and which [`DataReceiver`] handles each inbound SSRC.
//! Registration is independent configuration state: streams and
//! receivers can be added in any order relative to codec negotiation,
//! and the data path checks them only at send/receive time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DataError, Result};

/// One logical data stream, possibly spanning multiple SSRCs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamParams {
    /// Synchronization source identifiers carried by this stream.
    pub ssrcs: Vec<u32>,
}

impl StreamParams {
    /// Single-SSRC stream, the common case.
    pub fn with_ssrc(ssrc: u32) -> Self {
        Self { ssrcs: vec![ssrc] }
    }

    pub fn add_ssrc(&mut self, ssrc: u32) {
        self.ssrcs.push(ssrc);
    }
}

/// Parameter bundle delivered alongside inbound payload bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiveDataParams {
    /// SSRC the packet arrived on.
    pub ssrc: u32,
    /// Negotiated payload type the packet carried.
    pub payload_type: u8,
    /// RTP sequence number of the packet.
    pub sequence: u16,
    /// RTP timestamp of the packet.
    pub timestamp: u32,
}

/// Consumer of inbound data, invoked synchronously from the receive
/// path. The channel holds a reference without owning the receiver's
/// lifetime.
pub trait DataReceiver: Send + Sync {
    /// Deliver the depacketized payload of one packet.
    fn receive_data(&self, params: &ReceiveDataParams, data: &[u8]);
}

/// Per-direction SSRC bookkeeping for one channel.
#[derive(Default)]
pub struct StreamRegistry {
    send: HashMap<u32, StreamParams>,
    recv: HashMap<u32, StreamParams>,
    receivers: HashMap<u32, Arc<dyn DataReceiver>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all SSRCs of `params` for sending.
    ///
    /// Fails on empty params with no partial registration. Re-adding an
    /// already registered SSRC is redundant, not an error.
    pub fn add_send(&mut self, params: StreamParams) -> Result<()> {
        Self::add_direction(&mut self.send, params)
    }

    /// Register all SSRCs of `params` for receiving.
    pub fn add_recv(&mut self, params: StreamParams) -> Result<()> {
        Self::add_direction(&mut self.recv, params)
    }

    fn add_direction(map: &mut HashMap<u32, StreamParams>, params: StreamParams) -> Result<()> {
        if params.ssrcs.is_empty() {
            return Err(DataError::EmptyStream);
        }
        for &ssrc in &params.ssrcs {
            map.insert(ssrc, params.clone());
        }
        Ok(())
    }

    /// Associate a receiver with an SSRC, replacing any prior one.
    ///
    /// Independent of whether the SSRC is a registered receive stream;
    /// both conditions are checked separately on the receive path.
    pub fn set_receiver(&mut self, ssrc: u32, receiver: Arc<dyn DataReceiver>) {
        tracing::debug!(ssrc, "receiver attached");
        self.receivers.insert(ssrc, receiver);
    }

    pub fn is_send_stream(&self, ssrc: u32) -> bool {
        self.send.contains_key(&ssrc)
    }

    pub fn is_recv_stream(&self, ssrc: u32) -> bool {
        self.recv.contains_key(&ssrc)
    }

    pub fn receiver_for(&self, ssrc: u32) -> Option<Arc<dyn DataReceiver>> {
        self.receivers.get(&ssrc).cloned()
    }
}

impl std::fmt::Debug for StreamRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRegistry")
            .field("send", &self.send)
            .field("recv", &self.recv)
            .field("receivers", &self.receivers.keys())
            .finish()
    }
}
