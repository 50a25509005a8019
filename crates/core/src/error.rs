//! Error types for the RTP data engine.

/// Errors that can occur in the data engine.
///
/// Variants map to the three failure classes of the channel contract:
///
/// - **Malformed input**: [`PayloadTooLarge`](Self::PayloadTooLarge),
///   [`PacketTooShort`](Self::PacketTooShort),
///   [`BadRtpVersion`](Self::BadRtpVersion),
///   [`EmptyStream`](Self::EmptyStream),
///   [`InvalidPayloadType`](Self::InvalidPayloadType).
/// - **Precondition not met**: [`NotSending`](Self::NotSending),
///   [`NotReceiving`](Self::NotReceiving),
///   [`NoSendCodec`](Self::NoSendCodec),
///   [`UnknownPayloadType`](Self::UnknownPayloadType),
///   [`UnknownStream`](Self::UnknownStream),
///   [`NoReceiver`](Self::NoReceiver),
///   [`NoSink`](Self::NoSink).
/// - **Negotiation rejection**: [`NoMatchingCodec`](Self::NoMatchingCodec),
///   [`UnsupportedCodec`](Self::UnsupportedCodec).
///
/// No failure is fatal: every rejected call leaves the channel in its
/// previously established state and safe to retry.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Underlying I/O error from the network sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// [`set_send(true)`](crate::channel::DataMediaChannel::set_send) has not
    /// been called on this channel.
    #[error("send direction not enabled")]
    NotSending,

    /// [`set_receive(true)`](crate::channel::DataMediaChannel::set_receive)
    /// has not been called on this channel.
    #[error("receive direction not enabled")]
    NotReceiving,

    /// No send codec has been negotiated via
    /// [`set_send_codecs`](crate::channel::DataMediaChannel::set_send_codecs).
    #[error("no send codec negotiated")]
    NoSendCodec,

    /// Inbound payload type is not in the negotiated receive codec set.
    #[error("payload type {0} not negotiated for receiving")]
    UnknownPayloadType(u8),

    /// SSRC is not registered as a stream in the relevant direction.
    #[error("ssrc {0} is not a registered stream")]
    UnknownStream(u32),

    /// No receiver has been attached for the inbound SSRC.
    #[error("no receiver registered for ssrc {0}")]
    NoReceiver(u32),

    /// None of the proposed codecs match a locally supported one.
    #[error("no usable codec in proposed list")]
    NoMatchingCodec,

    /// A proposed receive codec is not locally supported. Receive
    /// negotiation is all-or-nothing, so one unknown entry rejects the
    /// whole list.
    #[error("unsupported codec in proposed list: {0}")]
    UnsupportedCodec(String),

    /// Proposed codec id does not fit the 7-bit RTP payload-type field.
    #[error("codec id {0} is outside the payload type range 0..=127")]
    InvalidPayloadType(u8),

    /// Stream parameters carried no SSRCs.
    #[error("stream params contain no ssrcs")]
    EmptyStream,

    /// Payload exceeds the per-packet send limit.
    #[error("payload of {len} bytes exceeds maximum of {max}")]
    PayloadTooLarge { len: usize, max: usize },

    /// Inbound packet is shorter than the 12-byte RTP fixed header.
    #[error("packet of {0} bytes is shorter than the RTP fixed header")]
    PacketTooShort(usize),

    /// Inbound packet does not carry RTP version 2 (RFC 3550 §5.1).
    #[error("unsupported RTP version {0}")]
    BadRtpVersion(u8),

    /// No network sink has been attached to the channel.
    #[error("no network sink attached")]
    NoSink,
}

/// Convenience alias for `Result<T, DataError>`.
pub type Result<T> = std::result::Result<T, DataError>;
