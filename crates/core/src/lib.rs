pub mod channel;
pub mod clock;
pub mod codec;
pub mod engine;
pub mod error;
pub mod rtp;
pub mod sequence;
pub mod stream;

pub use channel::{DataMediaChannel, MAX_SEND_PAYLOAD_LEN, NetworkSink, SendDataParams};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{CodecRegistry, DataCodec, MAX_PAYLOAD_TYPE_ID};
pub use engine::DataEngine;
pub use error::{DataError, Result};
pub use stream::{DataReceiver, ReceiveDataParams, StreamParams};
