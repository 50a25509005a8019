//! Channel factory and shared configuration.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::channel::DataMediaChannel;
use crate::clock::{Clock, SystemClock};
use crate::codec::{CodecRegistry, DataCodec};
use crate::sequence::SequenceGenerator;

/// Factory for [`DataMediaChannel`]s sharing a codec table and a clock.
///
/// The clock is the only thing channels share, and only read-only: each
/// channel gets its own sequence generator seeded from the engine's
/// clock at creation time, so channels built from engines with
/// independent clocks progress independently.
pub struct DataEngine {
    clock: RwLock<Arc<dyn Clock>>,
    codecs: CodecRegistry,
}

impl DataEngine {
    /// Engine with the monotonic system clock and the default codec table.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Engine with an injected clock, typically a deterministic one.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock: RwLock::new(clock),
            codecs: CodecRegistry::default(),
        }
    }

    /// Replace the time source used by subsequently created channels.
    /// Channels created earlier keep the clock they were built with.
    pub fn set_clock(&self, clock: Arc<dyn Clock>) {
        *self.clock.write() = clock;
    }

    /// The codecs this engine supports, for the signaling layer to offer.
    pub fn codecs(&self) -> &[DataCodec] {
        self.codecs.supported()
    }

    /// Create a new channel bound to this engine's clock and codec table.
    pub fn create_channel(&self) -> DataMediaChannel {
        let clock = self.clock.read().clone();
        let sequencer = SequenceGenerator::new(clock);
        tracing::debug!("data channel created");
        DataMediaChannel::new(self.codecs.clone(), sequencer)
    }
}

impl Default for DataEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn engine_offers_google_data() {
        let engine = DataEngine::new();
        assert_eq!(engine.codecs().len(), 1);
        assert_eq!(engine.codecs()[0], DataCodec::google_data());
    }

    #[test]
    fn set_clock_affects_later_channels_only() {
        let first = Arc::new(ManualClock::new());
        let engine = DataEngine::with_clock(first.clone());
        let _early = engine.create_channel();

        let second = Arc::new(ManualClock::new());
        engine.set_clock(second.clone());
        let _late = engine.create_channel();

        // first: test + early channel. second: test + engine + late channel.
        assert_eq!(Arc::strong_count(&first), 2);
        assert_eq!(Arc::strong_count(&second), 3);
    }
}
