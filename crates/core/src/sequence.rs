//! Per-channel sequence number and timestamp generation.

use std::sync::Arc;

use rand::RngExt;

use crate::clock::Clock;

/// Produces the `(sequence, timestamp)` pair for each outgoing packet.
///
/// Initial values are drawn randomly once per channel lifetime (RFC 3550
/// §5.1: unpredictable starts). Sequence numbers increment by one per
/// packet, wrapping at 16 bits. Timestamps are the random base plus
/// elapsed clock time scaled by the codec clock rate, wrapping at
/// 32 bits.
///
/// One generator serves the whole channel regardless of which SSRC a
/// send targets: sequencing is channel-scoped, not stream-scoped.
pub struct SequenceGenerator {
    clock: Arc<dyn Clock>,
    next_sequence: u16,
    timestamp_base: u32,
    start_secs: f64,
}

impl SequenceGenerator {
    /// Create a generator anchored to the clock's current reading.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let mut rng = rand::rng();
        let next_sequence = rng.random::<u16>();
        let timestamp_base = rng.random::<u32>();
        let start_secs = clock.now_secs();
        tracing::debug!(
            start_sequence = next_sequence,
            timestamp_base,
            "sequence generator initialized"
        );
        Self {
            clock,
            next_sequence,
            timestamp_base,
            start_secs,
        }
    }

    /// The `(sequence, timestamp)` pair the next packet would carry
    /// under the given codec clock rate. Does not consume the sequence
    /// number; callers [`commit`](Self::commit) once the packet has
    /// actually left the channel, so a send that fails at any stage
    /// never advances sequencing.
    pub fn peek(&self, clock_rate: u32) -> (u16, u32) {
        let elapsed = self.clock.now_secs() - self.start_secs;
        let ticks = (elapsed * f64::from(clock_rate)).round() as u64;
        let timestamp = self.timestamp_base.wrapping_add(ticks as u32);

        (self.next_sequence, timestamp)
    }

    /// Consume the current sequence number, wrapping at 16 bits.
    pub fn commit(&mut self) {
        self.next_sequence = self.next_sequence.wrapping_add(1);
    }
}

impl std::fmt::Debug for SequenceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceGenerator")
            .field("next_sequence", &self.next_sequence)
            .field("timestamp_base", &self.timestamp_base)
            .field("start_secs", &self.start_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn make_generator() -> (Arc<ManualClock>, SequenceGenerator) {
        let clock = Arc::new(ManualClock::new());
        let generator = SequenceGenerator::new(clock.clone());
        (clock, generator)
    }

    fn next(generator: &mut SequenceGenerator, clock_rate: u32) -> (u16, u32) {
        let pair = generator.peek(clock_rate);
        generator.commit();
        pair
    }

    #[test]
    fn sequence_increments_by_one() {
        let (_clock, mut generator) = make_generator();
        let (s1, _) = next(&mut generator, 90_000);
        let (s2, _) = next(&mut generator, 90_000);
        assert_eq!(s2, s1.wrapping_add(1));
    }

    #[test]
    fn peek_does_not_consume() {
        let (_clock, generator) = make_generator();
        let (s1, t1) = generator.peek(90_000);
        let (s2, t2) = generator.peek(90_000);
        assert_eq!(s1, s2);
        assert_eq!(t1, t2);
    }

    #[test]
    fn timestamp_unchanged_when_clock_frozen() {
        let (_clock, mut generator) = make_generator();
        let (_, t1) = next(&mut generator, 90_000);
        let (_, t2) = next(&mut generator, 90_000);
        assert_eq!(t1, t2);
    }

    #[test]
    fn timestamp_scales_with_clock_rate() {
        let (clock, mut generator) = make_generator();
        let (_, t1) = next(&mut generator, 90_000);
        clock.set(2.0);
        let (_, t2) = next(&mut generator, 90_000);
        assert_eq!(t2, t1.wrapping_add(180_000));
    }

    #[test]
    fn timestamp_rounds_fractional_ticks() {
        let (clock, mut generator) = make_generator();
        let (_, t1) = next(&mut generator, 1000);
        // 1.0005 s at 1 kHz is 1000.5 ticks, rounds to 1001.
        clock.set(1.0005);
        let (_, t2) = next(&mut generator, 1000);
        assert_eq!(t2, t1.wrapping_add(1001));
    }

    #[test]
    fn sequence_wraps_at_u16_max() {
        let (_clock, mut generator) = make_generator();
        generator.next_sequence = u16::MAX;
        let (s1, _) = next(&mut generator, 90_000);
        let (s2, _) = next(&mut generator, 90_000);
        assert_eq!(s1, u16::MAX);
        assert_eq!(s2, 0);
    }

    #[test]
    fn independent_generators_use_their_own_clocks() {
        let (clock1, mut gen1) = make_generator();
        let (clock2, mut gen2) = make_generator();

        let (_, a1) = next(&mut gen1, 90_000);
        let (_, b1) = next(&mut gen2, 90_000);

        clock1.set(1.0);
        clock2.set(2.0);

        let (_, a2) = next(&mut gen1, 90_000);
        let (_, b2) = next(&mut gen2, 90_000);

        assert_eq!(a2, a1.wrapping_add(90_000));
        assert_eq!(b2, b1.wrapping_add(180_000));
    }
}
