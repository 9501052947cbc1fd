//! Integration tests exercising the full transmit pipeline in software.
//!
//! These tests wire the feeder, the shared driver and the DMA transmit queue
//! together and check what comes out of the DMA buffer, without hardware:
//!
//! ```text
//! StreamingFeeder → AudioPath.enqueue() → I2sTxQueue → isr() → [DMA buf]
//!       ▲                                                 │
//!       └──────────────── BlockPool (release) ◀───────────┘
//! ```

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::block::BlockPool;
    use crate::config::AudioConfig;
    use crate::constants::{BLOCK_FRAMES, BLOCK_SAMPLES, FEED_QUANTUM_MS, POOL_SIZE};
    use crate::feeder::{FeedOutcome, StreamingFeeder};
    use crate::io::interleave::unpack_frames;
    use crate::io::{AudioDriver, AudioPath, I2sTxQueue};
    use crate::mock::{CountingDelay, StdDelay};
    use crate::pattern::AudioPattern;
    use crate::state::ActiveState;

    type Queue<'a> = I2sTxQueue<'a>;

    fn configured_path<'a>() -> AudioPath<'a, Queue<'a>> {
        let path = AudioPath::new(AudioDriver::new(Queue::new()));
        path.configure(AudioConfig::reference()).unwrap();
        path
    }

    /// What the controller does on activation, minus the lines.
    fn activate<'a>(path: &AudioPath<'a, Queue<'a>>, state: &ActiveState, pattern: &'a AudioPattern) {
        path.lock(|d| {
            d.prime(pattern.into()).unwrap();
            d.start().unwrap();
        });
        state.replace(true);
    }

    /// One DMA completion. Returns the transmitted samples, if any.
    fn dma_cycle<'a>(path: &AudioPath<'a, Queue<'a>>) -> Option<[i16; BLOCK_SAMPLES]> {
        let mut dma = [0u32; BLOCK_FRAMES];
        if !path.lock(|d| d.transmitter_mut().isr(&mut dma)) {
            return None;
        }
        let mut samples = [0i16; BLOCK_SAMPLES];
        unpack_frames(&dma, &mut samples);
        Some(samples)
    }

    fn wait_until(deadline_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        cond()
    }

    // ---------------------------------------------------------------
    // Content: every transmitted block is the pattern
    // ---------------------------------------------------------------
    #[test]
    fn primed_and_fed_blocks_match_pattern() {
        let pool = BlockPool::new();
        let pattern = AudioPattern::reference();
        let path = configured_path();
        let state = ActiveState::new();
        let mut feeder = StreamingFeeder::new(&state, &pool, &pattern, &path, CountingDelay::default());

        activate(&path, &state, &pattern);
        for _ in 0..3 {
            assert_eq!(feeder.feed(), FeedOutcome::Submitted);
        }

        for _ in 0..4 {
            let samples = dma_cycle(&path).expect("block queued");
            assert_eq!(&samples, pattern.samples());
        }
        assert_eq!(pool.allocated_count(), 0);
    }

    // ---------------------------------------------------------------
    // Timing: 10 ms feed quantum against 16 ms blocks, simulated clock
    // ---------------------------------------------------------------
    #[test]
    fn simulated_timeline_never_underruns() {
        let pool = BlockPool::new();
        let pattern = AudioPattern::reference();
        let path = configured_path();
        let state = ActiveState::new();
        // A zero timeout stands in for "wait until the next DMA completion".
        let mut feeder = StreamingFeeder::new(&state, &pool, &pattern, &path, CountingDelay::default())
            .with_alloc_timeout(0);
        let block_ms = AudioConfig::reference().block_duration_us() / 1_000;
        assert_eq!(block_ms, 16);

        activate(&path, &state, &pattern);
        let mut played = 0;
        for t in 0..2_000u32 {
            if t % block_ms == 0 {
                let samples = dma_cycle(&path).unwrap_or_else(|| panic!("underrun at {} ms", t));
                assert_eq!(&samples, pattern.samples());
                played += 1;
            }
            if t % FEED_QUANTUM_MS == 0 {
                assert_ne!(feeder.feed(), FeedOutcome::Failed);
            }
            assert!(pool.allocated_count() <= POOL_SIZE as u32);
        }

        assert_eq!(played, 2_000u32.div_ceil(block_ms));
        path.lock(|d| {
            assert_eq!(d.transmitter().underruns(), 0);
            assert_eq!(d.transmitter().transmitted(), played);
        });
    }

    // ---------------------------------------------------------------
    // Pool accounting: stop hands every queued block back
    // ---------------------------------------------------------------
    #[test]
    fn stop_returns_all_blocks() {
        let pool = BlockPool::new();
        let pattern = AudioPattern::reference();
        let path = configured_path();
        let state = ActiveState::new();
        let mut feeder = StreamingFeeder::new(&state, &pool, &pattern, &path, CountingDelay::default())
            .with_alloc_timeout(0);

        activate(&path, &state, &pattern);
        while feeder.feed() == FeedOutcome::Submitted {}
        assert!(pool.is_exhausted());

        state.replace(false);
        path.lock(|d| d.stop()).unwrap();
        assert_eq!(pool.allocated_count(), 0);
        assert_eq!(feeder.feed(), FeedOutcome::Idle);
        assert!(dma_cycle(&path).is_none());
    }

    #[test]
    fn stopped_pipeline_outputs_silence() {
        let path = configured_path();
        let mut dma = [0x1234_5678u32; BLOCK_FRAMES];
        assert!(!path.lock(|d| d.transmitter_mut().isr(&mut dma)));
        assert!(dma.iter().all(|&f| f == 0));
        path.lock(|d| assert_eq!(d.transmitter().underruns(), 0));
    }

    // ---------------------------------------------------------------
    // Backpressure: the feeder waits on the pool, not on a timer
    // ---------------------------------------------------------------
    #[test]
    fn feeder_blocks_until_transmitter_releases() {
        let pool = BlockPool::new();
        let pattern = AudioPattern::reference();
        let path = configured_path();
        let state = ActiveState::new();
        let submitted = AtomicU32::new(0);
        let done = AtomicBool::new(false);

        activate(&path, &state, &pattern);

        thread::scope(|s| {
            s.spawn(|| {
                let mut feeder = StreamingFeeder::new(&state, &pool, &pattern, &path, StdDelay);
                while !done.load(Ordering::SeqCst) {
                    if feeder.step() == FeedOutcome::Submitted {
                        submitted.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });

            assert!(wait_until(1_000, || submitted.load(Ordering::SeqCst) == POOL_SIZE as u32));
            thread::sleep(Duration::from_millis(50));
            assert_eq!(submitted.load(Ordering::SeqCst), POOL_SIZE as u32);
            assert!(pool.is_exhausted());

            // The primed pattern goes first and frees nothing.
            assert!(dma_cycle(&path).is_some());
            thread::sleep(Duration::from_millis(30));
            assert_eq!(submitted.load(Ordering::SeqCst), POOL_SIZE as u32);

            // The first pooled block frees a slot.
            assert!(dma_cycle(&path).is_some());
            assert!(wait_until(1_000, || submitted.load(Ordering::SeqCst) == POOL_SIZE as u32 + 1));

            done.store(true, Ordering::SeqCst);
            state.replace(false);
            path.lock(|d| d.stop()).unwrap();
        });

        assert_eq!(pool.allocated_count(), 0);
    }

    // ---------------------------------------------------------------
    // Real threads: feeder and DMA running side by side
    // ---------------------------------------------------------------
    #[test]
    fn threaded_stream_plays_only_the_pattern() {
        let pool = BlockPool::new();
        let pattern = AudioPattern::reference();
        let path = configured_path();
        let state = ActiveState::new();
        let done = AtomicBool::new(false);

        activate(&path, &state, &pattern);

        let played = thread::scope(|s| {
            s.spawn(|| {
                let mut feeder = StreamingFeeder::new(&state, &pool, &pattern, &path, StdDelay);
                while !done.load(Ordering::SeqCst) {
                    feeder.step();
                }
            });

            let dma = s.spawn(|| {
                let mut played = 0u32;
                for _ in 0..20 {
                    thread::sleep(Duration::from_millis(16));
                    if let Some(samples) = dma_cycle(&path) {
                        assert_eq!(&samples, pattern.samples());
                        played += 1;
                    }
                }
                played
            });
            let played = dma.join().unwrap();

            done.store(true, Ordering::SeqCst);
            state.replace(false);
            path.lock(|d| d.stop()).unwrap();
            played
        });

        assert!(played > 0);
        assert_eq!(pool.allocated_count(), 0);
    }
}
