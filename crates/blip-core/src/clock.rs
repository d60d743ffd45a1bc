//! Sample-count audio clock.
//!
//! The clock counts samples (frames) handed to the audio device. It is the
//! only timeline used by both scheduling and synthesis, so they never disagree
//! even when the device invokes its callback at irregular intervals.
//!
//! Ownership is split by type:
//!
//! - [`AudioClock`] is owned by the mixer on the audio thread and is the only
//!   way to advance time. It is deliberately not `Clone`.
//! - [`ClockHandle`] is a cheap, cloneable, read-only view for game logic.
//!
//! ```rust
//! use blip_core::AudioClock;
//!
//! let mut clock = AudioClock::new(44100);
//! let handle = clock.handle();
//!
//! clock.advance(44100);
//! assert_eq!(handle.seconds(), 1.0);
//! ```

use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

/// Writer side of the audio clock.
#[derive(Debug)]
pub struct AudioClock {
    consumed: Arc<AtomicU64>,
    sample_rate: u32,
}

impl AudioClock {
    /// Create a clock at zero for a stream running at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            consumed: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    /// Advance by `frames` samples. Saturates rather than wrapping.
    #[inline]
    pub fn advance(&mut self, frames: u64) {
        let now = self.consumed.load(Ordering::Relaxed);
        self.consumed
            .store(now.saturating_add(frames), Ordering::Release);
    }

    /// Samples consumed so far.
    #[inline]
    pub fn samples(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Elapsed time in seconds.
    pub fn seconds(&self) -> f64 {
        samples_to_seconds(self.samples(), self.sample_rate)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Create a read-only handle sharing this clock.
    pub fn handle(&self) -> ClockHandle {
        ClockHandle {
            consumed: Arc::clone(&self.consumed),
            sample_rate: self.sample_rate,
        }
    }
}

/// Read-only view of an [`AudioClock`].
#[derive(Debug, Clone)]
pub struct ClockHandle {
    consumed: Arc<AtomicU64>,
    sample_rate: u32,
}

impl ClockHandle {
    /// Samples consumed so far.
    #[inline]
    pub fn samples(&self) -> u64 {
        self.consumed.load(Ordering::Acquire)
    }

    /// Elapsed time in seconds.
    pub fn seconds(&self) -> f64 {
        samples_to_seconds(self.samples(), self.sample_rate)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Convert a sample count to seconds; a zero rate reads as time zero.
#[inline]
pub fn samples_to_seconds(samples: u64, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        0.0
    } else {
        samples as f64 / f64::from(sample_rate)
    }
}
