//! Lock-free controls shared between the logic and audio threads.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

/// A thread-safe atomic parameter using bit-cast f32.
///
/// Logic thread writes, audio thread reads. No locks, no allocations.
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicU32,
    min: f32,
    max: f32,
}

impl AtomicParam {
    /// Create a new atomic parameter with range and initial value.
    pub fn new(initial: f32, min: f32, max: f32) -> Self {
        Self {
            value: AtomicU32::new(initial.clamp(min, max).to_bits()),
            min,
            max,
        }
    }

    /// Set the value, clamped to range. NaN is ignored.
    #[inline]
    pub fn set(&self, v: f32) {
        if v.is_nan() {
            return;
        }
        let clamped = v.clamp(self.min, self.max);
        self.value.store(clamped.to_bits(), Ordering::Release);
    }

    /// Get the value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.value.load(Ordering::Acquire))
    }
}

/// State read by the renderer on every callback and written by the scheduler.
#[derive(Debug)]
pub struct SharedControls {
    enabled: AtomicBool,
    volume: AtomicParam,
    quantized: AtomicBool,
    dropped: AtomicU64,
    stop_requests: AtomicU64,
}

impl SharedControls {
    /// Create controls with sound on at full volume.
    pub fn new(quantized: bool) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            volume: AtomicParam::new(1.0, 0.0, 1.0),
            quantized: AtomicBool::new(quantized),
            dropped: AtomicU64::new(0),
            stop_requests: AtomicU64::new(0),
        }
    }

    /// Controls for an engine that never produces sound.
    pub fn disabled() -> Self {
        let controls = Self::new(false);
        controls.enabled.store(false, Ordering::Relaxed);
        controls
    }

    /// Whether sound is on.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Turn sound off for good.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Master volume parameter.
    pub fn volume(&self) -> &AtomicParam {
        &self.volume
    }

    /// Whether the quantized sine is selected.
    #[inline]
    pub fn is_quantized(&self) -> bool {
        self.quantized.load(Ordering::Acquire)
    }

    /// Select or deselect the quantized sine.
    pub fn set_quantized(&self, on: bool) {
        self.quantized.store(on, Ordering::Release);
    }

    /// Flip the quantized sine, returning the new state.
    pub fn toggle_quantized(&self) -> bool {
        !self.quantized.fetch_xor(true, Ordering::AcqRel)
    }

    /// Count one request that never reached the pool.
    #[inline]
    pub fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Requests dropped so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Register a stop and return its generation, starting at 1.
    ///
    /// The counter never depends on queue space, so a stop is never lost.
    pub fn request_stop(&self) -> u64 {
        self.stop_requests.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Generation of the latest stop request, 0 if none.
    #[inline]
    pub fn stop_requests(&self) -> u64 {
        self.stop_requests.load(Ordering::Acquire)
    }
}
