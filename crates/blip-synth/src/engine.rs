//! Scheduler/renderer split.
//!
//! Game logic and the audio callback never share the note pool. Instead,
//! [`ToneEngine::new`] produces two halves connected by a bounded channel:
//!
//! ```text
//! logic thread                          audio thread
//! ToneScheduler ──[ToneCommand queue]──► ToneRenderer ─► Mixer ─► PCM
//!       │                                     │
//!       └──── SharedControls (atomics) ◄──────┘
//!       └──── ClockHandle (read-only) ◄─── AudioClock
//! ```
//!
//! The scheduler only ever calls `try_send`; the renderer drains the queue with
//! `try_recv` at the start of each callback. Neither side blocks. A full queue
//! drops a tone request and bumps a counter.
//!
//! Stops also bump a generation counter in [`SharedControls`]. When the queue
//! has room, the stop marker keeps its place among the requests; when it does
//! not, the renderer applies the stop after draining what was already queued.

use std::sync::Arc;

use blip_core::{AudioClock, ClockHandle, PcmSample, Waveform};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::controls::SharedControls;
use crate::error::Result;
use crate::mixer::Mixer;
use crate::note::ToneRequest;
use crate::params::EngineParams;

/// Volume change per [`ToneScheduler::volume_up`] / [`ToneScheduler::volume_down`].
pub const VOLUME_STEP: f32 = 0.05;

/// Message from the logic thread to the audio thread.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToneCommand {
    /// Add a note.
    Schedule(ToneRequest),
    /// Silence everything, up to and including this stop generation.
    StopAll(u64),
}

/// A freshly built engine, ready to be split between threads.
#[derive(Debug)]
pub struct ToneEngine {
    scheduler: ToneScheduler,
    renderer: ToneRenderer,
}

impl ToneEngine {
    /// Build the mixer and the queue between the two halves.
    ///
    /// The queue holds as many commands as the pool holds notes.
    pub fn new(params: EngineParams) -> Result<Self> {
        let mixer = Mixer::new(params)?;
        let (tx, rx) = bounded(params.pool_capacity);
        let controls = Arc::new(SharedControls::new(
            params.waveform == Waveform::QuantizedSine,
        ));

        tracing::info!(
            sample_rate = params.sample_rate,
            channels = params.channels,
            pool_capacity = params.pool_capacity,
            "tone engine ready"
        );

        Ok(Self {
            scheduler: ToneScheduler {
                tx: Some(tx),
                controls: Arc::clone(&controls),
                clock: mixer.clock_handle(),
            },
            renderer: ToneRenderer {
                rx,
                controls,
                mixer,
                stops_applied: 0,
            },
        })
    }

    /// Separate the logic-thread and audio-thread halves.
    pub fn split(self) -> (ToneScheduler, ToneRenderer) {
        (self.scheduler, self.renderer)
    }
}

/// Logic-thread half: requests tones and reads the audio clock.
///
/// Every method is a cheap, non-blocking no-op once sound is off.
#[derive(Debug, Clone)]
pub struct ToneScheduler {
    tx: Option<Sender<ToneCommand>>,
    controls: Arc<SharedControls>,
    clock: ClockHandle,
}

impl ToneScheduler {
    /// A scheduler with sound permanently off.
    pub fn disabled(sample_rate: u32) -> Self {
        Self {
            tx: None,
            controls: Arc::new(SharedControls::disabled()),
            clock: AudioClock::new(sample_rate).handle(),
        }
    }

    /// Request a tone of `frequency` Hz lasting `duration` seconds, starting at
    /// `when` on the audio clock. A `when` in the past plays as soon as the
    /// audio thread notices it.
    pub fn play_tone(&self, frequency: f32, duration: f64, when: f64) {
        let request = ToneRequest::new(frequency, when, duration);
        if request.is_playable() {
            self.send(ToneCommand::Schedule(request));
        }
    }

    /// Silence every note within one fade-out.
    pub fn stop_tone(&self) {
        if !self.is_enabled() {
            return;
        }
        let generation = self.controls.request_stop();
        self.send(ToneCommand::StopAll(generation));
    }

    fn send(&self, command: ToneCommand) {
        if !self.is_enabled() {
            return;
        }
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(ToneCommand::Schedule(_))) => self.controls.record_drop(),
            // Applied from the stop counter after the next drain.
            Err(TrySendError::Full(ToneCommand::StopAll(_))) => {}
            Err(TrySendError::Disconnected(_)) => {
                tracing::warn!("audio renderer is gone, turning sound off");
                self.controls.disable();
            }
        }
    }

    /// Seconds of audio played so far, or 0 when sound is off.
    pub fn audio_time(&self) -> f64 {
        if self.is_enabled() {
            self.clock.seconds()
        } else {
            0.0
        }
    }

    /// Read-only handle to the audio clock.
    pub fn clock_handle(&self) -> &ClockHandle {
        &self.clock
    }

    /// Whether sound is on.
    pub fn is_enabled(&self) -> bool {
        self.controls.is_enabled()
    }

    /// Turn sound off. The renderer outputs silence from its next callback on.
    pub fn disable(&self) {
        self.controls.disable();
    }

    /// Master volume in `[0, 1]`.
    pub fn volume(&self) -> f32 {
        self.controls.volume().get()
    }

    /// Set master volume, clamped to `[0, 1]`.
    pub fn set_volume(&self, volume: f32) {
        if self.is_enabled() {
            self.controls.volume().set(volume);
        }
    }

    /// Raise master volume by one step.
    pub fn volume_up(&self) {
        self.set_volume(self.volume() + VOLUME_STEP);
    }

    /// Lower master volume by one step.
    pub fn volume_down(&self) {
        self.set_volume(self.volume() - VOLUME_STEP);
    }

    /// Whether the quantized sine is selected.
    pub fn is_quantized(&self) -> bool {
        self.controls.is_quantized()
    }

    /// Select or deselect the quantized sine.
    pub fn set_quantized(&self, on: bool) {
        if self.is_enabled() {
            self.controls.set_quantized(on);
        }
    }

    /// Flip the quantized sine, returning the new state.
    pub fn toggle_quantized(&self) -> bool {
        if self.is_enabled() {
            self.controls.toggle_quantized()
        } else {
            self.is_quantized()
        }
    }

    /// Requests that never reached the pool: queue full, pool full, or
    /// skipped as late.
    pub fn dropped_requests(&self) -> u64 {
        self.controls.dropped()
    }
}

/// Audio-thread half: owns the mixer.
#[derive(Debug)]
pub struct ToneRenderer {
    rx: Receiver<ToneCommand>,
    controls: Arc<SharedControls>,
    mixer: Mixer,
    stops_applied: u64,
}

impl ToneRenderer {
    /// Fill `out` with interleaved PCM.
    ///
    /// Drains pending commands first, then picks up volume and waveform from
    /// the shared controls. Writes silence without touching the pool once
    /// sound is off.
    pub fn render<S: PcmSample>(&mut self, out: &mut [S]) {
        if !self.controls.is_enabled() {
            out.fill(S::SILENCE);
            return;
        }

        let requested = self.controls.stop_requests();
        while let Ok(command) = self.rx.try_recv() {
            match command {
                ToneCommand::Schedule(request) => {
                    if !self.mixer.schedule(request) {
                        self.controls.record_drop();
                    }
                }
                ToneCommand::StopAll(generation) => self.apply_stop(generation),
            }
        }
        // Stops whose marker did not fit in the queue.
        self.apply_stop(requested);

        self.mixer.set_volume(self.controls.volume().get());
        self.mixer.set_waveform(if self.controls.is_quantized() {
            Waveform::QuantizedSine
        } else {
            Waveform::Sine
        });

        self.mixer.render(out);
    }

    fn apply_stop(&mut self, generation: u64) {
        if generation > self.stops_applied {
            self.mixer.stop_all();
            self.stops_applied = generation;
        }
    }

    /// The mixer driven by this renderer.
    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.mixer.params().sample_rate
    }

    /// Interleaved output channels.
    pub fn channels(&self) -> u16 {
        self.mixer.params().channels
    }
}
