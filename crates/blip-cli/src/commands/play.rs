//! Live tone playback.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Args;

use blip_io::{CpalBackend, SoundStatus, open_sound};
use blip_synth::ToneScheduler;

use super::common::{collect_tones, load_config, sound_settings};
use crate::tune::{ToneSpec, parse_tone, tune_length};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Slack on top of the tune length before giving up on a stalled device.
const STALL_GRACE: Duration = Duration::from_secs(2);

#[derive(Args)]
pub struct PlayArgs {
    /// Tone to play, as FREQ:DUR[@WHEN] (repeatable)
    #[arg(short, long, value_parser = parse_tone)]
    tone: Vec<ToneSpec>,

    /// Play the demo jingle
    #[arg(long)]
    demo: bool,

    /// Run without opening a device
    #[arg(long)]
    no_sound: bool,

    /// Use the quantized sine
    #[arg(short, long)]
    quantized: bool,

    /// Master volume (0.0 to 1.0)
    #[arg(short, long)]
    volume: Option<f32>,

    /// Output device (partial name)
    #[arg(short, long)]
    output: Option<String>,

    /// Settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.no_sound {
        config.sound_enabled = false;
    }
    if args.quantized {
        config.quantized = true;
    }
    if let Some(volume) = args.volume {
        config.volume = volume.clamp(0.0, 1.0);
    }
    if args.output.is_some() {
        config.device = args.output;
    }
    let tones = collect_tones(args.tone, args.demo)?;

    let sound = open_sound(&CpalBackend::new(), &sound_settings(&config));
    match sound.status() {
        SoundStatus::On {
            device,
            sample_rate,
            channels,
            format,
        } => println!("Playing on {device} ({sample_rate} Hz, {channels} ch, {format})"),
        SoundStatus::Off(reason) => {
            println!("Sound off: {reason}");
            return Ok(());
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let tones_out = sound.scheduler();
    let base = tones_out.audio_time();
    for tone in &tones {
        tones_out.play_tone(tone.frequency, tone.duration, base + tone.when);
    }
    println!(
        "Scheduled {} tone(s), {:.2}s. Press Ctrl+C to stop.",
        tones.len(),
        tune_length(&tones)
    );

    let fade = config.synth.fade_out_ms / 1000.0;
    let finished = wait_for_tune(tones_out, base + tune_length(&tones) + fade, &running);

    if !finished {
        println!("\nStopping...");
        tones_out.stop_tone();
        std::thread::sleep(Duration::from_secs_f64(fade) + POLL_INTERVAL);
    }

    let dropped = tones_out.dropped_requests();
    if dropped > 0 {
        tracing::warn!(dropped, "tone requests dropped");
    }
    println!("Done!");
    Ok(())
}

/// Block until the audio clock passes `until`. Returns `false` if
/// interrupted or if the clock stops advancing.
fn wait_for_tune(tones: &ToneScheduler, until: f64, running: &AtomicBool) -> bool {
    let remaining = Duration::from_secs_f64((until - tones.audio_time()).max(0.0));
    let deadline = Instant::now() + remaining + STALL_GRACE;

    while tones.audio_time() < until {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        if Instant::now() > deadline {
            tracing::warn!(
                audio_time = tones.audio_time(),
                until,
                "audio clock stalled"
            );
            return false;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    true
}
