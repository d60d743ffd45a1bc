//! Offline rendering to a WAV file.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use blip_core::peak;
use blip_io::{WavSpec, render_blocks, write_wav_i16};
use blip_synth::ToneEngine;

use super::common::{collect_tones, load_config};
use crate::tune::{ToneSpec, parse_tone, tune_length};

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Tone to render, as FREQ:DUR[@WHEN] (repeatable)
    #[arg(short, long, value_parser = parse_tone)]
    tone: Vec<ToneSpec>,

    /// Render the demo jingle
    #[arg(long)]
    demo: bool,

    /// Length in seconds (default: until the last tone has faded)
    #[arg(short, long)]
    duration: Option<f64>,

    /// Use the quantized sine
    #[arg(short, long)]
    quantized: bool,

    /// Master volume (0.0 to 1.0)
    #[arg(short, long)]
    volume: Option<f32>,

    /// Frames per rendered block
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.quantized {
        config.quantized = true;
    }
    let tones = collect_tones(args.tone, args.demo)?;

    let params = config.to_engine_params();
    let length = match args.duration {
        Some(d) if d.is_finite() && d >= 0.0 => d,
        Some(d) => anyhow::bail!("invalid duration {d}"),
        None => tune_length(&tones) + params.fade_out_secs,
    };
    let frames = (length * f64::from(params.sample_rate)).ceil() as usize;

    let (scheduler, mut renderer) = ToneEngine::new(params)?.split();
    scheduler.set_volume(args.volume.unwrap_or(config.volume));
    scheduler.set_quantized(config.quantized);
    for tone in &tones {
        scheduler.play_tone(tone.frequency, tone.duration, tone.when);
    }

    println!(
        "Rendering {} tone(s), {:.2}s at {} Hz...",
        tones.len(),
        length,
        params.sample_rate
    );

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let samples = render_blocks(&mut renderer, frames, args.block_size, |n| {
        pb.inc(n as u64);
    });
    pb.finish_with_message("done");

    let dropped = scheduler.dropped_requests();
    if dropped > 0 {
        tracing::warn!(dropped, "tone requests dropped");
    }

    let spec = WavSpec {
        channels: params.channels,
        sample_rate: params.sample_rate,
    };
    write_wav_i16(&args.output, &samples, spec)?;

    let level: Vec<f32> = samples.iter().map(|&s| f32::from(s)).collect();
    println!("\nResults:");
    println!("  Frames: {}", frames);
    println!("  Peak:   {:.0}", peak(&level));
    println!("Saved to {}", args.output.display());

    Ok(())
}
