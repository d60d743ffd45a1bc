//! blip - schedule and play sine tones from the command line.

mod commands;
mod tune;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blip")]
#[command(author, version, about = "Polyphonic tone scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play tones on an audio device
    Play(commands::play::PlayArgs),

    /// Render tones to a WAV file
    Render(commands::render::RenderArgs),

    /// List audio output devices
    Devices(commands::devices::DevicesArgs),

    /// Show or create the settings file
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
