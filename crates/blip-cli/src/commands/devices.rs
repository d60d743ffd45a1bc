//! Output device listing.

use clap::Args;

use blip_io::{AudioBackend, CpalBackend};

#[derive(Args)]
pub struct DevicesArgs {
    /// Only show the default output device
    #[arg(long)]
    default: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    let backend = CpalBackend::new();

    if args.default {
        match backend.default_output_device()? {
            Some(device) => {
                println!("Default Output:");
                println!("  Name: {}", device.name);
                println!("  Sample Rate: {} Hz", device.default_sample_rate);
                println!("  Channels: {}", device.default_channels);
            }
            None => println!("Default Output: None"),
        }
        return Ok(());
    }

    let devices = backend.list_devices()?;
    if devices.is_empty() {
        println!("No output devices found.");
        return Ok(());
    }

    println!("Output Devices ({})", backend.name());
    println!("==============\n");
    for (idx, device) in devices.iter().enumerate() {
        let marker = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz, {} ch){}",
            idx, device.name, device.default_sample_rate, device.default_channels, marker
        );
    }
    println!();
    println!("Tip: pass a partial name with --output:");
    println!("  blip play --demo --output \"USB\"");

    Ok(())
}
