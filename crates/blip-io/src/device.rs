//! Output device enumeration.

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};

/// Output device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the host's default output.
    pub is_default: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Default channel count.
    pub default_channels: u16,
}

pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

fn describe(device: &Device, is_default: bool) -> Option<AudioDevice> {
    let name = device_name(device).ok()?;
    let (default_sample_rate, default_channels) = device
        .default_output_config()
        .map(|c| (c.sample_rate(), c.channels()))
        .unwrap_or((44100, 2));
    Some(AudioDevice {
        name,
        is_default,
        default_sample_rate,
        default_channels,
    })
}

/// List the host's output devices. Devices that cannot be queried are skipped.
pub(crate) fn list_output_devices(host: &Host) -> Vec<AudioDevice> {
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());

    let mut devices = Vec::new();
    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            let is_default = device_name(&device).ok() == default_name;
            if let Some(info) = describe(&device, is_default) {
                devices.push(info);
            }
        }
    }
    devices
}

/// The host's default output device, if it can be queried.
pub(crate) fn default_output_device(host: &Host) -> Option<AudioDevice> {
    host.default_output_device().and_then(|d| describe(&d, true))
}
