//! Offline rendering without an audio device.
//!
//! Drives a [`ToneRenderer`] the same way a device callback would, block by
//! block, and collects the 16-bit output.

use blip_synth::ToneRenderer;

/// Render `frames` frames in blocks of `block` frames, calling `on_block` with
/// the number of frames produced after each block.
pub fn render_blocks<F>(
    renderer: &mut ToneRenderer,
    frames: usize,
    block: usize,
    mut on_block: F,
) -> Vec<i16>
where
    F: FnMut(usize),
{
    let channels = usize::from(renderer.channels());
    let mut out = vec![0i16; frames * channels];
    for chunk in out.chunks_mut(block.max(1) * channels) {
        renderer.render(chunk);
        on_block(chunk.len() / channels);
    }
    out
}

/// Render `frames` frames of interleaved 16-bit PCM.
pub fn render_to_vec(renderer: &mut ToneRenderer, frames: usize, block: usize) -> Vec<i16> {
    render_blocks(renderer, frames, block, |_| {})
}
