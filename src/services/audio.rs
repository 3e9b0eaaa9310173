//! Audible cue capability
//!
//! Synthesizes short tone sequences and plays them on the default
//! output device. Synthesis is pure so the cue shape is testable
//! without audio hardware.

use std::f32::consts::PI;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tracing::{debug, warn};

/// One piecewise-constant segment of a tone sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneStep {
    pub frequency_hz: f32,
    pub at_seconds: f32,
}

/// The phase-completion cue: a three-step chirp under a decaying envelope
pub const COMPLETION_CUE: [ToneStep; 3] = [
    ToneStep {
        frequency_hz: 800.0,
        at_seconds: 0.0,
    },
    ToneStep {
        frequency_hz: 600.0,
        at_seconds: 0.1,
    },
    ToneStep {
        frequency_hz: 800.0,
        at_seconds: 0.2,
    },
];

/// Total cue length in seconds
pub const CUE_SECONDS: f32 = 0.3;
/// Envelope start gain
const CUE_GAIN: f32 = 0.3;
/// Envelope floor the gain decays to over the cue
const CUE_FLOOR: f32 = 0.01;

/// Play the default completion cue, blocking for roughly its length.
pub fn play_completion_cue() -> Result<(), String> {
    play_tone(&COMPLETION_CUE)
}

/// Play a tone sequence on the default output device.
pub fn play_tone(steps: &[ToneStep]) -> Result<(), String> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| "No default output device available".to_string())?;

    let default_config = device
        .default_output_config()
        .map_err(|e| format!("Failed to query output config: {}", e))?;
    let format = default_config.sample_format();
    let config: StreamConfig = default_config.into();
    let sample_rate = config.sample_rate.0;
    let channels = usize::from(config.channels.max(1));

    debug!(
        "Playing cue: format={:?} sample_rate={}Hz channels={}",
        format, sample_rate, channels
    );

    let samples = synthesize(steps, sample_rate);
    let mut position = 0usize;

    let err_fn = |err| warn!("Audio stream error: {}", err);

    // The callback writes mono samples into every channel and pads with
    // silence once the cue runs out.
    let stream = match format {
        SampleFormat::F32 => device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(position).copied().unwrap_or(0.0);
                        position += 1;
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| format!("Failed to build output stream: {}", e))?,
        SampleFormat::I16 => device
            .build_output_stream(
                &config,
                move |data: &mut [i16], _| {
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(position).copied().unwrap_or(0.0);
                        position += 1;
                        for out in frame.iter_mut() {
                            *out = (sample * i16::MAX as f32) as i16;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| format!("Failed to build output stream: {}", e))?,
        SampleFormat::U16 => device
            .build_output_stream(
                &config,
                move |data: &mut [u16], _| {
                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(position).copied().unwrap_or(0.0);
                        position += 1;
                        for out in frame.iter_mut() {
                            *out = ((sample + 1.0) * 0.5 * u16::MAX as f32) as u16;
                        }
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| format!("Failed to build output stream: {}", e))?,
        other => return Err(format!("Unsupported sample format: {:?}", other)),
    };

    stream
        .play()
        .map_err(|e| format!("Failed to start output stream: {}", e))?;

    // Let the callback drain the cue before tearing the stream down.
    std::thread::sleep(Duration::from_secs_f32(CUE_SECONDS + 0.05));
    drop(stream);

    Ok(())
}

/// Render a tone sequence into mono f32 samples.
///
/// Frequency follows the most recent step at each instant; gain decays
/// exponentially from `CUE_GAIN` to `CUE_FLOOR` across the cue. Phase
/// accumulates continuously so step changes do not click.
pub fn synthesize(steps: &[ToneStep], sample_rate: u32) -> Vec<f32> {
    let total = (CUE_SECONDS * sample_rate as f32) as usize;
    let mut samples = Vec::with_capacity(total);
    let mut phase = 0.0f32;

    for n in 0..total {
        let t = n as f32 / sample_rate as f32;
        let frequency = frequency_at(steps, t);
        phase = (phase + 2.0 * PI * frequency / sample_rate as f32) % (2.0 * PI);
        let envelope = CUE_GAIN * (CUE_FLOOR / CUE_GAIN).powf(t / CUE_SECONDS);
        samples.push(phase.sin() * envelope);
    }

    samples
}

/// The frequency in effect at `t`, given steps sorted by start offset.
fn frequency_at(steps: &[ToneStep], t: f32) -> f32 {
    steps
        .iter()
        .rev()
        .find(|step| t >= step.at_seconds)
        .map(|step| step.frequency_hz)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_steps_select_in_order() {
        assert_eq!(frequency_at(&COMPLETION_CUE, 0.0), 800.0);
        assert_eq!(frequency_at(&COMPLETION_CUE, 0.05), 800.0);
        assert_eq!(frequency_at(&COMPLETION_CUE, 0.1), 600.0);
        assert_eq!(frequency_at(&COMPLETION_CUE, 0.15), 600.0);
        assert_eq!(frequency_at(&COMPLETION_CUE, 0.25), 800.0);
    }

    #[test]
    fn synthesized_cue_has_expected_length() {
        let samples = synthesize(&COMPLETION_CUE, 48_000);
        assert_eq!(samples.len(), (0.3 * 48_000.0) as usize);
    }

    #[test]
    fn envelope_decays_over_the_cue() {
        let sample_rate = 48_000;
        let samples = synthesize(&COMPLETION_CUE, sample_rate);

        let peak = |window: &[f32]| window.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let head = peak(&samples[..sample_rate as usize / 50]);
        let tail = peak(&samples[samples.len() - sample_rate as usize / 50..]);

        assert!(head > tail * 2.0, "head={} tail={}", head, tail);
        assert!(head <= CUE_GAIN + 1e-3);
    }

    #[test]
    fn samples_stay_in_unit_range() {
        for sample in synthesize(&COMPLETION_CUE, 44_100) {
            assert!(sample.abs() <= 1.0);
        }
    }
}
