use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, Stream, StreamConfig};

use crate::error::AudioError;
use crate::mixer::{lock_state, Mixer, OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE};

/// Default output device streaming the mixer at a fixed stereo 44.1 kHz.
///
/// The stream stops when this is dropped.
pub struct AudioDevice {
    mixer: Mixer,
    _stream: Stream,
}

impl AudioDevice {
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let config = StreamConfig {
            channels: OUTPUT_CHANNELS,
            sample_rate: SampleRate(OUTPUT_SAMPLE_RATE),
            buffer_size: BufferSize::Default,
        };

        let mixer = Mixer::new(OUTPUT_SAMPLE_RATE);
        let state = mixer.shared_state();
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                lock_state(&state).render(data);
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        log::info!(
            "Audio output: {} ({} Hz, {} ch)",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            OUTPUT_SAMPLE_RATE,
            OUTPUT_CHANNELS
        );
        Ok(Self {
            mixer,
            _stream: stream,
        })
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}
