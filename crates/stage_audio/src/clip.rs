//! Decoded sample data.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::error::AudioError;

/// Interleaved f32 samples in [-1, 1] with their channel count and rate.
#[derive(Debug, Clone)]
pub struct Clip {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl Clip {
    pub fn from_samples(
        samples: Vec<f32>,
        channels: u16,
        sample_rate: u32,
    ) -> Result<Self, AudioError> {
        if channels == 0 {
            return Err(AudioError::NoChannels);
        }
        if sample_rate == 0 {
            return Err(AudioError::ZeroSampleRate);
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Decodes a WAV file. Integer PCM of any bit depth is scaled to [-1, 1].
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let decoded = hound::WavReader::open(path).and_then(decode);
        let (samples, spec) = decoded.map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_samples(samples, spec.channels, spec.sample_rate)
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Stereo pair for frame `index`. Mono is duplicated; channels past the
    /// second are ignored.
    pub fn frame(&self, index: usize) -> (f32, f32) {
        let channels = self.channels as usize;
        let start = index * channels;
        match self.samples.get(start..start + channels) {
            Some([mono]) => (*mono, *mono),
            Some([left, right, ..]) => (*left, *right),
            _ => (0.0, 0.0),
        }
    }
}

fn decode<R: Read>(reader: hound::WavReader<R>) -> Result<(Vec<f32>, hound::WavSpec), hound::Error> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << spec.bits_per_sample.saturating_sub(1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok((samples, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "stage_clip_test_{}_{}_{}.wav",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn write_wav(path: &Path, spec: hound::WavSpec, samples: &[i16]) {
        let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
        for &s in samples {
            writer.write_sample(s).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }

    #[test]
    fn load_scales_16_bit_pcm() {
        let path = temp_file_path("pcm16");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, &[0, 16_384, -32_768]);

        let clip = Clip::load(&path).expect("valid wav");
        assert_eq!(clip.channels(), 1);
        assert_eq!(clip.sample_rate(), 22_050);
        assert_eq!(clip.frames(), 3);
        assert_eq!(clip.frame(1), (0.5, 0.5));
        assert_eq!(clip.frame(2), (-1.0, -1.0));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn stereo_frames_keep_channels_apart() {
        let path = temp_file_path("stereo");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, &[16_384, -16_384, 0, 8_192]);

        let clip = Clip::load(&path).expect("valid wav");
        assert_eq!(clip.frames(), 2);
        assert_eq!(clip.frame(0), (0.5, -0.5));
        assert_eq!(clip.frame(1), (0.0, 0.25));
        assert_eq!(clip.frame(7), (0.0, 0.0));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = Clip::load(&path).expect_err("missing file");
        match err {
            AudioError::Decode { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_zero_channels() {
        assert!(matches!(
            Clip::from_samples(vec![0.0], 0, 44_100),
            Err(AudioError::NoChannels)
        ));
    }

    #[test]
    fn duration_follows_rate() {
        let clip = Clip::from_samples(vec![0.0; 22_050], 1, 44_100).expect("valid clip");
        assert_eq!(clip.duration(), Duration::from_millis(500));
    }
}
