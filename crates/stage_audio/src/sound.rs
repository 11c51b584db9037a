use std::path::Path;
use std::sync::Arc;

use crate::clip::Clip;
use crate::error::AudioError;
use crate::mixer::{Mixer, SharedVolume, SoundKey};

/// A loaded clip plus the volume it plays at.
///
/// `volume` is a plain field; voices only see a new value after
/// [`Sound::update`]. Dropping or deleting a sound leaves voices that are
/// already playing to finish on their own.
pub struct Sound {
    pub volume: f32,
    clip: Arc<Clip>,
    engine_volume: SharedVolume,
    key: SoundKey,
    mixer: Mixer,
}

impl Sound {
    pub fn load(mixer: &Mixer, path: impl AsRef<Path>, volume: f32) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let clip = Clip::load(path)?;
        log::debug!(
            "Loaded sound {} ({} ch, {} Hz, {:.2}s)",
            path.display(),
            clip.channels(),
            clip.sample_rate(),
            clip.duration().as_secs_f32()
        );
        Ok(Self::from_clip(mixer, clip, volume))
    }

    pub fn from_clip(mixer: &Mixer, clip: Clip, volume: f32) -> Self {
        let volume = clamp_volume(volume);
        Self {
            volume,
            clip: Arc::new(clip),
            engine_volume: SharedVolume::new(volume),
            key: mixer.register(),
            mixer: mixer.clone(),
        }
    }

    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    /// Volume the mixer currently applies to this sound's voices.
    pub fn engine_volume(&self) -> f32 {
        self.engine_volume.get()
    }

    /// Pushes the cached `volume` to the mixer, clamped to 0..=1.
    pub fn update(&mut self) {
        self.volume = clamp_volume(self.volume);
        self.engine_volume.set(self.volume);
    }

    /// Plays the clip `times` times back to back. 1 plays once, 0 does nothing.
    pub fn play(&self, times: u32) {
        self.mixer
            .start(self.key, &self.clip, &self.engine_volume, Some(times));
    }

    pub fn play_forever(&self) {
        self.mixer.start(self.key, &self.clip, &self.engine_volume, None);
    }

    /// Silences every voice started by this sound.
    pub fn stop(&self) {
        self.mixer.stop(self.key);
    }

    pub fn delete(self) {
        log::debug!("Deleted sound {:?}", self.key);
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::OUTPUT_SAMPLE_RATE;

    fn beep(mixer: &Mixer, frames: usize, volume: f32) -> Sound {
        let clip = Clip::from_samples(vec![0.5; frames], 1, OUTPUT_SAMPLE_RATE).expect("valid clip");
        Sound::from_clip(mixer, clip, volume)
    }

    #[test]
    fn construction_pushes_clamped_volume() {
        let mixer = Mixer::new(OUTPUT_SAMPLE_RATE);
        let sound = beep(&mixer, 10, 3.0);
        assert_eq!(sound.volume, 1.0);
        assert_eq!(sound.engine_volume(), 1.0);
    }

    #[test]
    fn volume_reaches_mixer_only_after_update() {
        let mixer = Mixer::new(OUTPUT_SAMPLE_RATE);
        let mut sound = beep(&mixer, 100, 1.0);
        sound.play(1);

        sound.volume = 0.5;
        let mut out = vec![0.0; 4];
        mixer.render(&mut out);
        assert_eq!(out[0], 0.5);
        assert_eq!(sound.engine_volume(), 1.0);

        sound.update();
        mixer.render(&mut out);
        assert_eq!(out[0], 0.25);
        assert_eq!(sound.engine_volume(), 0.5);
    }

    #[test]
    fn play_twice_outputs_two_clip_lengths() {
        let mixer = Mixer::new(OUTPUT_SAMPLE_RATE);
        let sound = beep(&mixer, 64, 1.0);
        sound.play(2);

        let mut out = vec![0.0; 256 * 2];
        mixer.render(&mut out);
        let audible = out.chunks_exact(2).filter(|f| f[0] != 0.0).count();
        assert_eq!(audible, 128);
    }

    #[test]
    fn stop_only_affects_own_voices() {
        let mixer = Mixer::new(OUTPUT_SAMPLE_RATE);
        let a = beep(&mixer, 100, 1.0);
        let b = beep(&mixer, 100, 1.0);
        a.play_forever();
        b.play(1);
        assert_eq!(mixer.active_voices(), 2);

        a.stop();
        assert_eq!(mixer.active_voices(), 1);
    }

    #[test]
    fn delete_lets_playing_voices_finish() {
        let mixer = Mixer::new(OUTPUT_SAMPLE_RATE);
        let sound = beep(&mixer, 10, 1.0);
        sound.play(1);
        sound.delete();
        assert_eq!(mixer.active_voices(), 1);

        let mut out = vec![0.0; 20 * 2];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 0);
    }
}
