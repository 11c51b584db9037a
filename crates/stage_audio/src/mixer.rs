//! Software mixer shared between the caller and the audio callback thread.
//!
//! Output is interleaved stereo f32. Each voice steps through its clip at
//! `clip_rate / output_rate` frames per output frame with linear
//! interpolation, so clips of any rate play at their natural pitch.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clip::Clip;

pub const OUTPUT_SAMPLE_RATE: u32 = 44_100;
pub const OUTPUT_CHANNELS: u16 = 2;

/// Volume written by the owning sound and read by its voices.
#[derive(Debug, Clone)]
pub struct SharedVolume(Arc<AtomicU32>);

impl SharedVolume {
    pub fn new(volume: f32) -> Self {
        Self(Arc::new(AtomicU32::new(volume.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, volume: f32) {
        self.0.store(volume.to_bits(), Ordering::Relaxed);
    }
}

/// Identifies the sound a voice belongs to, so `stop` can find them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundKey(u64);

struct Voice {
    key: SoundKey,
    clip: Arc<Clip>,
    volume: SharedVolume,
    position: f64,
    step: f64,
    /// Plays left including the current one; `None` loops forever.
    remaining: Option<u32>,
}

impl Voice {
    /// Adds this voice into `out`. Returns false once the last play ends.
    fn mix_into(&mut self, out: &mut [f32]) -> bool {
        let frames = self.clip.frames();
        if frames == 0 {
            return false;
        }
        let gain = self.volume.get();
        let end = frames as f64;
        for frame in out.chunks_exact_mut(OUTPUT_CHANNELS as usize) {
            while self.position >= end {
                match &mut self.remaining {
                    Some(n) if *n <= 1 => return false,
                    Some(n) => *n -= 1,
                    None => {}
                }
                self.position -= end;
            }
            let index = self.position as usize;
            let frac = (self.position - index as f64) as f32;
            let (l0, r0) = self.clip.frame(index);
            let (l1, r1) = self.clip.frame((index + 1).min(frames - 1));
            frame[0] += (l0 + (l1 - l0) * frac) * gain;
            frame[1] += (r0 + (r1 - r0) * frac) * gain;
            self.position += self.step;
        }
        true
    }
}

#[derive(Default)]
pub struct MixerState {
    voices: Vec<Voice>,
    next_key: u64,
}

impl MixerState {
    /// Fills `out` (interleaved stereo) with the sum of all voices, clamped
    /// to [-1, 1]. Finished voices are dropped.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        self.voices.retain_mut(|voice| voice.mix_into(out));
        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }
}

/// Cloneable handle to the shared mixer state.
#[derive(Clone)]
pub struct Mixer {
    state: Arc<Mutex<MixerState>>,
    sample_rate: u32,
}

impl Mixer {
    /// A mixer not attached to any device. The audio device pulls from the
    /// same state through [`Mixer::shared_state`].
    pub fn new(sample_rate: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(MixerState::default())),
            sample_rate: sample_rate.max(1),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn shared_state(&self) -> Arc<Mutex<MixerState>> {
        Arc::clone(&self.state)
    }

    pub fn active_voices(&self) -> usize {
        self.lock().voices.len()
    }

    pub fn render(&self, out: &mut [f32]) {
        self.lock().render(out);
    }

    pub(crate) fn register(&self) -> SoundKey {
        let mut state = self.lock();
        state.next_key += 1;
        SoundKey(state.next_key)
    }

    /// Starts a voice. `plays` of `Some(0)` starts nothing.
    pub(crate) fn start(
        &self,
        key: SoundKey,
        clip: &Arc<Clip>,
        volume: &SharedVolume,
        plays: Option<u32>,
    ) {
        if plays == Some(0) || clip.frames() == 0 {
            return;
        }
        let voice = Voice {
            key,
            clip: Arc::clone(clip),
            volume: volume.clone(),
            position: 0.0,
            step: clip.sample_rate() as f64 / self.sample_rate as f64,
            remaining: plays,
        };
        self.lock().voices.push(voice);
    }

    pub(crate) fn stop(&self, key: SoundKey) {
        self.lock().voices.retain(|voice| voice.key != key);
    }

    fn lock(&self) -> MutexGuard<'_, MixerState> {
        lock_state(&self.state)
    }
}

/// A panic on the audio thread must not silence the caller, so poisoning is
/// ignored.
pub(crate) fn lock_state(state: &Mutex<MixerState>) -> MutexGuard<'_, MixerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
