use fundsp::prelude32::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

const SAMPLE_RATE: u32 = 44_100;

/// One-shot sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Flap,
    Hit,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Flap => "wing",
            Cue::Hit => "hit",
        }
    }
}

/// Fire-and-forget playback. Nothing is reported back to the game.
pub trait AudioPlayer {
    fn play(&mut self, cue: Cue);
}

/// Drops every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioPlayer for Silent {
    fn play(&mut self, _cue: Cue) {}
}

// ── Sounds ──────────────────────────────────────────────────────────────────

/// Short bright chirp.
fn flap_samples() -> Vec<f32> {
    let mut osc = sine_hz(660.0) + sine_hz(990.0) * 0.5;
    synth(&mut osc, 0.12, |t| 0.12 * (1.0 - t / 0.12).max(0.0))
}

/// Buzzy thud with a fast fall-off.
fn hit_samples() -> Vec<f32> {
    let mut osc = saw_hz(110.0) * 0.6 + saw_hz(73.0) * 0.4 + noise() * 0.3;
    synth(&mut osc, 0.4, |t| 0.15 * (-t * 9.0).exp())
}

fn synth<X>(osc: &mut An<X>, secs: f32, envelope: impl Fn(f32) -> f32) -> Vec<f32>
where
    X: AudioNode<Inputs = U0, Outputs = U1>,
{
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            osc.get_mono() * envelope(t)
        })
        .collect()
}

/// Plays synthesised cues on the default output device.
pub struct SynthAudio {
    // The stream must outlive every sink created from the handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    flap: Vec<f32>,
    hit: Vec<f32>,
}

impl SynthAudio {
    pub fn open() -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            flap: flap_samples(),
            hit: hit_samples(),
        })
    }
}

impl AudioPlayer for SynthAudio {
    fn play(&mut self, cue: Cue) {
        let samples = match cue {
            Cue::Flap => self.flap.clone(),
            Cue::Hit => self.hit.clone(),
        };
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                sink.detach(); // Play in background
            }
            Err(err) => log::warn!("could not play {}: {err}", cue.name()),
        }
    }
}

/// Opens the output device, falling back to silence when there is none.
pub fn open_default(mute: bool) -> Box<dyn AudioPlayer> {
    if mute {
        return Box::new(Silent);
    }
    match SynthAudio::open() {
        Ok(audio) => Box::new(audio),
        Err(err) => {
            log::warn!("audio output unavailable, continuing muted: {err}");
            Box::new(Silent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_are_short_bounded_and_audible() {
        for samples in [flap_samples(), hit_samples()] {
            assert!(!samples.is_empty());
            assert!(samples.len() <= SAMPLE_RATE as usize / 2);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
            assert!(samples.iter().any(|s| s.abs() > 1e-3));
        }
    }

    #[test]
    fn cue_names_match_the_clip_names() {
        assert_eq!(Cue::Flap.name(), "wing");
        assert_eq!(Cue::Hit.name(), "hit");
    }
}
