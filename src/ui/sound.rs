/// Sound: beeper-style square-wave effects and a background tune via rodio.
///
/// The audio layer only reacts to `GameEvent`s and runs its own music
/// clock; it never touches the simulation. What to play is decided by the
/// pure helpers at the top of this file (`cue`, `synth`,
/// `MusicSequencer`), which are compiled and tested with or without the
/// `sound` feature. Without it the stub `SoundEngine` does nothing.

use crate::sim::event::GameEvent;

pub const SAMPLE_RATE: u32 = 22050;
const MASTER_GAIN: f32 = 0.15;
const ATTACK: f32 = 0.01;
const A4: f32 = 440.0;

/// One square-wave beep. `delay` is relative to the start of its cue.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tone {
    pub freq: f32,
    pub secs: f32,
    pub volume: f32,
    pub delay: f32,
}

impl Tone {
    const fn new(freq: f32, secs: f32, volume: f32) -> Self {
        Tone { freq, secs, volume, delay: 0.0 }
    }
}

pub fn semitone(semi: i32) -> f32 {
    A4 * 2f32.powf(semi as f32 / 12.0)
}

/// The beeps played for an event.
pub fn cue(event: GameEvent) -> Vec<Tone> {
    match event {
        GameEvent::Jump => vec![Tone::new(700.0, 0.08, 0.12)],
        GameEvent::Pickup => vec![Tone::new(1200.0, 0.06, 0.15), Tone::new(1600.0, 0.05, 0.12)],
        GameEvent::Hurt => vec![Tone::new(180.0, 0.25, 0.15)],
        GameEvent::Win => [0, 4, 7, 12]
            .iter()
            .enumerate()
            .map(|(i, &semi)| Tone { delay: i as f32 * 0.09, ..Tone::new(semitone(semi), 0.08, 0.13) })
            .collect(),
    }
}

/// Mix tones into one mono buffer. Each tone ramps up over 10 ms then
/// decays exponentially to silence at its end.
pub fn synth(tones: &[Tone]) -> Vec<f32> {
    let sr = SAMPLE_RATE as f32;
    let len = tones
        .iter()
        .map(|t| ((t.delay + t.secs) * sr).ceil() as usize)
        .max()
        .unwrap_or(0);
    let mut out = vec![0.0f32; len];

    for tone in tones {
        let start = (tone.delay * sr) as usize;
        let n = (tone.secs * sr) as usize;
        let half_period = sr / tone.freq / 2.0;
        for i in 0..n {
            let t = i as f32 / sr;
            let env = if t < ATTACK {
                t / ATTACK
            } else {
                // 1.0 at the end of the attack, 1e-4 at the end of the tone
                let k = (t - ATTACK) / (tone.secs - ATTACK).max(1e-3);
                1e-4f32.powf(k)
            };
            let square = if ((i as f32 / half_period) as u64) % 2 == 0 { 1.0 } else { -1.0 };
            if let Some(s) = out.get_mut(start + i) {
                *s += square * env * tone.volume * MASTER_GAIN;
            }
        }
    }
    out
}

// ════════════════════════════════════════════════════════════
//  Background tune
// ════════════════════════════════════════════════════════════

const BPM: f32 = 130.0;
const MUSIC_VOLUME: f32 = 0.09;
/// `(semitones over A4, beats)`
const MELODY: [(i32, f32); 16] = [
    (0, 1.0), (4, 1.0), (7, 1.0), (12, 1.0),
    (9, 1.0), (7, 1.0), (4, 1.0), (0, 1.0),
    (2, 1.0), (5, 1.0), (9, 1.0), (14, 1.0),
    (12, 1.0), (9, 1.0), (5, 1.0), (2, 1.0),
];

/// Steps through the melody on its own clock. `advance` returns the note
/// to start, if one is due; notes last 90% of their slot.
#[derive(Clone, Debug, Default)]
pub struct MusicSequencer {
    index: usize,
    timer: f32,
}

impl MusicSequencer {
    pub fn new() -> Self {
        MusicSequencer::default()
    }

    pub fn advance(&mut self, dt: f32) -> Option<Tone> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        let (semi, beats) = MELODY[self.index];
        let slot = beats * 60.0 / BPM;
        self.timer = slot;
        self.index = (self.index + 1) % MELODY.len();
        Some(Tone::new(semitone(semi), slot * 0.9, MUSIC_VOLUME))
    }
}

#[cfg(feature = "sound")]
mod inner {
    use log::warn;
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{cue, synth, MusicSequencer, Tone, SAMPLE_RATE};
    use crate::sim::event::GameEvent;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        music: MusicSequencer,
    }

    impl SoundEngine {
        /// `None` when no output device can be opened.
        pub fn new() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(SoundEngine { _stream: stream, handle, music: MusicSequencer::new() }),
                Err(e) => {
                    warn!("audio output unavailable: {e}");
                    None
                }
            }
        }

        pub fn react(&self, events: &[GameEvent]) {
            for &event in events {
                self.play(&cue(event));
            }
        }

        pub fn tick_music(&mut self, dt: f32) {
            if let Some(note) = self.music.advance(dt) {
                self.play(&[note]);
            }
        }

        fn play(&self, tones: &[Tone]) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, synth(tones)));
                sink.detach();
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API : compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn react(&self, _events: &[GameEvent]) {}
    pub fn tick_music(&mut self, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_is_a_rising_arpeggio() {
        let tones = cue(GameEvent::Win);
        assert_eq!(tones.len(), 4);
        assert_eq!(tones[0].freq, 440.0);
        assert!((tones[3].freq - 880.0).abs() < 1e-3);
        assert!((tones[3].delay - 0.27).abs() < 1e-6);
        assert!(tones.windows(2).all(|w| w[1].freq > w[0].freq));
    }

    #[test]
    fn synth_length_and_range() {
        let buf = synth(&cue(GameEvent::Hurt));
        assert_eq!(buf.len(), (0.25 * SAMPLE_RATE as f32).ceil() as usize);
        assert!(buf.iter().all(|s| s.abs() <= 0.15 * MASTER_GAIN + 1e-6));
        assert!(buf.iter().any(|s| s.abs() > 0.01));
        assert!(synth(&[]).is_empty());
    }

    #[test]
    fn sequencer_plays_first_note_at_once_then_per_beat() {
        let mut m = MusicSequencer::new();
        let first = m.advance(0.0).unwrap();
        assert_eq!(first.freq, 440.0);
        assert!((first.secs - 0.9 * 60.0 / 130.0).abs() < 1e-6);

        // Half a beat later: nothing. A full beat: next note (E).
        assert!(m.advance(0.2).is_none());
        let second = m.advance(0.3).unwrap();
        assert!((second.freq - semitone(4)).abs() < 1e-3);
    }

    #[test]
    fn sequencer_loops() {
        let mut m = MusicSequencer::new();
        let beat = 60.0 / 130.0;
        let notes: Vec<f32> = (0..17).filter_map(|_| m.advance(beat)).map(|t| t.freq).collect();
        assert_eq!(notes.len(), 17);
        assert_eq!(notes[16], notes[0]);
    }
}
