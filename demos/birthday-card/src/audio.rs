use party_engine::{SoundEvent, Tone};

use crate::stage::Stage;

/// Default note length of a melody, in seconds.
const NOTE: f32 = 0.7;

/// Tone sequences played when a stage is entered, one per stage.
/// A stage's sound event id is its ordinal.
pub struct CueBook {
    cues: [Vec<Tone>; Stage::ALL.len()],
}

impl CueBook {
    pub fn new() -> Self {
        Self { cues: Stage::ALL.map(cue) }
    }

    pub fn sound(stage: Stage) -> SoundEvent {
        SoundEvent(stage.ordinal() as u32)
    }

    pub fn cue(&self, stage: Stage) -> &[Tone] {
        &self.cues[stage.ordinal()]
    }

    /// Tones for a sound event; unknown ids play nothing.
    pub fn tones(&self, sound: SoundEvent) -> &[Tone] {
        self.cues
            .get(sound.0 as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for CueBook {
    fn default() -> Self {
        Self::new()
    }
}

fn cue(stage: Stage) -> Vec<Tone> {
    match stage {
        // welcome chimes
        Stage::Balloons => Tone::melody(&[523.0, 659.0, 784.0, 1047.0], NOTE, 0.5),
        // happy birthday opening
        Stage::Cake => Tone::melody(&[392.0, 392.0, 440.0, 392.0, 523.0, 494.0], NOTE, 0.5),
        Stage::CakeCutting => vec![
            Tone::sine(800.0, 1.0, 0.1),
            Tone::sine(1000.0, 1.0, 0.3),
            Tone::sine(1200.0, 1.0, 0.5),
        ],
        Stage::Envelope => vec![Tone::triangle(600.0, 0.4, 0.2)],
        Stage::Message => Tone::melody(&[523.0, 659.0, 784.0, 1047.0, 1319.0], NOTE, 0.2),
        Stage::Interactive => vec![Tone::sine(440.0, 0.2, 0.1), Tone::sine(554.0, 0.2, 0.2)],
        Stage::Gallery => vec![Tone::triangle(330.0, 0.3, 0.15)],
        Stage::Complete => {
            Tone::melody(&[523.0, 659.0, 784.0, 1047.0, 1319.0, 1568.0], 0.4, 0.3)
        }
    }
}
