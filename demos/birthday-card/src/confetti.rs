use std::time::Duration;

use glam::Vec2;
use party_engine::{Rng, Scheduler};
use serde::Serialize;

const PIECE_COUNT: usize = 150;
/// Spawn box around the viewport centre (full width, full height).
const SPREAD: Vec2 = Vec2::new(200.0, 100.0);
const CLEAR_AFTER: Duration = Duration::from_millis(4000);
/// Velocities are in CSS pixels per 60 Hz frame.
const FRAME: f32 = 1.0 / 60.0;
const GRAVITY: f32 = 0.5;

pub const COLORS: [&str; 12] = [
    "bg-purple-400", "bg-pink-400", "bg-violet-400", "bg-fuchsia-400",
    "bg-rose-400", "bg-indigo-400", "bg-cyan-400", "bg-emerald-400",
    "bg-yellow-400", "bg-orange-400", "bg-red-400", "bg-blue-400",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Heart,
    Star,
}

const SHAPES: [Shape; 5] = [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Heart, Shape::Star];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfettiPiece {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: &'static str,
    pub size: f32,
    /// Degrees.
    pub rotation: f32,
    pub shape: Shape,
}

/// One burst of confetti centred on the viewport. `viewport` is in CSS pixels.
pub fn generate_confetti(rng: &mut Rng, viewport: Vec2) -> Vec<ConfettiPiece> {
    let centre = viewport * 0.5;
    (0..PIECE_COUNT as u32)
        .map(|id| {
            let offset = Vec2::new(rng.next_f32() - 0.5, rng.next_f32() - 0.5) * SPREAD;
            ConfettiPiece {
                id,
                position: centre + offset,
                color: rng.pick(&COLORS).copied().unwrap_or(COLORS[0]),
                size: rng.range(6.0, 18.0),
                rotation: rng.range(0.0, 360.0),
                velocity: Vec2::new((rng.next_f32() - 0.5) * 8.0, -rng.range(5.0, 20.0)),
                shape: SHAPES[rng.next_int(SHAPES.len() as u32) as usize],
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BurstTimer {
    Clear,
}

/// A live burst. Pieces fly ballistically until the burst clears itself.
pub struct ConfettiBurst {
    pieces: Vec<ConfettiPiece>,
    timers: Scheduler<BurstTimer>,
}

impl ConfettiBurst {
    pub fn new(rng: &mut Rng, viewport: Vec2) -> Self {
        let mut timers = Scheduler::new();
        timers.after(CLEAR_AFTER, BurstTimer::Clear);
        Self { pieces: generate_confetti(rng, viewport), timers }
    }

    pub fn tick(&mut self, dt: Duration) {
        let frames = dt.as_secs_f32() / FRAME;
        for piece in &mut self.pieces {
            piece.position += piece.velocity * frames;
            piece.velocity.y += GRAVITY * frames;
        }
        for timer in self.timers.advance(dt) {
            match timer {
                BurstTimer::Clear => self.pieces.clear(),
            }
        }
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn is_cleared(&self) -> bool {
        self.pieces.is_empty()
    }
}
