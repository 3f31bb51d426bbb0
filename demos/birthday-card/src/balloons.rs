use std::time::Duration;

use glam::Vec2;
use party_engine::{EntityId, Member, Rng, Scheduler, Swarm};
use serde::Serialize;

const GRID_COLUMNS: u32 = 12;
const GRID_ROWS: u32 = 6;
const SKIP_CHANCE: f32 = 0.3;
const EXTRA_BALLOONS: u32 = 12;
/// Offscreen margin for balloons drifting in from the side, in CSS pixels.
const SIDE_MARGIN: f32 = 120.0;
const REGENERATE_EVERY: Duration = Duration::from_millis(15000);
/// How long a popped balloon stays for its burst animation.
pub const POP_LINGER: Duration = Duration::from_millis(800);

pub const COLORS: [&str; 14] = [
    "bg-gradient-to-b from-purple-300 to-purple-500",
    "bg-gradient-to-b from-pink-300 to-pink-500",
    "bg-gradient-to-b from-violet-300 to-violet-500",
    "bg-gradient-to-b from-fuchsia-300 to-fuchsia-500",
    "bg-gradient-to-b from-rose-300 to-rose-500",
    "bg-gradient-to-b from-indigo-300 to-indigo-500",
    "bg-gradient-to-b from-lavender-300 to-lavender-500",
    "bg-gradient-to-b from-purple-400 to-purple-600",
    "bg-gradient-to-b from-pink-400 to-pink-600",
    "bg-gradient-to-b from-violet-400 to-violet-600",
    "bg-gradient-to-b from-cyan-300 to-cyan-500",
    "bg-gradient-to-b from-emerald-300 to-emerald-500",
    "bg-gradient-to-b from-yellow-300 to-yellow-500",
    "bg-gradient-to-b from-orange-300 to-orange-500",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entry {
    Bottom,
    Left,
    Right,
}

/// Bottom entries are three times as likely as either side.
const ENTRIES: [Entry; 5] = [Entry::Bottom, Entry::Bottom, Entry::Bottom, Entry::Left, Entry::Right];

/// One floating balloon. Motion is a CSS animation driven by these parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balloon {
    /// Percent of the viewport width for bottom entries, CSS pixels for side entries.
    pub left: f32,
    /// CSS pixels from the bottom edge; negative starts below the viewport.
    pub start_bottom: f32,
    /// Seconds.
    pub delay: f32,
    pub color: &'static str,
    pub size: f32,
    /// Seconds for one rise.
    pub duration: f32,
    pub sway_direction: f32,
    pub sway_intensity: f32,
    pub z_index: u32,
    pub opacity: f32,
    pub rotation_speed: f32,
    pub entry: Entry,
    /// Click point relative to the balloon, set when popped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pop_at: Option<Vec2>,
}

fn color(rng: &mut Rng) -> &'static str {
    rng.pick(&COLORS).copied().unwrap_or(COLORS[0])
}

/// Scatter a fresh batch of balloons: a jittered grid with random gaps plus a
/// few free-floating extras. `viewport` is in CSS pixels.
pub fn generate_balloons(rng: &mut Rng, viewport: Vec2) -> Vec<Balloon> {
    let mut balloons = Vec::with_capacity((GRID_COLUMNS * GRID_ROWS + EXTRA_BALLOONS) as usize);
    let cell = 100.0 / GRID_COLUMNS as f32;

    for col in 0..GRID_COLUMNS {
        for row in 0..GRID_ROWS {
            if rng.chance(SKIP_CHANCE) {
                continue;
            }

            let base = col as f32 * cell;
            let jitter = (rng.next_f32() - 0.5) * cell * 0.7;
            let entry = ENTRIES[rng.next_int(ENTRIES.len() as u32) as usize];

            let (left, start_bottom) = match entry {
                Entry::Bottom => ((base + jitter).clamp(1.0, 99.0), -150.0 - rng.range(0.0, 300.0)),
                Entry::Left => (-SIDE_MARGIN, rng.range(0.0, viewport.y * 0.4)),
                Entry::Right => (viewport.x + SIDE_MARGIN, rng.range(0.0, viewport.y * 0.4)),
            };

            balloons.push(Balloon {
                left,
                start_bottom,
                delay: row as f32 * 1.5 + rng.range(0.0, 4.0),
                color: color(rng),
                size: rng.range(30.0, 75.0),
                duration: rng.range(18.0, 30.0),
                sway_direction: rng.sign(),
                sway_intensity: rng.range(15.0, 40.0),
                z_index: rng.next_int(30),
                opacity: rng.range(0.7, 1.0),
                rotation_speed: rng.range(0.3, 1.5),
                entry,
                pop_at: None,
            });
        }
    }

    for _ in 0..EXTRA_BALLOONS {
        balloons.push(Balloon {
            left: rng.range(0.0, 100.0),
            start_bottom: -100.0 - rng.range(0.0, 400.0),
            delay: rng.range(0.0, 20.0),
            color: color(rng),
            size: rng.range(25.0, 80.0),
            duration: rng.range(20.0, 35.0),
            sway_direction: rng.sign(),
            sway_intensity: rng.range(10.0, 40.0),
            z_index: rng.next_int(25),
            opacity: rng.range(0.6, 1.0),
            rotation_speed: rng.range(0.2, 2.0),
            entry: Entry::Bottom,
            pop_at: None,
        });
    }

    balloons
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldTimer {
    Regenerate,
}

/// Background balloons: regenerated on an interval, popped by clicks.
pub struct BalloonField {
    swarm: Swarm<Balloon>,
    viewport: Vec2,
    timers: Scheduler<FieldTimer>,
}

impl BalloonField {
    /// `first_id` continues the id sequence of the previous field, so a pop
    /// aimed at a dropped field never lands on a balloon in this one.
    pub fn new(rng: &mut Rng, viewport: Vec2, first_id: EntityId) -> Self {
        let mut swarm = Swarm::starting_at(first_id);
        swarm.replace_all(generate_balloons(rng, viewport));
        let mut timers = Scheduler::new();
        timers.every(REGENERATE_EVERY, FieldTimer::Regenerate);
        Self { swarm, viewport, timers }
    }

    /// Takes effect at the next regeneration; balloons in flight keep theirs.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Id the next generated balloon will get.
    pub fn next_id(&self) -> EntityId {
        self.swarm.next_id()
    }

    /// Pop a floating balloon. Returns false for unknown or already popped ids.
    pub fn pop(&mut self, id: EntityId, at: Vec2) -> bool {
        match self.swarm.pop(id, POP_LINGER) {
            Some(balloon) => {
                balloon.pop_at = Some(at);
                true
            }
            None => {
                log::debug!("pop ignored for balloon {}", id.0);
                false
            }
        }
    }

    pub fn tick(&mut self, dt: Duration, rng: &mut Rng) {
        self.swarm.tick(dt);
        for timer in self.timers.advance(dt) {
            match timer {
                FieldTimer::Regenerate => {
                    self.swarm.replace_all(generate_balloons(rng, self.viewport));
                }
            }
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Member<Balloon>> {
        self.swarm.get(id)
    }

    pub fn len(&self) -> usize {
        self.swarm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swarm.is_empty()
    }

    pub fn floating_count(&self) -> usize {
        self.swarm.floating_count()
    }

    pub fn balloons(&self) -> impl Iterator<Item = &Member<Balloon>> {
        self.swarm.iter()
    }
}
