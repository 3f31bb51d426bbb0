use std::time::Duration;

/// Maximum fixed steps run for a single frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
/// Turns variable frame times into a whole number of equal simulation steps,
/// so dwell timers advance identically regardless of display refresh rate.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: Duration,
    /// Accumulated time from variable frame deltas.
    accumulator: Duration,
}

impl FixedTimestep {
    pub fn new(dt: Duration) -> Self {
        Self {
            dt: dt.max(Duration::from_micros(1)),
            accumulator: Duration::ZERO,
        }
    }

    /// Convenience constructor from seconds (as reported by requestAnimationFrame).
    pub fn from_secs(dt: f32) -> Self {
        Self::new(Duration::from_secs_f32(dt.max(0.0)))
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: Duration) -> u32 {
        // A backgrounded tab can report seconds between frames; drop the excess
        // instead of running hundreds of catch-up steps.
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * MAX_STEPS_PER_FRAME);
        let steps = (self.accumulator.as_nanos() / self.dt.as_nanos()) as u32;
        self.accumulator -= self.dt * steps;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> Duration {
        self.dt
    }
}
