use std::time::Duration;

use glam::Vec2;
use party_engine::{Rng, Scheduler, Trigger, TriggerState};
use serde::Serialize;

use crate::renderer::{Completion, Finish};

/// Flame-out animation between the click and the completion report.
const FLAME_OUT: Duration = Duration::from_millis(1000);
const SPARKLE_COUNT: usize = 8;
/// Stagger between sparkle animations, in seconds.
const SPARKLE_STAGGER: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sparkle {
    /// Percent of the cake's bounding box.
    pub at: Vec2,
    pub delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CakeTimer {
    FlameOut,
}

/// Cake with a single candle. Blowing it out is one-shot; completion follows
/// one second later.
pub struct Cake {
    candle: Trigger,
    cutting: bool,
    sparkles: Vec<Sparkle>,
    timers: Scheduler<CakeTimer>,
    finish: Finish,
}

#[derive(Debug, Serialize)]
pub struct CakeView<'a> {
    pub candle: TriggerState,
    pub cutting: bool,
    pub sparkles: &'a [Sparkle],
}

impl Cake {
    pub fn new(rng: &mut Rng, cutting: bool) -> Self {
        let sparkles = (0..SPARKLE_COUNT)
            .map(|i| Sparkle {
                at: Vec2::new(rng.range(0.0, 100.0), rng.range(0.0, 100.0)),
                delay: i as f32 * SPARKLE_STAGGER,
            })
            .collect();
        Self {
            candle: Trigger::new(),
            cutting,
            sparkles,
            timers: Scheduler::new(),
            finish: Finish::new(),
        }
    }

    /// Returns true only for the click that blew the candle out.
    pub fn blow_candle(&mut self) -> bool {
        if !self.candle.fire() {
            return false;
        }
        self.timers.after(FLAME_OUT, CakeTimer::FlameOut);
        true
    }

    pub fn set_cutting(&mut self, cutting: bool) {
        self.cutting = cutting;
    }

    pub fn is_cutting(&self) -> bool {
        self.cutting
    }

    pub fn tick(&mut self, dt: Duration) -> Completion {
        let mut completion = Completion::Pending;
        for timer in self.timers.advance(dt) {
            match timer {
                CakeTimer::FlameOut => {
                    if self.candle.settle() {
                        completion = self.finish.report();
                    }
                }
            }
        }
        completion
    }

    pub fn view(&self) -> CakeView<'_> {
        CakeView {
            candle: self.candle.state(),
            cutting: self.cutting,
            sparkles: &self.sparkles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blowing_is_one_shot_and_completes_after_flame_out() {
        let mut cake = Cake::new(&mut Rng::new(1), false);
        assert!(cake.blow_candle());
        assert!(!cake.blow_candle());
        assert_eq!(cake.tick(Duration::from_millis(999)), Completion::Pending);
        assert_eq!(cake.tick(Duration::from_millis(1)), Completion::Done);
        assert_eq!(cake.tick(Duration::from_secs(5)), Completion::Pending);
        assert!(!cake.blow_candle());
        assert_eq!(cake.view().candle, TriggerState::Settled);
    }

    #[test]
    fn never_completes_without_a_blow() {
        let mut cake = Cake::new(&mut Rng::new(1), false);
        assert_eq!(cake.tick(Duration::from_secs(60)), Completion::Pending);
        assert_eq!(cake.view().candle, TriggerState::Idle);
    }

    #[test]
    fn sparkles_are_staggered() {
        let cake = Cake::new(&mut Rng::new(3), true);
        let view = cake.view();
        assert!(view.cutting);
        assert_eq!(view.sparkles.len(), SPARKLE_COUNT);
        assert_eq!(view.sparkles[0].delay, 0.0);
        assert!((view.sparkles[7].delay - 2.1).abs() < 1e-5);
    }
}
