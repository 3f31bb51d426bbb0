// core/scheduler.rs
//
// Epoch-guarded timers. Replaces ad-hoc setTimeout/setInterval control flow:
// the owner schedules actions, advances the clock each step and applies
// whatever actions come back due.
//
// Usage:
//   let mut timers = Scheduler::new();
//   timers.after(Duration::from_millis(4000), Action::ShowCake);
//   for action in timers.advance(dt) { apply(action) }
//   timers.invalidate(); // restart: everything scheduled so far is stale

use std::time::Duration;

/// Handle to a scheduled timer, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// Generation counter. Timers only fire into the epoch they were scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Once,
    Every(Duration),
}

#[derive(Debug, Clone)]
struct Timer<A> {
    id: TimerId,
    epoch: Epoch,
    due: Duration,
    cadence: Cadence,
    action: A,
}

/// A set of pending one-shot and repeating timers on a private clock.
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: Duration,
    epoch: Epoch,
    next_id: u32,
    timers: Vec<Timer<A>>,
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            epoch: Epoch::default(),
            next_id: 1,
            timers: Vec::with_capacity(8),
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Fire `action` once, `delay` from now.
    pub fn after(&mut self, delay: Duration, action: A) -> TimerId {
        self.push(delay, Cadence::Once, action)
    }

    /// Fire `action` every `period`, first time one period from now.
    pub fn every(&mut self, period: Duration, action: A) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.push(period, Cadence::Every(period), action)
    }

    fn push(&mut self, delay: Duration, cadence: Cadence, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            epoch: self.epoch,
            due: self.now + delay,
            cadence,
            action,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was unknown.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Start a new epoch. Timers scheduled before this call will never fire.
    pub fn invalidate(&mut self) -> Epoch {
        self.epoch = Epoch(self.epoch.0.wrapping_add(1));
        log::trace!("scheduler: epoch -> {}", self.epoch.0);
        self.epoch
    }

    /// Whether a timer is still waiting to fire in the current epoch.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id && t.epoch == self.epoch)
    }

    /// Number of live timers in the current epoch.
    pub fn pending(&self) -> usize {
        self.timers.iter().filter(|t| t.epoch == self.epoch).count()
    }

    /// Advance the clock and collect the actions that came due, in due order.
    /// Stale timers from earlier epochs are dropped without producing an action.
    pub fn advance(&mut self, dt: Duration) -> Vec<A> {
        self.now += dt;
        let now = self.now;
        let epoch = self.epoch;

        let mut fired: Vec<(Duration, TimerId, A)> = Vec::new();
        self.timers.retain_mut(|t| {
            if t.epoch != epoch {
                log::trace!("scheduler: dropping stale timer {} from epoch {}", t.id.0, t.epoch.0);
                return false;
            }
            match t.cadence {
                Cadence::Once => {
                    if t.due <= now {
                        fired.push((t.due, t.id, t.action.clone()));
                        false
                    } else {
                        true
                    }
                }
                Cadence::Every(period) => {
                    while t.due <= now {
                        fired.push((t.due, t.id, t.action.clone()));
                        t.due += period;
                    }
                    true
                }
            }
        });

        fired.sort_by_key(|(due, id, _)| (*due, id.0));
        fired.into_iter().map(|(_, _, action)| action).collect()
    }
}

impl<A: Clone> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn one_shot_fires_once_at_due_time() {
        let mut s = Scheduler::new();
        s.after(ms(4000), "cake");
        assert!(s.advance(ms(3999)).is_empty());
        assert_eq!(s.advance(ms(1)), vec!["cake"]);
        assert!(s.advance(ms(10_000)).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn actions_come_back_in_due_order() {
        let mut s = Scheduler::new();
        s.after(ms(300), 3);
        s.after(ms(100), 1);
        s.after(ms(200), 2);
        assert_eq!(s.advance(ms(500)), vec![1, 2, 3]);
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut s = Scheduler::new();
        let id = s.after(ms(100), ());
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.advance(ms(200)).is_empty());
    }

    #[test]
    fn invalidate_suppresses_stale_timers() {
        let mut s = Scheduler::new();
        s.after(ms(2500), "stale");
        s.advance(ms(1000));
        s.invalidate();
        s.after(ms(4000), "fresh");
        assert_eq!(s.pending(), 1);
        assert!(s.advance(ms(2000)).is_empty());
        assert_eq!(s.advance(ms(2000)), vec!["fresh"]);
    }

    #[test]
    fn repeating_timer_fires_every_period() {
        let mut s = Scheduler::new();
        s.every(ms(3000), "quote");
        assert!(s.advance(ms(2999)).is_empty());
        assert_eq!(s.advance(ms(1)), vec!["quote"]);
        assert_eq!(s.advance(ms(3000)), vec!["quote"]);
        // Overrun: one firing per elapsed period.
        assert_eq!(s.advance(ms(9000)).len(), 3);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn repeating_timer_stops_after_cancel() {
        let mut s = Scheduler::new();
        let id = s.every(ms(15_000), ());
        assert_eq!(s.advance(ms(15_000)).len(), 1);
        s.cancel(id);
        assert!(s.advance(ms(60_000)).is_empty());
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = Scheduler::new();
        s.every(Duration::ZERO, ());
        assert_eq!(s.advance(ms(5)).len(), 5);
    }
}
