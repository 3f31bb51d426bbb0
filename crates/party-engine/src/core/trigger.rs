use serde::Serialize;

/// States of a one-shot interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    /// Waiting for the interaction.
    #[default]
    Idle,
    /// Interaction happened; its follow-up is still playing out.
    Triggered,
    /// Follow-up finished.
    Settled,
}

/// One-shot latch: `Idle → Triggered → Settled`.
/// Each edge can be taken exactly once until `reset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trigger {
    state: TriggerState,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// `Idle → Triggered`. Returns true only for the call that took the edge.
    pub fn fire(&mut self) -> bool {
        if self.state == TriggerState::Idle {
            self.state = TriggerState::Triggered;
            true
        } else {
            false
        }
    }

    /// `Triggered → Settled`. Returns true only for the call that took the edge.
    pub fn settle(&mut self) -> bool {
        if self.state == TriggerState::Triggered {
            self.state = TriggerState::Settled;
            true
        } else {
            false
        }
    }

    /// Fired at some point (triggered or already settled).
    pub fn has_fired(&self) -> bool {
        self.state != TriggerState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_is_one_shot() {
        let mut t = Trigger::new();
        assert!(t.fire());
        assert!(!t.fire());
        assert_eq!(t.state(), TriggerState::Triggered);
    }

    #[test]
    fn settle_requires_fire() {
        let mut t = Trigger::new();
        assert!(!t.settle());
        t.fire();
        assert!(t.settle());
        assert!(!t.settle());
        assert_eq!(t.state(), TriggerState::Settled);
        assert!(!t.fire());
    }

    #[test]
    fn has_fired_covers_both_later_states() {
        let mut t = Trigger::new();
        assert!(!t.has_fired());
        t.fire();
        assert!(t.has_fired());
        t.settle();
        assert!(t.has_fired());
    }
}
