use party_engine::Trigger;

/// What a renderer reports after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Pending,
    Done,
}

impl Completion {
    pub fn is_done(self) -> bool {
        self == Completion::Done
    }
}

/// Guards a renderer's completion so it is reported at most once per mount.
/// A fresh mount builds a fresh guard.
#[derive(Debug, Clone, Default)]
pub struct Finish {
    latch: Trigger,
}

impl Finish {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Done` the first time this is called, `Pending` afterwards.
    pub fn report(&mut self) -> Completion {
        if self.latch.fire() {
            Completion::Done
        } else {
            Completion::Pending
        }
    }

    pub fn is_reported(&self) -> bool {
        self.latch.has_fired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once() {
        let mut finish = Finish::new();
        assert!(!finish.is_reported());
        assert_eq!(finish.report(), Completion::Done);
        assert_eq!(finish.report(), Completion::Pending);
        assert!(finish.is_reported());
    }
}
