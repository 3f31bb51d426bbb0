use serde::Serialize;

/// Top-level phase of the card. Strictly ordered; only `restart` goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Balloons,
    Cake,
    CakeCutting,
    Envelope,
    Message,
    Interactive,
    Gallery,
    Complete,
}

/// Stages shown as dots in the progress indicator. `CakeCutting` has no dot
/// of its own.
pub const INDICATOR: [Stage; 7] = [
    Stage::Balloons,
    Stage::Cake,
    Stage::Envelope,
    Stage::Message,
    Stage::Interactive,
    Stage::Gallery,
    Stage::Complete,
];

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Balloons,
        Stage::Cake,
        Stage::CakeCutting,
        Stage::Envelope,
        Stage::Message,
        Stage::Interactive,
        Stage::Gallery,
        Stage::Complete,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Balloons => "balloons",
            Stage::Cake => "cake",
            Stage::CakeCutting => "cake-cutting",
            Stage::Envelope => "envelope",
            Stage::Message => "message",
            Stage::Interactive => "interactive",
            Stage::Gallery => "gallery",
            Stage::Complete => "complete",
        }
    }

    pub fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.ordinal() + 1).copied()
    }
}

/// Lit dots of the progress indicator: dot `i` is lit once the current
/// stage's ordinal reaches `i`.
pub fn progress(stage: Stage) -> [bool; INDICATOR.len()] {
    let mut dots = [false; INDICATOR.len()];
    for (i, dot) in dots.iter_mut().enumerate() {
        *dot = stage.ordinal() >= i;
    }
    dots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        for pair in Stage::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(Stage::Complete.next(), None);
    }

    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&Stage::CakeCutting).unwrap();
        assert_eq!(json, "\"cake-cutting\"");
        for stage in Stage::ALL {
            assert_eq!(serde_json::to_value(stage).unwrap(), stage.name());
        }
    }

    #[test]
    fn progress_lights_dots_by_ordinal() {
        assert_eq!(progress(Stage::Balloons), [true, false, false, false, false, false, false]);
        assert_eq!(progress(Stage::CakeCutting), [true, true, true, false, false, false, false]);
        assert_eq!(progress(Stage::Complete), [true; 7]);
    }
}
