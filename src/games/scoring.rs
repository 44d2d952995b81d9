use serde::{Deserialize, Serialize};

/// Score awarded for a correct guess with no hints used.
pub const BASE_SCORE: u32 = 100;

/// `max(100 - hints_consumed * step_penalty, floor)`, saturating instead of going negative.
pub fn score(hints_consumed: usize, step_penalty: u32, floor: u32) -> u32 {
    let hints = u32::try_from(hints_consumed).unwrap_or(u32::MAX);
    BASE_SCORE
        .saturating_sub(hints.saturating_mul(step_penalty))
        .max(floor)
}

/// Per-theme scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub step_penalty: u32,
    pub floor: u32,
}

impl ScoringPolicy {
    pub const fn new(step_penalty: u32, floor: u32) -> Self {
        Self {
            step_penalty,
            floor,
        }
    }

    pub fn score(&self, hints_consumed: usize) -> u32 {
        score(hints_consumed, self.step_penalty, self.floor)
    }
}
