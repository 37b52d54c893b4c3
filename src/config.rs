use crate::error::{Error, Result};
use std::time::Duration;

/// Highest difficulty floor accepted; the bounded breadth-first check grows
/// exponentially with it.
pub const MAX_DIFFICULTY_FLOOR: u32 = 20;

/// Tunables for generation, hinting and auto-play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Random blank moves applied to the solved board when scrambling.
    pub shuffle_steps: usize,
    /// Maximum number of states handed out by one hint.
    pub hint_len: usize,
    /// Delay between two auto-played hint steps.
    pub hint_interval: Duration,
    /// Stop the hint search after expanding this many nodes.
    pub hint_node_budget: Option<usize>,
    /// Reject scrambles that can be solved in fewer moves than this.
    pub min_difficulty: Option<u32>,
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            shuffle_steps: 50,
            hint_len: 10,
            hint_interval: Duration::from_millis(600),
            hint_node_budget: None,
            min_difficulty: None,
            seed: None,
        }
    }
}

impl PuzzleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shuffle_steps == 0 {
            return Err(Error::InvalidConfig("shuffle_steps must be at least 1".into()));
        }
        if self.hint_len == 0 {
            return Err(Error::InvalidConfig("hint_len must be at least 1".into()));
        }
        if let Some(floor) = self.min_difficulty {
            if floor > MAX_DIFFICULTY_FLOOR {
                return Err(Error::InvalidConfig(format!(
                    "min_difficulty {floor} exceeds the limit of {MAX_DIFFICULTY_FLOOR}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_is_valid() {
        let config = PuzzleConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.hint_interval, Duration::from_millis(600));
    }

    #[rstest]
    #[case::no_shuffle(PuzzleConfig { shuffle_steps: 0, ..Default::default() })]
    #[case::empty_hint(PuzzleConfig { hint_len: 0, ..Default::default() })]
    #[case::floor_too_high(PuzzleConfig { min_difficulty: Some(MAX_DIFFICULTY_FLOOR + 1), ..Default::default() })]
    fn rejects_out_of_bounds_values(#[case] config: PuzzleConfig) {
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
