//! Game configuration consumed by combat resolution.

use serde::{Deserialize, Serialize};

/// How the combat engine seeds its random number generator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seeding {
    /// Seed derived from battle identity and turn, reseeded once per bout.
    /// Replays of the same battle are identical across runs and platforms.
    Fixed,
    /// Seed drawn from entropy each bout. Outcomes vary run to run.
    Entropy,
}

/// Game rules relevant to combat resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Number of bouts per battle.
    pub rounds: u32,
    /// Random seeding mode.
    pub seeding: Seeding,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            rounds: 4,
            seeding: Seeding::Fixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules() {
        let rules = GameRules::default();
        assert_eq!(rules.rounds, 4);
        assert_eq!(rules.seeding, Seeding::Fixed);
    }
}
