//! Diplomatic status between empires.
//!
//! The table is symmetric: status is stored under the ordered pair of ids
//! and queried in either direction. The unowned/monster side is permanently
//! at war with every real empire and never at war with itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::EmpireId;

/// Diplomatic status between two empires.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiplomaticStatus {
    /// Hostile; combat is permitted.
    War,
    /// Neither hostile nor allied.
    Peace,
    /// Allied.
    Allied,
}

/// Symmetric table of diplomatic statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiplomacyTable {
    statuses: BTreeMap<(EmpireId, EmpireId), DiplomaticStatus>,
}

impl DiplomacyTable {
    /// Creates an empty table; all unlisted real-empire pairs are at peace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: EmpireId, b: EmpireId) -> (EmpireId, EmpireId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Sets the status between two empires (order-independent).
    pub fn set_status(&mut self, a: EmpireId, b: EmpireId, status: DiplomaticStatus) {
        self.statuses.insert(Self::key(a, b), status);
    }

    /// Returns the status between two empires.
    ///
    /// The neutral side is at war with every real empire regardless of the
    /// table's contents; an empire is at peace with itself.
    #[must_use]
    pub fn status(&self, a: EmpireId, b: EmpireId) -> DiplomaticStatus {
        if a == b {
            return DiplomaticStatus::Peace;
        }
        if a.is_neutral() || b.is_neutral() {
            return DiplomaticStatus::War;
        }
        self.statuses
            .get(&Self::key(a, b))
            .copied()
            .unwrap_or(DiplomaticStatus::Peace)
    }

    /// Returns `true` if the two empires are at war.
    #[must_use]
    pub fn at_war(&self, a: EmpireId, b: EmpireId) -> bool {
        self.status(a, b) == DiplomaticStatus::War
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_peace() {
        let table = DiplomacyTable::new();
        assert_eq!(
            table.status(EmpireId::new(1), EmpireId::new(2)),
            DiplomaticStatus::Peace
        );
    }

    #[test]
    fn status_is_symmetric() {
        let mut table = DiplomacyTable::new();
        table.set_status(EmpireId::new(2), EmpireId::new(1), DiplomaticStatus::War);
        assert!(table.at_war(EmpireId::new(1), EmpireId::new(2)));
        assert!(table.at_war(EmpireId::new(2), EmpireId::new(1)));
    }

    #[test]
    fn neutral_is_at_war_with_everyone_owned() {
        let table = DiplomacyTable::new();
        assert!(table.at_war(EmpireId::NEUTRAL, EmpireId::new(1)));
        assert!(table.at_war(EmpireId::new(1), EmpireId::NEUTRAL));
    }

    #[test]
    fn neutral_is_not_at_war_with_itself() {
        let table = DiplomacyTable::new();
        assert!(!table.at_war(EmpireId::NEUTRAL, EmpireId::NEUTRAL));
    }

    #[test]
    fn self_status_is_peace() {
        let mut table = DiplomacyTable::new();
        table.set_status(EmpireId::new(1), EmpireId::new(1), DiplomaticStatus::War);
        assert!(!table.at_war(EmpireId::new(1), EmpireId::new(1)));
    }
}
