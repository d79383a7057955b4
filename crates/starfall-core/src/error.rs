//! Error types for combat resolution.

use thiserror::Error;
use verse::{LocationId, MeterKind, ObjectId};

/// Errors raised while resolving a battle.
///
/// Anomalies during attack resolution are recoverable: the scheduler logs
/// them and skips the offending sub-step rather than aborting the battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    /// An id resolved to no combatant in the battle.
    #[error("no combatant with id {0}")]
    MissingEntity(ObjectId),

    /// A combatant lacked a gauge the resolution step required.
    #[error("combatant {0} has no {1} meter")]
    MissingGauge(ObjectId, MeterKind),

    /// A battle was requested at a location that does not exist.
    #[error("no such location: {0}")]
    InvalidLocation(LocationId),

    /// An attack was attempted between kinds that cannot engage.
    #[error("combatant {attacker} cannot attack combatant {target}")]
    IllegalPairing {
        /// The attacking combatant.
        attacker: ObjectId,
        /// The intended target.
        target: ObjectId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = CombatError::MissingGauge(ObjectId::new(7), MeterKind::Structure);
        assert_eq!(err.to_string(), "combatant 7 has no structure meter");

        let err = CombatError::IllegalPairing {
            attacker: ObjectId::new(1),
            target: ObjectId::new(2),
        };
        assert_eq!(err.to_string(), "combatant 1 cannot attack combatant 2");
    }
}
