//! The append-only battle event log.
//!
//! Every observable thing a battle does is recorded as a [`BattleEvent`].
//! The log is ordered, serializable, and fully deterministic under fixed
//! seeding: two runs of the same battle produce byte-identical JSON.

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantKind;
use verse::{EmpireId, ObjectId, Visibility};

/// One weapon discharge and its resolved effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponFire {
    /// The attacking combatant.
    pub attacker: ObjectId,
    /// The combatant hit.
    pub target: ObjectId,
    /// Weapon part name (or the station's synthetic weapon).
    pub weapon: String,
    /// Power of the shot before absorption.
    pub power: f32,
    /// Power absorbed by the target's shield.
    pub shield_absorbed: f32,
    /// Damage actually applied to the target's gauges.
    pub damage: f32,
}

/// Objects hidden from one empire at the start of the battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StealthReport {
    /// The observing empire.
    pub empire: EmpireId,
    /// Combatants this empire cannot see at all, in id order.
    pub hidden: Vec<ObjectId>,
}

/// One entry in the battle event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A bout began.
    BoutBegin {
        /// Bout number, starting at 1.
        bout: u32,
    },
    /// The initial visibility snapshot, taken before the first bout.
    InitialStealth {
        /// Per-empire lists of hidden combatants.
        reports: Vec<StealthReport>,
    },
    /// One attacker's full set of shots within a bout.
    Volley {
        /// Bout number.
        bout: u32,
        /// The attacking combatant.
        attacker: ObjectId,
        /// The attacker's owner.
        owner: EmpireId,
        /// Individual weapon discharges, in firing order.
        shots: Vec<WeaponFire>,
    },
    /// Fighters launched from (positive count) or recovered by (negative
    /// count) a carrier.
    FightersLaunched {
        /// Bout number.
        bout: u32,
        /// The carrier craft.
        carrier: ObjectId,
        /// The carrier's owner.
        owner: EmpireId,
        /// Fighters launched; negative when fighters return to the carrier.
        count: i32,
    },
    /// A previously hidden attacker became visible to an empire it fired on.
    StealthRevealed {
        /// Bout number.
        bout: u32,
        /// The revealed attacker.
        object: ObjectId,
        /// The empire that can now see it.
        empire: EmpireId,
        /// The visibility level after the reveal.
        level: Visibility,
    },
    /// A combatant was destroyed at the end of a bout.
    Destroyed {
        /// Bout number.
        bout: u32,
        /// The destroyed combatant.
        object: ObjectId,
        /// Its kind.
        kind: CombatantKind,
    },
    /// A station lost all defensive gauges after taking damage and no
    /// longer participates.
    Incapacitated {
        /// Bout number.
        bout: u32,
        /// The incapacitated station.
        object: ObjectId,
    },
}

impl BattleEvent {
    /// Returns the bout this event belongs to, if it is bout-scoped.
    #[must_use]
    pub const fn bout(&self) -> Option<u32> {
        match self {
            Self::InitialStealth { .. } => None,
            Self::BoutBegin { bout }
            | Self::Volley { bout, .. }
            | Self::FightersLaunched { bout, .. }
            | Self::StealthRevealed { bout, .. }
            | Self::Destroyed { bout, .. }
            | Self::Incapacitated { bout, .. } => Some(*bout),
        }
    }
}
