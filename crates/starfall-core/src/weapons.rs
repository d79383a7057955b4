//! Weapon resolution: compiling a combatant into its per-bout actions.
//!
//! Each attacker yields a flat list of [`AttackAction`]s for the bout. A
//! direct weapon with `shots` greater than one yields that many separate
//! actions, each independently targeted. Fighter launches are folded into
//! a single action whose count is the lesser of total bay launch rate and
//! total stored fighters.

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, CombatantInner};
use verse::{MeterKind, TargetCondition, TargetScope};

/// Weapon name used for a station's synthetic direct-fire attack.
pub const STATION_WEAPON: &str = "defense grid";

/// One attack action within a bout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackAction {
    /// A single direct-fire shot.
    DirectFire {
        /// Weapon part name.
        weapon: String,
        /// Power of the shot.
        power: f32,
        /// Targeting preference, if any.
        targeting: Option<TargetCondition>,
    },
    /// A fighter launch of `count` fighters.
    LaunchFighters {
        /// Fighters to launch this bout.
        count: u32,
    },
}

/// Compiles the attack actions a combatant takes in one bout.
///
/// Zero-power weapons and empty or rate-less hangar setups yield nothing.
/// Stations attack through a synthetic weapon whose power is their
/// current attack gauge, preferring mobile craft.
#[must_use]
pub fn attack_actions(combatant: &Combatant) -> Vec<AttackAction> {
    let mut actions = Vec::new();
    match combatant.inner() {
        CombatantInner::Craft(state) => {
            for mount in &state.weapons {
                if mount.power <= 0.0 {
                    continue;
                }
                for _ in 0..mount.shots {
                    actions.push(AttackAction::DirectFire {
                        weapon: mount.part.clone(),
                        power: mount.power,
                        targeting: mount.targeting,
                    });
                }
            }
            let count = state.launch_rate_total().min(state.stored_fighter_total());
            if count > 0 {
                actions.push(AttackAction::LaunchFighters { count });
            }
        }
        CombatantInner::Station(state) => {
            let power = state
                .meter(MeterKind::Attack)
                .map_or(0.0, verse::Meter::current);
            if power > 0.0 {
                actions.push(AttackAction::DirectFire {
                    weapon: STATION_WEAPON.to_string(),
                    power,
                    targeting: Some(TargetCondition::new(TargetScope::CRAFT)),
                });
            }
        }
        CombatantInner::Fighter(state) => {
            if state.power > 0.0 && !state.destroyed {
                actions.push(AttackAction::DirectFire {
                    weapon: state.launched_from.clone(),
                    power: state.power,
                    targeting: state.targeting,
                });
            }
        }
    }
    actions
}
