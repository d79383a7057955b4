//! Combatants: the battle-local view of everything that can fight.
//!
//! A [`Combatant`] is a mutable snapshot taken from the persistent universe
//! (or synthesized, for fighters) when the battle context is built. Combat
//! mutates these snapshots only; the persistent graph is untouched until
//! the battle concludes and results are written back.
//!
//! Three kinds exist:
//!
//! - **Craft**: mobile ships with resolved weapons, bays and hangars.
//! - **Stations**: installations with layered defensive gauges and an
//!   optional synthetic direct-fire attack.
//! - **Fighters**: short-lived strike craft that exist only inside the
//!   battle, carrying negative synthetic ids.

mod state;

pub use state::{BayState, CraftState, FighterState, HangarState, StationState, WeaponMount};

use serde::{Deserialize, Serialize};
use std::fmt;

use verse::{Catalog, EmpireId, Meter, MeterKind, ObjectId, WorldObject};

/// The kind of a combatant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    /// A mobile craft.
    Craft,
    /// A stationary installation.
    Station,
    /// A battle-scoped fighter.
    Fighter,
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Craft => "craft",
            Self::Station => "station",
            Self::Fighter => "fighter",
        };
        write!(f, "{name}")
    }
}

/// Kind-specific combatant state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatantInner {
    /// State of a mobile craft.
    Craft(CraftState),
    /// State of a stationary installation.
    Station(StationState),
    /// State of a battle-scoped fighter.
    Fighter(FighterState),
}

/// A participant in a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    id: ObjectId,
    inner: CombatantInner,
}

impl Combatant {
    /// Wraps kind-specific state under an id.
    #[must_use]
    pub fn new(id: ObjectId, inner: CombatantInner) -> Self {
        Self { id, inner }
    }

    /// Builds a combatant snapshot from a persistent object, resolving
    /// craft equipment through the catalog.
    #[must_use]
    pub fn from_object(id: ObjectId, object: &WorldObject, catalog: &Catalog) -> Self {
        let inner = match object {
            WorldObject::Craft(record) => {
                CombatantInner::Craft(CraftState::from_record(record, catalog))
            }
            WorldObject::Station(record) => {
                CombatantInner::Station(StationState::from_record(record))
            }
        };
        Self { id, inner }
    }

    /// Returns this combatant's id.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns the kind-specific state.
    #[must_use]
    pub const fn inner(&self) -> &CombatantInner {
        &self.inner
    }

    /// Returns this combatant's kind.
    #[must_use]
    pub const fn kind(&self) -> CombatantKind {
        match self.inner {
            CombatantInner::Craft(_) => CombatantKind::Craft,
            CombatantInner::Station(_) => CombatantKind::Station,
            CombatantInner::Fighter(_) => CombatantKind::Fighter,
        }
    }

    /// Returns the owning empire.
    #[must_use]
    pub fn owner(&self) -> EmpireId {
        match &self.inner {
            CombatantInner::Craft(c) => c.owner,
            CombatantInner::Station(s) => s.owner,
            CombatantInner::Fighter(f) => f.owner,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.inner {
            CombatantInner::Craft(c) => &c.name,
            CombatantInner::Station(s) => &s.name,
            CombatantInner::Fighter(f) => &f.name,
        }
    }

    /// Returns a meter, if this combatant carries it. Fighters carry no
    /// meters at all.
    #[must_use]
    pub fn meter(&self, kind: MeterKind) -> Option<&Meter> {
        match &self.inner {
            CombatantInner::Craft(c) => c.meter(kind),
            CombatantInner::Station(s) => s.meter(kind),
            CombatantInner::Fighter(_) => None,
        }
    }

    /// Returns a mutable meter, if this combatant carries it.
    pub fn meter_mut(&mut self, kind: MeterKind) -> Option<&mut Meter> {
        match &mut self.inner {
            CombatantInner::Craft(c) => c.meter_mut(kind),
            CombatantInner::Station(s) => s.meter_mut(kind),
            CombatantInner::Fighter(_) => None,
        }
    }

    /// Returns the current value of a meter, or zero if absent.
    #[must_use]
    pub fn current(&self, kind: MeterKind) -> f32 {
        self.meter(kind).map_or(0.0, Meter::current)
    }

    /// Returns the craft state, if this is a craft.
    #[must_use]
    pub const fn as_craft(&self) -> Option<&CraftState> {
        match &self.inner {
            CombatantInner::Craft(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the mutable craft state, if this is a craft.
    pub fn as_craft_mut(&mut self) -> Option<&mut CraftState> {
        match &mut self.inner {
            CombatantInner::Craft(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the station state, if this is a station.
    #[must_use]
    pub const fn as_station(&self) -> Option<&StationState> {
        match &self.inner {
            CombatantInner::Station(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the fighter state, if this is a fighter.
    #[must_use]
    pub const fn as_fighter(&self) -> Option<&FighterState> {
        match &self.inner {
            CombatantInner::Fighter(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the mutable fighter state, if this is a fighter.
    pub fn as_fighter_mut(&mut self) -> Option<&mut FighterState> {
        match &mut self.inner {
            CombatantInner::Fighter(f) => Some(f),
            _ => None,
        }
    }
}
