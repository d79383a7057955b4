//! Kind-specific combatant state.
//!
//! Craft equipment is resolved once, at snapshot time: the design's part
//! list is walked through the catalog and folded into flat vectors of
//! weapon mounts, bays and hangars. Resolution never touches the catalog
//! again after that.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use verse::{
    Catalog, CraftRecord, EmpireId, Meter, MeterKind, ObjectId, PartClass, StationRecord,
    TargetCondition,
};

/// A resolved direct-fire weapon on a craft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponMount {
    /// Part name, carried into fire records.
    pub part: String,
    /// Power per shot.
    pub power: f32,
    /// Shots per bout.
    pub shots: u32,
    /// Targeting preference, if the part carries one.
    pub targeting: Option<TargetCondition>,
}

/// A resolved fighter bay on a craft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayState {
    /// Part name.
    pub part: String,
    /// Fighters launched per bout through this bay.
    pub launch_rate: u32,
}

/// A resolved fighter hangar on a craft, including its live stored count.
///
/// Duplicate hangar parts in a design are folded into one entry with the
/// combined capacity, since stored fighters are tracked per part name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HangarState {
    /// Part name.
    pub part: String,
    /// Fighters currently stored.
    pub stored: u32,
    /// Maximum fighters stored.
    pub capacity: u32,
    /// Per-shot power of fighters launched from this hangar.
    pub fighter_power: f32,
    /// Targeting preference inherited by launched fighters.
    pub targeting: Option<TargetCondition>,
}

/// Battle-local state of a mobile craft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftState {
    /// Display name.
    pub name: String,
    /// Owning empire.
    pub owner: EmpireId,
    /// Crew species, inherited by launched fighters.
    pub species: Option<String>,
    /// Whether the craft's group is postured aggressively.
    pub aggressive: bool,
    meters: BTreeMap<MeterKind, Meter>,
    /// Resolved direct-fire weapons, in hull order.
    pub weapons: Vec<WeaponMount>,
    /// Resolved fighter bays, in hull order.
    pub bays: Vec<BayState>,
    /// Resolved fighter hangars, folded by part name.
    pub hangars: Vec<HangarState>,
}

impl CraftState {
    /// Snapshots a craft record, resolving its design through the catalog.
    #[must_use]
    pub fn from_record(record: &CraftRecord, catalog: &Catalog) -> Self {
        let mut weapons = Vec::new();
        let mut bays = Vec::new();
        let mut hangars: BTreeMap<String, HangarState> = BTreeMap::new();

        for part in catalog.design_parts(record.design) {
            match part.class {
                PartClass::DirectWeapon { power, shots } => weapons.push(WeaponMount {
                    part: part.name.clone(),
                    power,
                    shots,
                    targeting: part.targeting,
                }),
                PartClass::FighterBay { launch_rate } => bays.push(BayState {
                    part: part.name.clone(),
                    launch_rate,
                }),
                PartClass::FighterHangar {
                    capacity,
                    fighter_power,
                } => {
                    hangars
                        .entry(part.name.clone())
                        .and_modify(|h| h.capacity += capacity)
                        .or_insert(HangarState {
                            part: part.name.clone(),
                            stored: record.stored_fighters(&part.name),
                            capacity,
                            fighter_power,
                            targeting: part.targeting,
                        });
                }
            }
        }

        let hangars: Vec<HangarState> = hangars
            .into_values()
            .map(|mut h| {
                h.stored = h.stored.min(h.capacity);
                h
            })
            .collect();

        Self {
            name: record.name.clone(),
            owner: record.owner,
            species: record.species.clone(),
            aggressive: record.aggressive,
            meters: record.meters().map(|(k, m)| (k, *m)).collect(),
            weapons,
            bays,
            hangars,
        }
    }

    /// Returns a meter, if the craft carries it.
    #[must_use]
    pub fn meter(&self, kind: MeterKind) -> Option<&Meter> {
        self.meters.get(&kind)
    }

    /// Returns a mutable meter, if the craft carries it.
    pub fn meter_mut(&mut self, kind: MeterKind) -> Option<&mut Meter> {
        self.meters.get_mut(&kind)
    }

    /// Iterates over all meters carried by this craft.
    pub fn meters(&self) -> impl Iterator<Item = (MeterKind, &Meter)> {
        self.meters.iter().map(|(kind, meter)| (*kind, meter))
    }

    /// Returns `true` if any weapon mount can do damage.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.weapons.iter().any(|w| w.power > 0.0 && w.shots > 0)
    }

    /// Returns the total fighters stored across all hangars.
    #[must_use]
    pub fn stored_fighter_total(&self) -> u32 {
        self.hangars.iter().map(|h| h.stored).sum()
    }

    /// Returns the total launch rate across all bays.
    #[must_use]
    pub fn launch_rate_total(&self) -> u32 {
        self.bays.iter().map(|b| b.launch_rate).sum()
    }

    /// Returns `true` if any hangar holds fighters that could do damage.
    #[must_use]
    pub fn has_armed_fighters(&self) -> bool {
        self.hangars
            .iter()
            .any(|h| h.stored > 0 && h.fighter_power > 0.0)
    }
}

/// Battle-local state of a stationary installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationState {
    /// Display name.
    pub name: String,
    /// Owning empire.
    pub owner: EmpireId,
    meters: BTreeMap<MeterKind, Meter>,
}

impl StationState {
    /// Snapshots a station record.
    #[must_use]
    pub fn from_record(record: &StationRecord) -> Self {
        Self {
            name: record.name.clone(),
            owner: record.owner,
            meters: record.meters().map(|(k, m)| (k, *m)).collect(),
        }
    }

    /// Returns a meter, if the station carries it.
    #[must_use]
    pub fn meter(&self, kind: MeterKind) -> Option<&Meter> {
        self.meters.get(&kind)
    }

    /// Returns a mutable meter, if the station carries it.
    pub fn meter_mut(&mut self, kind: MeterKind) -> Option<&mut Meter> {
        self.meters.get_mut(&kind)
    }

    /// Iterates over all meters carried by this station.
    pub fn meters(&self) -> impl Iterator<Item = (MeterKind, &Meter)> {
        self.meters.iter().map(|(kind, meter)| (*kind, meter))
    }
}

/// A battle-scoped fighter.
///
/// Fighters have no meters: any positive damage destroys one. The
/// `destroyed` flag is set at the moment of the hit and acted on when the
/// working sets are updated, so a fighter killed mid-bout still got its
/// own shot off if its turn came earlier in the shuffled order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterState {
    /// Display name.
    pub name: String,
    /// Owning empire, inherited from the carrier.
    pub owner: EmpireId,
    /// The craft that launched this fighter.
    pub carrier: ObjectId,
    /// Hangar part this fighter launched from, used for recovery.
    pub launched_from: String,
    /// Power per shot.
    pub power: f32,
    /// Crew species, inherited from the carrier.
    pub species: Option<String>,
    /// Targeting preference inherited from the hangar.
    pub targeting: Option<TargetCondition>,
    /// Set when the fighter takes any positive damage.
    pub destroyed: bool,
}

impl FighterState {
    /// Creates a fighter launched from a hangar part of a carrier.
    #[must_use]
    pub fn new(
        owner: EmpireId,
        carrier: ObjectId,
        launched_from: impl Into<String>,
        power: f32,
        species: Option<String>,
        targeting: Option<TargetCondition>,
    ) -> Self {
        let name = match &species {
            Some(s) => format!("{s} fighter"),
            None => "fighter".to_string(),
        };
        Self {
            name,
            owner,
            carrier,
            launched_from: launched_from.into(),
            power,
            species,
            targeting,
            destroyed: false,
        }
    }
}
