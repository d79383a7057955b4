//! Universe: the persistent object graph.
//!
//! The universe owns every persistent object (mobile craft, stationary
//! installations) grouped into locations. Storage is `BTreeMap`-backed so
//! iteration order is deterministic across platforms, which the combat
//! engine relies on for reproducible resolution.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::design::DesignId;
use crate::meter::{Meter, MeterKind};
use crate::{EmpireId, LocationId, ObjectId};

/// A mobile craft as stored in the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftRecord {
    /// Display name.
    pub name: String,
    /// Owning empire ([`EmpireId::NEUTRAL`] for monsters).
    pub owner: EmpireId,
    /// Design this craft was built from.
    pub design: DesignId,
    /// Species of the crew, inherited by launched fighters.
    pub species: Option<String>,
    /// Whether the craft's group is postured aggressively. Aggressive
    /// craft are visible to their enemies regardless of normal visibility.
    pub aggressive: bool,
    meters: BTreeMap<MeterKind, Meter>,
    /// Fighters currently stored, keyed by hangar part name.
    stored_fighters: BTreeMap<String, u32>,
}

impl CraftRecord {
    /// Creates a craft with no meters and empty hangars.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: EmpireId, design: DesignId) -> Self {
        Self {
            name: name.into(),
            owner,
            design,
            species: None,
            aggressive: false,
            meters: BTreeMap::new(),
            stored_fighters: BTreeMap::new(),
        }
    }

    /// Sets a meter (builder style).
    #[must_use]
    pub fn with_meter(mut self, kind: MeterKind, value: f32) -> Self {
        self.meters.insert(kind, Meter::new(value));
        self
    }

    /// Sets the crew species (builder style).
    #[must_use]
    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Marks the craft as aggressive (builder style).
    #[must_use]
    pub fn aggressive(mut self) -> Self {
        self.aggressive = true;
        self
    }

    /// Sets the stored fighter count for a hangar part (builder style).
    #[must_use]
    pub fn with_stored_fighters(mut self, hangar_part: impl Into<String>, count: u32) -> Self {
        self.stored_fighters.insert(hangar_part.into(), count);
        self
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

    /// Returns the stored fighter count for a hangar part.
    #[must_use]
    pub fn stored_fighters(&self, hangar_part: &str) -> u32 {
        self.stored_fighters.get(hangar_part).copied().unwrap_or(0)
    }

    /// Overwrites the stored fighter count for a hangar part.
    pub fn set_stored_fighters(&mut self, hangar_part: impl Into<String>, count: u32) {
        self.stored_fighters.insert(hangar_part.into(), count);
    }
}

/// A stationary installation as stored in the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Display name.
    pub name: String,
    /// Owning empire ([`EmpireId::NEUTRAL`] if unclaimed).
    pub owner: EmpireId,
    meters: BTreeMap<MeterKind, Meter>,
}

impl StationRecord {
    /// Creates a station with no meters.
    #[must_use]
    pub fn new(name: impl Into<String>, owner: EmpireId) -> Self {
        Self {
            name: name.into(),
            owner,
            meters: BTreeMap::new(),
        }
    }

    /// Sets a meter (builder style).
    #[must_use]
    pub fn with_meter(mut self, kind: MeterKind, value: f32) -> Self {
        self.meters.insert(kind, Meter::new(value));
        self
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

/// A persistent object: either a mobile craft or a stationary installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldObject {
    /// A mobile craft.
    Craft(CraftRecord),
    /// A stationary installation.
    Station(StationRecord),
}

impl WorldObject {
    /// Returns the owning empire.
    #[must_use]
    pub fn owner(&self) -> EmpireId {
        match self {
            Self::Craft(c) => c.owner,
            Self::Station(s) => s.owner,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Craft(c) => &c.name,
            Self::Station(s) => &s.name,
        }
    }

    /// Returns a meter, if the object carries it.
    #[must_use]
    pub fn meter(&self, kind: MeterKind) -> Option<&Meter> {
        match self {
            Self::Craft(c) => c.meter(kind),
            Self::Station(s) => s.meter(kind),
        }
    }

    /// Returns a mutable meter, if the object carries it.
    pub fn meter_mut(&mut self, kind: MeterKind) -> Option<&mut Meter> {
        match self {
            Self::Craft(c) => c.meter_mut(kind),
            Self::Station(s) => s.meter_mut(kind),
        }
    }

    /// Returns the craft record, if this is a craft.
    #[must_use]
    pub const fn as_craft(&self) -> Option<&CraftRecord> {
        match self {
            Self::Craft(c) => Some(c),
            Self::Station(_) => None,
        }
    }

    /// Returns the mutable craft record, if this is a craft.
    pub fn as_craft_mut(&mut self) -> Option<&mut CraftRecord> {
        match self {
            Self::Craft(c) => Some(c),
            Self::Station(_) => None,
        }
    }

    /// Returns the station record, if this is a station.
    #[must_use]
    pub const fn as_station(&self) -> Option<&StationRecord> {
        match self {
            Self::Station(s) => Some(s),
            Self::Craft(_) => None,
        }
    }

    /// Returns the mutable station record, if this is a station.
    pub fn as_station_mut(&mut self) -> Option<&mut StationRecord> {
        match self {
            Self::Station(s) => Some(s),
            Self::Craft(_) => None,
        }
    }
}

/// A location: a named scope whose members are co-located for combat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name.
    pub name: String,
    /// Member object ids, in deterministic order.
    pub members: BTreeSet<ObjectId>,
}

/// The persistent object graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    objects: BTreeMap<ObjectId, WorldObject>,
    locations: BTreeMap<LocationId, Location>,
    next_object: i32,
    next_location: u32,
}

impl Universe {
    /// Creates an empty universe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a location and returns its id.
    pub fn add_location(&mut self, name: impl Into<String>) -> LocationId {
        let id = LocationId::new(self.next_location);
        self.next_location += 1;
        self.locations.insert(
            id,
            Location {
                name: name.into(),
                members: BTreeSet::new(),
            },
        );
        id
    }

    fn add_object(&mut self, location: LocationId, object: WorldObject) -> ObjectId {
        let id = ObjectId::new(self.next_object);
        self.next_object += 1;
        self.objects.insert(id, object);
        if let Some(loc) = self.locations.get_mut(&location) {
            loc.members.insert(id);
        }
        id
    }

    /// Adds a craft to a location and returns its id.
    pub fn add_craft(&mut self, location: LocationId, record: CraftRecord) -> ObjectId {
        self.add_object(location, WorldObject::Craft(record))
    }

    /// Adds a station to a location and returns its id.
    pub fn add_station(&mut self, location: LocationId, record: StationRecord) -> ObjectId {
        self.add_object(location, WorldObject::Station(record))
    }

    /// Looks up an object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    /// Looks up a mutable object by id.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.objects.get_mut(&id)
    }

    /// Looks up a location by id.
    #[must_use]
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    /// Iterates over all location ids in deterministic order.
    pub fn location_ids(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.locations.keys().copied()
    }

    /// Iterates over the objects present at a location, in id order.
    ///
    /// Member ids that no longer resolve are skipped.
    pub fn objects_at(&self, location: LocationId) -> impl Iterator<Item = (ObjectId, &WorldObject)> {
        self.locations
            .get(&location)
            .into_iter()
            .flat_map(|loc| loc.members.iter())
            .filter_map(|id| self.objects.get(id).map(|obj| (*id, obj)))
    }

    /// Removes an object from the graph and from every location.
    ///
    /// Returns the removed object, if it existed.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<WorldObject> {
        for loc in self.locations.values_mut() {
            loc.members.remove(&id);
        }
        self.objects.remove(&id)
    }

    /// Returns the number of objects in the graph.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}
