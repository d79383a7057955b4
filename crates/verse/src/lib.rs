//! # Verse
//!
//! Persistent universe model for Starfall: the object graph of locations,
//! mobile craft and stationary installations, their named gauges ("meters"),
//! the ship design/part catalog, empire diplomacy, per-empire visibility,
//! and game configuration.
//!
//! Verse knows nothing about combat resolution. The combat engine in
//! `starfall-core` consumes these types as explicit, read-mostly context
//! parameters and copies its results back through plain accessors.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use verse::{Universe, CraftRecord, EmpireId, MeterKind};
//!
//! let mut universe = Universe::new();
//! let home = universe.add_location("Tau Ceti");
//! let ship = universe.add_craft(home, CraftRecord::new("Resolute", EmpireId::new(1), design));
//! let hull = universe.object(ship).unwrap().meter(MeterKind::Structure);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod design;
pub mod diplomacy;
pub mod meter;
pub mod rules;
pub mod universe;
pub mod visibility;

// Re-exports for convenience
pub use design::{Catalog, Design, DesignId, Part, PartClass, TargetCondition, TargetScope};
pub use diplomacy::{DiplomacyTable, DiplomaticStatus};
pub use meter::{Meter, MeterKind};
pub use rules::{GameRules, Seeding};
pub use universe::{CraftRecord, Location, StationRecord, Universe, WorldObject};
pub use visibility::{Visibility, VisibilityMap};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an empire.
///
/// Real empires use non-negative values. The sentinel [`EmpireId::NEUTRAL`]
/// stands for the "unowned" side: monsters, derelicts, and unclaimed
/// installations all report it as their owner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EmpireId(i32);

impl EmpireId {
    /// The unowned/monster sentinel empire.
    pub const NEUTRAL: Self = Self(-1);

    /// Creates a new `EmpireId` from a raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Returns `true` if this is the unowned/monster sentinel.
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        self.0 == Self::NEUTRAL.0
    }
}

impl fmt::Display for EmpireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neutral() {
            write!(f, "neutral")
        } else {
            write!(f, "empire {}", self.0)
        }
    }
}

/// Identifier for an object in the universe graph.
///
/// Persistent objects (craft, stations) use positive ids assigned by the
/// [`Universe`]. Battle-scoped entities (fighters) use negative synthetic
/// ids allocated by the combat engine; they never appear in the persistent
/// graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(i32);

impl ObjectId {
    /// Creates a new `ObjectId` from a raw value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Returns `true` if this id is battle-scoped (negative).
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ObjectId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Identifier for a location (a star system or similar co-location scope).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocationId(u32);

impl LocationId {
    /// Creates a new `LocationId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "location {}", self.0)
    }
}
