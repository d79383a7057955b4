//! Ship designs and the part catalog.
//!
//! A craft's combat equipment is derived from its design: an ordered list
//! of part names, each resolving through the [`Catalog`] to a part class.
//! Three classes matter to combat:
//!
//! - **Direct weapons**: fire `shots` times per bout at `power` each.
//! - **Fighter bays**: launch up to `launch_rate` stored fighters per bout.
//! - **Fighter hangars**: store fighters between launches and give them
//!   their per-shot power and targeting condition.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier for a ship design.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DesignId(u32);

impl DesignId {
    /// Creates a new `DesignId` from a raw value.
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

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "design {}", self.0)
    }
}

bitflags! {
    /// Which combatant kinds a targeting condition admits.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TargetScope: u8 {
        /// Mobile craft.
        const CRAFT = 1 << 0;
        /// Stationary installations.
        const STATION = 1 << 1;
        /// Battle-scoped fighters.
        const FIGHTER = 1 << 2;
    }
}

/// A targeting preference carried by a part (or synthesized for stations).
///
/// `weight` is the per-shot probability the preference applies. An applied
/// preference restricts target selection to combatants matching `scope`
/// whenever at least one such target is available, falling back to the
/// full target set otherwise.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCondition {
    /// Admitted combatant kinds.
    pub scope: TargetScope,
    /// Per-shot probability that the preference applies.
    pub weight: f32,
}

impl TargetCondition {
    /// Creates a condition admitting the given kinds at weight 1.
    #[must_use]
    pub const fn new(scope: TargetScope) -> Self {
        Self { scope, weight: 1.0 }
    }

    /// Sets the per-shot probability that the preference applies.
    #[must_use]
    pub const fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Combat-relevant classification of a part.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartClass {
    /// A direct-fire weapon: `shots` attacks per bout at `power` each.
    DirectWeapon {
        /// Power of each shot.
        power: f32,
        /// Shots per bout.
        shots: u32,
    },
    /// A fighter bay: launches up to `launch_rate` fighters per bout.
    FighterBay {
        /// Fighters launched per bout through this bay.
        launch_rate: u32,
    },
    /// A fighter hangar: stores fighters and defines what they are.
    FighterHangar {
        /// Maximum fighters stored.
        capacity: u32,
        /// Per-shot power of fighters launched from this hangar.
        fighter_power: f32,
    },
}

/// A part definition in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Display name; also the catalog key.
    pub name: String,
    /// Combat classification.
    pub class: PartClass,
    /// Optional targeting condition attached to this part's attacks (or,
    /// for hangars, to the fighters it spawns).
    pub targeting: Option<TargetCondition>,
}

impl Part {
    /// Creates a part with no targeting condition.
    #[must_use]
    pub fn new(name: impl Into<String>, class: PartClass) -> Self {
        Self {
            name: name.into(),
            class,
            targeting: None,
        }
    }

    /// Attaches a targeting condition.
    #[must_use]
    pub fn with_targeting(mut self, condition: TargetCondition) -> Self {
        self.targeting = Some(condition);
        self
    }
}

/// A ship design: a name and an ordered part list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Display name.
    pub name: String,
    /// Part names, in hull order. Duplicates are real: a design with two
    /// identical weapons fires both.
    pub parts: Vec<String>,
}

impl Design {
    /// Creates a design from a name and part list.
    #[must_use]
    pub fn new(name: impl Into<String>, parts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }
}

/// The design/part catalog.
///
/// Both maps are `BTreeMap`s so iteration over catalog contents is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    parts: BTreeMap<String, Part>,
    designs: BTreeMap<DesignId, Design>,
    next_design: u32,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a part definition, replacing any previous part with the
    /// same name.
    pub fn add_part(&mut self, part: Part) {
        self.parts.insert(part.name.clone(), part);
    }

    /// Registers a design and returns its id.
    pub fn add_design(&mut self, design: Design) -> DesignId {
        let id = DesignId::new(self.next_design);
        self.next_design += 1;
        self.designs.insert(id, design);
        id
    }

    /// Looks up a part by name.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.get(name)
    }

    /// Looks up a design by id.
    #[must_use]
    pub fn design(&self, id: DesignId) -> Option<&Design> {
        self.designs.get(&id)
    }

    /// Iterates over the resolved parts of a design, in hull order.
    ///
    /// Part names that do not resolve are skipped; the caller decides
    /// whether that is an anomaly worth logging.
    pub fn design_parts(&self, id: DesignId) -> impl Iterator<Item = &Part> + '_ {
        self.designs
            .get(&id)
            .into_iter()
            .flat_map(|design| design.parts.iter())
            .filter_map(|name| self.parts.get(name))
    }
}
