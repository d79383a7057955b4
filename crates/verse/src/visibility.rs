//! Per-empire visibility of universe objects.
//!
//! Visibility is a total order: `Hidden < Basic < Partial < Full`.
//! "Minimal" visibility in combat rules means [`Visibility::Basic`];
//! "strictly better than minimal" means [`Visibility::Partial`] or above.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{EmpireId, ObjectId};

/// How much an empire knows about an object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Nothing: the object is not known to exist.
    Hidden,
    /// Minimal: existence and rough class are known.
    Basic,
    /// Partial: enough to target the object in combat.
    Partial,
    /// Full: complete knowledge.
    Full,
}

/// Map from (empire, object) to visibility level.
///
/// Stored as a nested `BTreeMap` keyed by empire, then object, so both
/// iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityMap {
    levels: BTreeMap<EmpireId, BTreeMap<ObjectId, Visibility>>,
}

impl VisibilityMap {
    /// Creates an empty map; every unlisted pair is [`Visibility::Hidden`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visibility of `object` to `empire`.
    #[must_use]
    pub fn visibility(&self, empire: EmpireId, object: ObjectId) -> Visibility {
        self.levels
            .get(&empire)
            .and_then(|per_object| per_object.get(&object))
            .copied()
            .unwrap_or(Visibility::Hidden)
    }

    /// Sets the visibility of `object` to `empire`.
    pub fn set(&mut self, empire: EmpireId, object: ObjectId, level: Visibility) {
        self.levels.entry(empire).or_default().insert(object, level);
    }

    /// Raises the visibility of `object` to `empire` to at least `floor`.
    ///
    /// Returns `true` if the stored level changed. Never lowers a level.
    pub fn ensure_at_least(&mut self, empire: EmpireId, object: ObjectId, floor: Visibility) -> bool {
        let entry = self
            .levels
            .entry(empire)
            .or_default()
            .entry(object)
            .or_insert(Visibility::Hidden);
        if *entry < floor {
            *entry = floor;
            true
        } else {
            false
        }
    }

    /// Iterates over all stored (empire, object, visibility) triples in
    /// deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (EmpireId, ObjectId, Visibility)> + '_ {
        self.levels.iter().flat_map(|(empire, per_object)| {
            per_object
                .iter()
                .map(move |(object, level)| (*empire, *object, *level))
        })
    }
}
