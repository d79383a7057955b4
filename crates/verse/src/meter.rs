//! Meters: the named gauges carried by universe objects.
//!
//! A meter tracks a `current` value against the `initial` value it had when
//! the turn began. Combat mutates `current`; turn processing elsewhere is
//! responsible for regeneration toward targets. The only invariant this
//! module enforces is that `current` never goes below zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of gauge an object can carry.
///
/// Not every object has every meter: craft have no `Construction` or
/// `Population`, stations have no `Structure`. Accessors return `Option`
/// so callers can treat an absent gauge as an anomaly rather than a zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeterKind {
    /// Hull integrity of a mobile craft; the craft is destroyed at zero.
    Structure,
    /// Shielding that absorbs weapon power before it reaches anything else.
    Shield,
    /// Ground/orbital defenses of a station; absorbs damage after shields.
    Defense,
    /// Built infrastructure of a station; the last gauge to absorb damage.
    Construction,
    /// Weapon power of a station's synthetic direct-fire attack.
    Attack,
    /// Sensor strength, used for the monster targeting threshold.
    Detection,
    /// Counter-sensor strength, checked against monster detection.
    Stealth,
    /// Population present on a station; an unowned-but-populated station
    /// is a legal target.
    Population,
}

impl fmt::Display for MeterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Structure => "structure",
            Self::Shield => "shield",
            Self::Defense => "defense",
            Self::Construction => "construction",
            Self::Attack => "attack",
            Self::Detection => "detection",
            Self::Stealth => "stealth",
            Self::Population => "population",
        };
        write!(f, "{name}")
    }
}

/// A single gauge: a current value and the value it started the turn with.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    current: f32,
    initial: f32,
}

impl Meter {
    /// Creates a meter with identical current and initial values.
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            current: value.max(0.0),
            initial: value.max(0.0),
        }
    }

    /// Returns the current value.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Returns the value at the start of the turn.
    #[must_use]
    pub const fn initial(&self) -> f32 {
        self.initial
    }

    /// Sets the current value, clamped to be non-negative.
    pub fn set_current(&mut self, value: f32) {
        self.current = value.max(0.0);
    }

    /// Adds a (possibly negative) delta to the current value, clamped to
    /// be non-negative.
    pub fn add(&mut self, delta: f32) {
        self.set_current(self.current + delta);
    }

    /// Drains up to `amount` from the current value and returns how much
    /// was actually drained.
    ///
    /// This is the primitive behind gauge "peeling": each gauge absorbs
    /// what it can, clipped to its own current value, and the remainder
    /// flows on to the next gauge.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let drained = amount.max(0.0).min(self.current);
        self.current -= drained;
        drained
    }

    /// Returns `true` if the current value is zero (or rounds to it).
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current <= 0.0
    }
}
