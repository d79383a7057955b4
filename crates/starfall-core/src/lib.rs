//! # Starfall Core
//!
//! Deterministic auto-resolution of space battles for Starfall.
//!
//! Each game turn, every location holding mutually hostile forces is
//! resolved as an isolated battle: a bounded sequence of bouts in which
//! mobile craft, stationary installations and short-lived fighters
//! exchange fire. The engine mutates only its own battle-local snapshots
//! and produces an ordered, serializable event log; persistent state is
//! written back in one step when the battle concludes.
//!
//! ## Architecture
//!
//! - **Combatants**: battle-local snapshots of craft, stations and
//!   fighters ([`combatant`]).
//! - **Context**: per-battle state, visibility view and event log
//!   ([`battle`], [`events`]).
//! - **Classification**: who may attack whom ([`classifier`]).
//! - **Resolution**: actions per attacker and per-shot effects
//!   ([`weapons`], [`resolution`], [`fighters`]).
//! - **Scheduling**: the bout loop and the multi-battle driver
//!   ([`scheduler`]).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starfall_core::resolve_all_combats;
//!
//! let battles = resolve_all_combats(
//!     &mut universe, &catalog, &diplomacy, &mut visibility, &rules, turn,
//! );
//! for battle in &battles {
//!     println!("{}", serde_json::to_string(battle.events())?);
//! }
//! ```
//!
//! With [`verse::Seeding::Fixed`], resolving the same battle twice yields
//! byte-identical event logs.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the universe substrate
pub use verse;

pub mod battle;
pub mod classifier;
pub mod combatant;
pub mod error;
pub mod events;
pub mod fighters;
pub mod resolution;
pub mod scheduler;
pub mod weapons;

pub use battle::BattleContext;
pub use classifier::{EmpireCombatInfo, WorkingSet};
pub use combatant::{Combatant, CombatantInner, CombatantKind};
pub use error::CombatError;
pub use events::{BattleEvent, StealthReport, WeaponFire};
pub use scheduler::{
    auto_resolve, combat_locations, resolve_all_combats, BattlePhase, BoutScheduler,
};
pub use weapons::AttackAction;

#[cfg(test)]
mod tests;
