//! Bout scheduling: driving a battle from setup to conclusion.
//!
//! A battle runs a bounded number of bouts. Each bout recomputes the
//! working sets, shuffles the attacker order, fires stations first, then
//! craft and fighters, then lets carriers launch (except in the final
//! bout), reveals hidden attackers to the empires they fired on, and
//! culls the dead. The battle ends early as soon as no empire has both a
//! target and a way to attack it.
//!
//! Under [`Seeding::Fixed`] the RNG is reseeded at the top of every bout
//! from a hash of (location, turn, bout), so resolution is reproducible
//! across runs and platforms and independent of how many random draws
//! earlier bouts consumed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::battle::BattleContext;
use crate::classifier::{station_incapacitated, targetable_by, WorkingSet};
use crate::combatant::CombatantKind;
use crate::events::{BattleEvent, WeaponFire};
use crate::fighters::{launch_fighters, recover_fighters};
use crate::resolution::resolve_attack;
use crate::weapons::{attack_actions, AttackAction};
use verse::{
    Catalog, DiplomacyTable, EmpireId, GameRules, LocationId, ObjectId, Seeding, TargetScope,
    Universe, Visibility, VisibilityMap,
};

/// Where a battle currently stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BattlePhase {
    /// Not yet started.
    Idle,
    /// Running the given bout.
    Running {
        /// Bout number, starting at 1.
        bout: u32,
    },
    /// Finished; the context holds the final event log.
    Concluded,
}

/// Drives one battle through its bouts.
pub struct BoutScheduler<'a> {
    diplomacy: &'a DiplomacyTable,
    rules: &'a GameRules,
    phase: BattlePhase,
}

impl<'a> BoutScheduler<'a> {
    /// Creates an idle scheduler over shared game state.
    #[must_use]
    pub const fn new(diplomacy: &'a DiplomacyTable, rules: &'a GameRules) -> Self {
        Self {
            diplomacy,
            rules,
            phase: BattlePhase::Idle,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Runs the battle to conclusion, mutating the context in place.
    pub fn run(&mut self, ctx: &mut BattleContext) {
        let span = tracing::info_span!(
            "battle",
            location = %ctx.location(),
            turn = ctx.turn()
        );
        let _guard = span.enter();

        if ctx.is_empty() {
            self.phase = BattlePhase::Concluded;
            return;
        }

        let mut last_bout = 0;
        for bout in 1..=self.rules.rounds {
            self.phase = BattlePhase::Running { bout };

            let mut set = WorkingSet::recompute(ctx, self.diplomacy);
            set.purge_idle_empires(ctx);
            if !set.battle_live(ctx) {
                tracing::debug!(bout, "no viable attacker/target pairs, battle over");
                break;
            }
            last_bout = bout;
            ctx.record_event(BattleEvent::BoutBegin { bout });

            let mut rng = self.bout_rng(ctx, bout);
            let mut order: Vec<ObjectId> = set.valid_attackers.iter().copied().collect();
            order.shuffle(&mut rng);

            // (attacker, empire fired upon) pairs, for the reveal step.
            let mut strikes: BTreeSet<(ObjectId, EmpireId)> = BTreeSet::new();

            for &id in &order {
                if combatant_kind(ctx, id) == Some(CombatantKind::Station) {
                    fire_volley(ctx, &mut set, &mut rng, bout, id, &mut strikes);
                }
            }
            for &id in &order {
                let kind = combatant_kind(ctx, id);
                if kind == Some(CombatantKind::Craft) || kind == Some(CombatantKind::Fighter) {
                    fire_volley(ctx, &mut set, &mut rng, bout, id, &mut strikes);
                }
            }

            // No launches in the final bout: those fighters could never act.
            if bout < self.rules.rounds {
                for &id in &order {
                    self.launch_phase(ctx, &mut set, bout, id);
                }
            }

            for (attacker, empire) in strikes {
                let was_targetable = is_targetable(ctx, self.diplomacy, empire, attacker);
                let rose = ctx.reveal(empire, attacker, Visibility::Basic);
                let newly_engaged = ctx.note_engaged(empire, attacker);
                let now_targetable = is_targetable(ctx, self.diplomacy, empire, attacker);
                // An engagement that first makes the attacker targetable
                // counts as a reveal even when the level did not rise.
                if rose || (newly_engaged && now_targetable && !was_targetable) {
                    let level = ctx.visibility(empire, attacker);
                    ctx.record_event(BattleEvent::StealthRevealed {
                        bout,
                        object: attacker,
                        empire,
                        level,
                    });
                }
            }

            cull(ctx, &mut set, bout);
        }

        recover_fighters(ctx, last_bout);
        self.phase = BattlePhase::Concluded;
        tracing::info!(
            bouts = last_bout,
            events = ctx.events().len(),
            "battle concluded"
        );
    }

    fn launch_phase(
        &self,
        ctx: &mut BattleContext,
        set: &mut WorkingSet,
        bout: u32,
        carrier_id: ObjectId,
    ) {
        if ctx.is_destroyed(carrier_id) {
            return;
        }
        let Some(combatant) = ctx.combatant(carrier_id) else {
            return;
        };
        if combatant.kind() != CombatantKind::Craft {
            return;
        }
        let count = attack_actions(combatant).into_iter().find_map(|a| match a {
            AttackAction::LaunchFighters { count } => Some(count),
            AttackAction::DirectFire { .. } => None,
        });
        if let Some(count) = count {
            launch_fighters(ctx, set, self.diplomacy, bout, carrier_id, count);
        }
    }

    fn bout_rng(&self, ctx: &BattleContext, bout: u32) -> ChaCha8Rng {
        match self.rules.seeding {
            Seeding::Fixed => {
                let mut hasher = DefaultHasher::new();
                ctx.location().as_u32().hash(&mut hasher);
                ctx.turn().hash(&mut hasher);
                bout.hash(&mut hasher);
                ChaCha8Rng::seed_from_u64(hasher.finish())
            }
            Seeding::Entropy => ChaCha8Rng::from_entropy(),
        }
    }
}

fn combatant_kind(ctx: &BattleContext, id: ObjectId) -> Option<CombatantKind> {
    ctx.combatant(id).map(crate::combatant::Combatant::kind)
}

fn is_targetable(
    ctx: &BattleContext,
    diplomacy: &DiplomacyTable,
    empire: EmpireId,
    object: ObjectId,
) -> bool {
    match ctx.combatant(object) {
        Some(target) => targetable_by(ctx, empire, target, diplomacy),
        None => false,
    }
}

/// Fires every direct-fire action of one attacker, re-reading the target
/// set after each shot since earlier shots may have destroyed fighters.
///
/// A fighter downed by a shot is marked destroyed and leaves the working
/// sets at once, so no later shot this bout can select it and the next
/// recompute never re-admits it; its loss is logged right after the
/// volley that killed it.
fn fire_volley(
    ctx: &mut BattleContext,
    set: &mut WorkingSet,
    rng: &mut ChaCha8Rng,
    bout: u32,
    attacker_id: ObjectId,
    strikes: &mut BTreeSet<(ObjectId, EmpireId)>,
) {
    if !set.valid_attackers.contains(&attacker_id) {
        return;
    }
    let Some(attacker) = ctx.combatant(attacker_id) else {
        return;
    };
    let owner = attacker.owner();
    let actions = attack_actions(attacker);

    let mut shots: Vec<WeaponFire> = Vec::new();
    let mut downed: Vec<ObjectId> = Vec::new();
    for action in actions {
        let AttackAction::DirectFire {
            weapon,
            power,
            targeting,
        } = action
        else {
            continue;
        };

        let Some(target_id) = pick_target(ctx, set, rng, owner, targeting) else {
            break;
        };

        match resolve_attack(ctx, attacker_id, &weapon, power, target_id) {
            Ok(Some(fire)) => {
                let target_owner = ctx
                    .combatant(target_id)
                    .map_or(EmpireId::NEUTRAL, |t| t.owner());
                strikes.insert((attacker_id, target_owner));
                let fighter_down = ctx
                    .combatant(target_id)
                    .and_then(crate::combatant::Combatant::as_fighter)
                    .is_some_and(|f| f.destroyed);
                if fighter_down {
                    ctx.note_destroyed(target_id);
                    set.remove(target_id);
                    downed.push(target_id);
                }
                shots.push(fire);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(%attacker_id, %target_id, %err, "skipping shot");
            }
        }
    }

    if !shots.is_empty() {
        ctx.record_event(BattleEvent::Volley {
            bout,
            attacker: attacker_id,
            owner,
            shots,
        });
    }
    for object in downed {
        ctx.record_event(BattleEvent::Destroyed {
            bout,
            object,
            kind: CombatantKind::Fighter,
        });
    }
}

/// Removes the dead at the end of a bout: craft with exhausted structure
/// and stations knocked out after taking damage. Fighters die at shot
/// time inside [`fire_volley`], never here.
fn cull(ctx: &mut BattleContext, set: &mut WorkingSet, bout: u32) {
    let candidates: Vec<ObjectId> = set
        .valid_attackers
        .union(&set.valid_targets)
        .copied()
        .collect();
    for id in candidates {
        let Some(combatant) = ctx.combatant(id) else {
            continue;
        };
        match combatant.kind() {
            CombatantKind::Craft => {
                let dead = combatant
                    .meter(verse::MeterKind::Structure)
                    .is_some_and(verse::Meter::is_exhausted);
                if dead {
                    ctx.note_destroyed(id);
                    ctx.record_event(BattleEvent::Destroyed {
                        bout,
                        object: id,
                        kind: CombatantKind::Craft,
                    });
                    set.remove(id);
                }
            }
            CombatantKind::Fighter => {}
            CombatantKind::Station => {
                if station_incapacitated(ctx, combatant) {
                    ctx.record_event(BattleEvent::Incapacitated { bout, object: id });
                    set.remove(id);
                }
            }
        }
    }
}

/// Picks a target for one shot from the attacker's owner's target set.
///
/// When the weapon carries a targeting condition, its weight is the
/// per-shot chance the condition applies; an applied condition restricts
/// selection to targets matching its scope whenever at least one is
/// available, falling back to the full set otherwise. Selection within
/// the chosen list is uniform.
fn pick_target(
    ctx: &BattleContext,
    set: &WorkingSet,
    rng: &mut ChaCha8Rng,
    owner: EmpireId,
    targeting: Option<verse::TargetCondition>,
) -> Option<ObjectId> {
    let all: Vec<ObjectId> = set
        .per_empire
        .get(&owner)
        .map(|info| info.target_ids.iter().copied().collect())
        .unwrap_or_default();
    if all.is_empty() {
        return None;
    }

    let pool: Vec<ObjectId> = match targeting {
        Some(condition) if rng.gen::<f32>() < condition.weight => {
            let preferred: Vec<ObjectId> = all
                .iter()
                .copied()
                .filter(|&id| {
                    ctx.combatant(id)
                        .is_some_and(|c| condition.scope.contains(kind_scope(c.kind())))
                })
                .collect();
            if preferred.is_empty() {
                all
            } else {
                preferred
            }
        }
        _ => all,
    };

    Some(pool[rng.gen_range(0..pool.len())])
}

const fn kind_scope(kind: CombatantKind) -> TargetScope {
    match kind {
        CombatantKind::Craft => TargetScope::CRAFT,
        CombatantKind::Station => TargetScope::STATION,
        CombatantKind::Fighter => TargetScope::FIGHTER,
    }
}

/// Resolves one battle at one location, returning the concluded context.
///
/// An unknown location is logged and resolved as an empty battle.
#[must_use]
pub fn auto_resolve(
    universe: &Universe,
    catalog: &Catalog,
    diplomacy: &DiplomacyTable,
    oracle: &VisibilityMap,
    rules: &GameRules,
    location: LocationId,
    turn: u32,
) -> BattleContext {
    if universe.location(location).is_none() {
        let err = crate::error::CombatError::InvalidLocation(location);
        tracing::warn!(%err, "resolving battle at unknown location");
    }
    let mut ctx = BattleContext::new(universe, catalog, diplomacy, oracle, location, turn);
    let mut scheduler = BoutScheduler::new(diplomacy, rules);
    scheduler.run(&mut ctx);
    ctx
}

/// Returns every location where a battle would actually happen this turn.
///
/// A location qualifies when at least one empire present has both a
/// viable target and a way to attack it.
#[must_use]
pub fn combat_locations(
    universe: &Universe,
    catalog: &Catalog,
    diplomacy: &DiplomacyTable,
    oracle: &VisibilityMap,
    turn: u32,
) -> Vec<LocationId> {
    universe
        .location_ids()
        .filter(|&location| {
            let ctx = BattleContext::new(universe, catalog, diplomacy, oracle, location, turn);
            let mut set = WorkingSet::recompute(&ctx, diplomacy);
            set.purge_idle_empires(&ctx);
            set.battle_live(&ctx)
        })
        .collect()
}

/// Resolves every battle of the turn and writes results back.
///
/// Battles at different locations are independent, so they resolve in
/// parallel over isolated contexts; write-back to the shared universe is
/// sequential and ordered by location, so the combined outcome is
/// deterministic regardless of thread scheduling.
pub fn resolve_all_combats(
    universe: &mut Universe,
    catalog: &Catalog,
    diplomacy: &DiplomacyTable,
    oracle: &mut VisibilityMap,
    rules: &GameRules,
    turn: u32,
) -> Vec<BattleContext> {
    let locations = combat_locations(universe, catalog, diplomacy, oracle, turn);
    tracing::info!(battles = locations.len(), turn, "resolving combats");

    let universe_ref: &Universe = universe;
    let oracle_ref: &VisibilityMap = oracle;
    let contexts: Vec<BattleContext> = locations
        .par_iter()
        .map(|&location| {
            auto_resolve(
                universe_ref,
                catalog,
                diplomacy,
                oracle_ref,
                rules,
                location,
                turn,
            )
        })
        .collect();

    for ctx in &contexts {
        ctx.apply_to_universe(universe, oracle);
    }
    contexts
}
