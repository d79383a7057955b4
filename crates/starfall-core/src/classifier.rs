//! Participant classification: who can shoot, who can be shot, and by whom.
//!
//! Classification runs in three layers. Intrinsic predicates
//! ([`can_attack`], [`can_be_attacked`]) look only at a combatant's own
//! state. [`attackable_by`] layers diplomacy and visibility on top, with a
//! separate rule for the unowned/monster side. [`WorkingSet`] folds the
//! predicates over the whole battle into per-empire attacker and target
//! sets, recomputed at the top of every bout.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::battle::BattleContext;
use crate::combatant::{Combatant, CombatantInner, CombatantKind};
use verse::{DiplomacyTable, EmpireId, MeterKind, ObjectId, Visibility};

/// Returns `true` if the combatant is a legal target for anyone.
///
/// Craft always are, fighters only until destroyed. A station is a legal
/// target only if it is owned by a real empire or carries population.
#[must_use]
pub fn can_be_attacked(combatant: &Combatant) -> bool {
    match combatant.inner() {
        CombatantInner::Craft(_) => true,
        CombatantInner::Fighter(state) => !state.destroyed,
        CombatantInner::Station(state) => {
            !state.owner.is_neutral()
                || state
                    .meter(MeterKind::Population)
                    .is_some_and(|m| m.current() > 0.0)
        }
    }
}

/// Returns `true` if the combatant can initiate attacks.
#[must_use]
pub fn can_attack(combatant: &Combatant) -> bool {
    match combatant.inner() {
        CombatantInner::Craft(state) => state.is_armed() || state.has_armed_fighters(),
        CombatantInner::Station(state) => state
            .meter(MeterKind::Attack)
            .is_some_and(|m| m.current() > 0.0),
        CombatantInner::Fighter(state) => state.power > 0.0 && !state.destroyed,
    }
}

/// Returns `true` if a station should be treated as knocked out: it took
/// damage this battle and every defensive gauge is exhausted.
#[must_use]
pub fn station_incapacitated(ctx: &BattleContext, combatant: &Combatant) -> bool {
    let CombatantInner::Station(state) = combatant.inner() else {
        return false;
    };
    ctx.is_damaged(combatant.id())
        && [MeterKind::Shield, MeterKind::Defense, MeterKind::Construction]
            .iter()
            .all(|&kind| state.meter(kind).is_none_or(|m| m.is_exhausted()))
}

/// Returns `true` if `empire` is diplomatically permitted to attack the
/// target.
///
/// An empire never attacks its own forces. The unowned side never attacks
/// other unowned forces but may attack anything owned. Real empires
/// require a state of war with the target's owner.
#[must_use]
pub fn diplomatically_attackable(
    empire: EmpireId,
    target: &Combatant,
    diplomacy: &DiplomacyTable,
) -> bool {
    let target_owner = target.owner();
    if target_owner == empire {
        return false;
    }
    if empire.is_neutral() {
        return !target_owner.is_neutral();
    }
    diplomacy.at_war(empire, target_owner)
}

/// Returns `true` if `empire` can perceive the target well enough to
/// shoot at it.
///
/// Fighters are always perceivable once launched. Anything else needs
/// better than minimal visibility, or minimal visibility plus one of:
/// the target is an aggressive craft at war with `empire`, or the target
/// has already fired on `empire`'s forces this battle.
#[must_use]
pub fn targetable_by(
    ctx: &BattleContext,
    empire: EmpireId,
    target: &Combatant,
    diplomacy: &DiplomacyTable,
) -> bool {
    if target.kind() == CombatantKind::Fighter {
        return true;
    }
    let level = ctx.visibility(empire, target.id());
    if level >= Visibility::Partial {
        return true;
    }
    if level >= Visibility::Basic {
        let aggressive_at_war = target.as_craft().is_some_and(|c| c.aggressive)
            && diplomacy.at_war(empire, target.owner());
        return aggressive_at_war || ctx.is_engaged(empire, target.id());
    }
    false
}

/// Returns `true` if the unowned side can attack the target, given the
/// strongest detection value among unowned combatants present.
///
/// Monsters ignore empire visibility; instead a craft is attackable only
/// if its stealth does not exceed the monster side's detection. Stations
/// and fighters are always attackable by monsters.
#[must_use]
pub fn monster_attackable(target: &Combatant, detection: f32) -> bool {
    match target.inner() {
        CombatantInner::Craft(state) => state
            .meter(MeterKind::Stealth)
            .is_none_or(|m| m.current() <= detection),
        CombatantInner::Station(_) | CombatantInner::Fighter(_) => true,
    }
}

/// Returns `true` if `empire` may attack the target right now, combining
/// the intrinsic, diplomatic and perceptual layers.
#[must_use]
pub fn attackable_by(
    ctx: &BattleContext,
    empire: EmpireId,
    target: &Combatant,
    diplomacy: &DiplomacyTable,
    monster_detection: f32,
) -> bool {
    if !can_be_attacked(target) || !diplomatically_attackable(empire, target, diplomacy) {
        return false;
    }
    if empire.is_neutral() {
        monster_attackable(target, monster_detection)
    } else {
        targetable_by(ctx, empire, target, diplomacy)
    }
}

/// One empire's slice of the working set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmpireCombatInfo {
    /// Combatants this empire can attack with.
    pub attacker_ids: BTreeSet<ObjectId>,
    /// Combatants this empire may attack.
    pub target_ids: BTreeSet<ObjectId>,
}

/// The per-bout working sets of valid attackers and targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkingSet {
    /// All combatants able to initiate attacks.
    pub valid_attackers: BTreeSet<ObjectId>,
    /// All combatants that are legal targets for someone.
    pub valid_targets: BTreeSet<ObjectId>,
    /// Per-empire attacker and target slices.
    pub per_empire: BTreeMap<EmpireId, EmpireCombatInfo>,
    /// Strongest detection among unowned combatants present, driving the
    /// monster targeting threshold.
    pub monster_detection: f32,
}

impl WorkingSet {
    /// Builds the working sets for the current state of the battle.
    ///
    /// Destroyed combatants and incapacitated stations are excluded.
    #[must_use]
    pub fn recompute(ctx: &BattleContext, diplomacy: &DiplomacyTable) -> Self {
        let monster_detection = ctx
            .combatants()
            .filter(|c| c.owner().is_neutral() && !ctx.is_destroyed(c.id()))
            .map(|c| c.current(MeterKind::Detection))
            .fold(0.0_f32, f32::max);

        let mut set = Self {
            monster_detection,
            ..Self::default()
        };

        for combatant in ctx.combatants() {
            let id = combatant.id();
            if ctx.is_destroyed(id) || station_incapacitated(ctx, combatant) {
                continue;
            }
            if can_attack(combatant) {
                set.valid_attackers.insert(id);
            }
            if can_be_attacked(combatant) {
                set.valid_targets.insert(id);
            }
        }

        for &empire in ctx.empires() {
            let mut info = EmpireCombatInfo::default();
            for &id in &set.valid_attackers {
                if ctx.combatant(id).is_some_and(|c| c.owner() == empire) {
                    info.attacker_ids.insert(id);
                }
            }
            for &id in &set.valid_targets {
                let Some(target) = ctx.combatant(id) else {
                    continue;
                };
                if attackable_by(ctx, empire, target, diplomacy, monster_detection) {
                    info.target_ids.insert(id);
                }
            }
            set.per_empire.insert(empire, info);
        }

        set
    }

    /// Removes a combatant from every set, typically after destruction.
    pub fn remove(&mut self, id: ObjectId) {
        self.valid_attackers.remove(&id);
        self.valid_targets.remove(&id);
        for info in self.per_empire.values_mut() {
            info.attacker_ids.remove(&id);
            info.target_ids.remove(&id);
        }
    }

    /// Drops empires that have nothing left to shoot at and nothing left
    /// to shoot with, including un-launched armed fighters.
    pub fn purge_idle_empires(&mut self, ctx: &BattleContext) {
        self.per_empire.retain(|&empire, info| {
            !info.target_ids.is_empty()
                || !info.attacker_ids.is_empty()
                || has_unlaunched_armed_fighters(ctx, empire)
        });
    }

    /// Returns `true` if at least one empire still has targets and a way
    /// to attack them, so another bout is worth running.
    #[must_use]
    pub fn battle_live(&self, ctx: &BattleContext) -> bool {
        self.per_empire.iter().any(|(&empire, info)| {
            !info.target_ids.is_empty()
                && (!info.attacker_ids.is_empty() || has_unlaunched_armed_fighters(ctx, empire))
        })
    }
}

fn has_unlaunched_armed_fighters(ctx: &BattleContext, empire: EmpireId) -> bool {
    ctx.combatants().any(|c| {
        c.owner() == empire
            && !ctx.is_destroyed(c.id())
            && c.as_craft().is_some_and(crate::combatant::CraftState::has_armed_fighters)
    })
}

#[cfg(test)]
mod classifier_tests {
    use super::*;
    use verse::{
        Catalog, CraftRecord, Design, DesignId, DiplomaticStatus, Part, PartClass, StationRecord,
        Universe, VisibilityMap,
    };

    fn armed_catalog() -> (Catalog, DesignId) {
        let mut catalog = Catalog::new();
        catalog.add_part(Part::new(
            "Laser",
            PartClass::DirectWeapon {
                power: 5.0,
                shots: 1,
            },
        ));
        let id = catalog.add_design(Design::new("Gunship", vec!["Laser".to_string()]));
        (catalog, id)
    }

    fn context(
        universe: &Universe,
        catalog: &Catalog,
        diplomacy: &DiplomacyTable,
        loc: verse::LocationId,
    ) -> BattleContext {
        BattleContext::new(universe, catalog, diplomacy, &VisibilityMap::new(), loc, 1)
    }

    #[test]
    fn unowned_unpopulated_station_is_not_a_target() {
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let empty = universe.add_station(loc, StationRecord::new("Rock", EmpireId::NEUTRAL));
        let populated = universe.add_station(
            loc,
            StationRecord::new("Colony", EmpireId::NEUTRAL)
                .with_meter(MeterKind::Population, 3.0),
        );
        let catalog = Catalog::new();
        let diplomacy = DiplomacyTable::new();
        let ctx = context(&universe, &catalog, &diplomacy, loc);

        assert!(!can_be_attacked(ctx.combatant(empty).unwrap()));
        assert!(can_be_attacked(ctx.combatant(populated).unwrap()));
    }

    #[test]
    fn station_attacks_only_with_attack_meter() {
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let disarmed = universe.add_station(
            loc,
            StationRecord::new("Habitat", EmpireId::new(1)).with_meter(MeterKind::Defense, 10.0),
        );
        let armed = universe.add_station(
            loc,
            StationRecord::new("Fortress", EmpireId::new(1)).with_meter(MeterKind::Attack, 8.0),
        );
        let catalog = Catalog::new();
        let diplomacy = DiplomacyTable::new();
        let ctx = context(&universe, &catalog, &diplomacy, loc);

        assert!(!can_attack(ctx.combatant(disarmed).unwrap()));
        assert!(can_attack(ctx.combatant(armed).unwrap()));
    }

    #[test]
    fn peaceful_empires_have_no_targets() {
        let (catalog, design) = armed_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        universe.add_craft(
            loc,
            CraftRecord::new("A", EmpireId::new(1), design).with_meter(MeterKind::Structure, 10.0),
        );
        universe.add_craft(
            loc,
            CraftRecord::new("B", EmpireId::new(2), design).with_meter(MeterKind::Structure, 10.0),
        );
        let diplomacy = DiplomacyTable::new();
        let ctx = context(&universe, &catalog, &diplomacy, loc);
        let set = WorkingSet::recompute(&ctx, &diplomacy);

        assert!(!set.battle_live(&ctx));
        for info in set.per_empire.values() {
            assert!(info.target_ids.is_empty());
        }
    }

    #[test]
    fn war_makes_visible_enemies_targetable() {
        let (catalog, design) = armed_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let a = universe.add_craft(
            loc,
            CraftRecord::new("A", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        let b = universe.add_craft(
            loc,
            CraftRecord::new("B", EmpireId::new(2), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        let mut diplomacy = DiplomacyTable::new();
        diplomacy.set_status(EmpireId::new(1), EmpireId::new(2), DiplomaticStatus::War);
        let ctx = context(&universe, &catalog, &diplomacy, loc);
        let set = WorkingSet::recompute(&ctx, &diplomacy);

        assert!(set.battle_live(&ctx));
        assert!(set.per_empire[&EmpireId::new(1)].target_ids.contains(&b));
        assert!(set.per_empire[&EmpireId::new(2)].target_ids.contains(&a));
    }

    #[test]
    fn monster_targets_craft_by_detection_threshold() {
        let (catalog, design) = armed_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        universe.add_craft(
            loc,
            CraftRecord::new("Beast", EmpireId::NEUTRAL, design)
                .with_meter(MeterKind::Structure, 30.0)
                .with_meter(MeterKind::Detection, 10.0),
        );
        let sneaky = universe.add_craft(
            loc,
            CraftRecord::new("Ghost", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 10.0)
                .with_meter(MeterKind::Stealth, 20.0),
        );
        let loud = universe.add_craft(
            loc,
            CraftRecord::new("Barge", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 10.0)
                .with_meter(MeterKind::Stealth, 5.0),
        );
        let diplomacy = DiplomacyTable::new();
        let ctx = context(&universe, &catalog, &diplomacy, loc);
        let set = WorkingSet::recompute(&ctx, &diplomacy);

        let monster_targets = &set.per_empire[&EmpireId::NEUTRAL].target_ids;
        assert!(!monster_targets.contains(&sneaky));
        assert!(monster_targets.contains(&loud));
    }

    #[test]
    fn engagement_makes_minimally_visible_attacker_targetable() {
        let (catalog, design) = armed_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let lurker = universe.add_craft(
            loc,
            CraftRecord::new("Lurker", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 10.0),
        );
        universe.add_craft(
            loc,
            CraftRecord::new("Prey", EmpireId::new(2), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        let mut diplomacy = DiplomacyTable::new();
        diplomacy.set_status(EmpireId::new(1), EmpireId::new(2), DiplomaticStatus::War);
        let mut ctx = context(&universe, &catalog, &diplomacy, loc);

        // Not aggressive and only minimally visible: not yet targetable.
        ctx.reveal(EmpireId::new(2), lurker, Visibility::Basic);
        let target = ctx.combatant(lurker).unwrap().clone();
        assert!(!targetable_by(&ctx, EmpireId::new(2), &target, &diplomacy));

        // After it fires on empire 2, it is.
        ctx.note_engaged(EmpireId::new(2), lurker);
        assert!(targetable_by(&ctx, EmpireId::new(2), &target, &diplomacy));
    }

    #[test]
    fn destroyed_fighter_is_dropped_on_recompute() {
        use crate::combatant::FighterState;

        let (catalog, design) = armed_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let carrier = universe.add_craft(
            loc,
            CraftRecord::new("Carrier", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        universe.add_craft(
            loc,
            CraftRecord::new("Hunter", EmpireId::new(2), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        let mut diplomacy = DiplomacyTable::new();
        diplomacy.set_status(EmpireId::new(1), EmpireId::new(2), DiplomaticStatus::War);
        let mut ctx = context(&universe, &catalog, &diplomacy, loc);

        let fighter = ctx.allocate_fighter_id();
        ctx.insert_combatant(Combatant::new(
            fighter,
            CombatantInner::Fighter(FighterState::new(
                EmpireId::new(1),
                carrier,
                "Bay".to_string(),
                2.0,
                None,
                None,
            )),
        ));

        let before = WorkingSet::recompute(&ctx, &diplomacy);
        assert!(before.valid_targets.contains(&fighter));
        assert!(before.per_empire[&EmpireId::new(2)].target_ids.contains(&fighter));

        ctx.combatant_mut(fighter)
            .unwrap()
            .as_fighter_mut()
            .unwrap()
            .destroyed = true;
        let after = WorkingSet::recompute(&ctx, &diplomacy);
        assert!(!after.valid_targets.contains(&fighter));
        assert!(!after.valid_attackers.contains(&fighter));
        assert!(!after.per_empire[&EmpireId::new(2)].target_ids.contains(&fighter));
    }

    #[test]
    fn remove_drops_combatant_from_every_set() {
        let (catalog, design) = armed_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let a = universe.add_craft(
            loc,
            CraftRecord::new("A", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        universe.add_craft(
            loc,
            CraftRecord::new("B", EmpireId::new(2), design)
                .with_meter(MeterKind::Structure, 10.0)
                .aggressive(),
        );
        let mut diplomacy = DiplomacyTable::new();
        diplomacy.set_status(EmpireId::new(1), EmpireId::new(2), DiplomaticStatus::War);
        let ctx = context(&universe, &catalog, &diplomacy, loc);
        let mut set = WorkingSet::recompute(&ctx, &diplomacy);

        set.remove(a);
        assert!(!set.valid_attackers.contains(&a));
        assert!(!set.valid_targets.contains(&a));
        assert!(!set.per_empire[&EmpireId::new(2)].target_ids.contains(&a));
    }
}
