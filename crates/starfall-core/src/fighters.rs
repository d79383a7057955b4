//! Fighter lifecycle: launch during a bout, recovery after the battle.
//!
//! Fighters are battle-scoped combatants with synthetic negative ids.
//! Launching drains hangar stored counts in hull order; recovery at the
//! end of the battle returns survivors to their hangar part, clipped to
//! capacity. Fighters whose carrier died are lost.

use std::collections::BTreeMap;

use crate::battle::BattleContext;
use crate::classifier::{attackable_by, WorkingSet};
use crate::combatant::{Combatant, CombatantInner, FighterState};
use crate::events::BattleEvent;
use verse::{DiplomacyTable, ObjectId, Visibility};

/// Launches up to `requested` fighters from a carrier, draining hangars
/// in hull order.
///
/// Each launched fighter is inserted into the battle, made visible to
/// every participating empire, and folded into the working sets so it can
/// act and be targeted in later bouts of the same battle. Returns the
/// number actually launched; a [`BattleEvent::FightersLaunched`] event is
/// recorded when that is nonzero.
pub fn launch_fighters(
    ctx: &mut BattleContext,
    set: &mut WorkingSet,
    diplomacy: &DiplomacyTable,
    bout: u32,
    carrier_id: ObjectId,
    requested: u32,
) -> u32 {
    let Some(craft) = ctx.combatant_mut(carrier_id).and_then(Combatant::as_craft_mut) else {
        return 0;
    };
    let owner = craft.owner;
    let species = craft.species.clone();

    // Drain hangars in hull order, recording what each contributes.
    let mut plan = Vec::new();
    let mut remaining = requested;
    for hangar in &mut craft.hangars {
        if remaining == 0 {
            break;
        }
        let taken = hangar.stored.min(remaining);
        if taken > 0 {
            hangar.stored -= taken;
            remaining -= taken;
            plan.push((
                hangar.part.clone(),
                taken,
                hangar.fighter_power,
                hangar.targeting,
            ));
        }
    }

    let mut launched = Vec::new();
    for (part, count, power, targeting) in plan {
        for _ in 0..count {
            let id = ctx.allocate_fighter_id();
            let state = FighterState::new(
                owner,
                carrier_id,
                part.clone(),
                power,
                species.clone(),
                targeting,
            );
            ctx.insert_combatant(Combatant::new(id, CombatantInner::Fighter(state)));
            launched.push(id);
        }
    }

    let empires: Vec<_> = ctx.empires().iter().copied().collect();
    for &id in &launched {
        for &empire in &empires {
            ctx.reveal(empire, id, Visibility::Partial);
        }
    }
    for &id in &launched {
        let Some(fighter) = ctx.combatant(id) else {
            continue;
        };
        if fighter.as_fighter().is_some_and(|f| f.power > 0.0) {
            set.valid_attackers.insert(id);
            if let Some(info) = set.per_empire.get_mut(&owner) {
                info.attacker_ids.insert(id);
            }
        }
        set.valid_targets.insert(id);
        for &empire in &empires {
            if empire != owner
                && attackable_by(ctx, empire, fighter, diplomacy, set.monster_detection)
            {
                if let Some(info) = set.per_empire.get_mut(&empire) {
                    info.target_ids.insert(id);
                }
            }
        }
    }

    let count = u32::try_from(launched.len()).unwrap_or(u32::MAX);
    if count > 0 {
        ctx.record_event(BattleEvent::FightersLaunched {
            bout,
            carrier: carrier_id,
            owner,
            count: i32::try_from(count).unwrap_or(i32::MAX),
        });
    }
    count
}

/// Returns surviving fighters to their carriers after the final bout.
///
/// Survivors whose carrier is still alive go back into the hangar part
/// they launched from, clipped to its capacity; the rest are lost along
/// with every fighter of a destroyed carrier. One aggregate
/// [`BattleEvent::FightersLaunched`] event with a negative count is
/// recorded per carrier that recovered anything.
pub fn recover_fighters(ctx: &mut BattleContext, bout: u32) {
    // (carrier, hangar part) -> surviving fighter count
    let mut survivors: BTreeMap<(ObjectId, String), u32> = BTreeMap::new();
    for combatant in ctx.combatants() {
        if let CombatantInner::Fighter(state) = combatant.inner() {
            if state.destroyed || ctx.is_destroyed(combatant.id()) {
                continue;
            }
            if ctx.is_destroyed(state.carrier) || ctx.combatant(state.carrier).is_none() {
                continue;
            }
            *survivors
                .entry((state.carrier, state.launched_from.clone()))
                .or_default() += 1;
        }
    }

    let mut recovered_per_carrier: BTreeMap<ObjectId, u32> = BTreeMap::new();
    for ((carrier_id, part), count) in survivors {
        let Some(craft) = ctx.combatant_mut(carrier_id).and_then(Combatant::as_craft_mut)
        else {
            continue;
        };
        if let Some(hangar) = craft.hangars.iter_mut().find(|h| h.part == part) {
            let room = hangar.capacity.saturating_sub(hangar.stored);
            let restored = count.min(room);
            hangar.stored += restored;
            if restored > 0 {
                *recovered_per_carrier.entry(carrier_id).or_default() += restored;
            }
        }
    }

    for (carrier, count) in recovered_per_carrier {
        let owner = ctx
            .combatant(carrier)
            .map_or(verse::EmpireId::NEUTRAL, Combatant::owner);
        ctx.record_event(BattleEvent::FightersLaunched {
            bout,
            carrier,
            owner,
            count: -i32::try_from(count).unwrap_or(i32::MAX),
        });
    }
}

#[cfg(test)]
mod fighters_tests {
    use super::*;
    use verse::{
        Catalog, CraftRecord, Design, DesignId, DiplomaticStatus, EmpireId, MeterKind, Part,
        PartClass, Universe, VisibilityMap,
    };

    fn carrier_catalog() -> (Catalog, DesignId) {
        let mut catalog = Catalog::new();
        catalog.add_part(Part::new("Bay", PartClass::FighterBay { launch_rate: 2 }));
        catalog.add_part(Part::new(
            "Hangar",
            PartClass::FighterHangar {
                capacity: 4,
                fighter_power: 3.0,
            },
        ));
        let id = catalog.add_design(Design::new(
            "Carrier",
            vec!["Bay".to_string(), "Hangar".to_string()],
        ));
        (catalog, id)
    }

    fn battle() -> (BattleContext, DiplomacyTable, ObjectId, ObjectId) {
        let (catalog, design) = carrier_catalog();
        let mut universe = Universe::new();
        let loc = universe.add_location("Alpha");
        let carrier = universe.add_craft(
            loc,
            CraftRecord::new("Carrier", EmpireId::new(1), design)
                .with_meter(MeterKind::Structure, 20.0)
                .with_stored_fighters("Hangar", 4)
                .aggressive(),
        );
        let enemy = universe.add_craft(
            loc,
            CraftRecord::new("Enemy", EmpireId::new(2), DesignId::new(99))
                .with_meter(MeterKind::Structure, 20.0)
                .aggressive(),
        );
        let mut diplomacy = DiplomacyTable::new();
        diplomacy.set_status(EmpireId::new(1), EmpireId::new(2), DiplomaticStatus::War);
        let ctx = BattleContext::new(
            &universe,
            &catalog,
            &diplomacy,
            &VisibilityMap::new(),
            loc,
            1,
        );
        (ctx, diplomacy, carrier, enemy)
    }

    #[test]
    fn launch_drains_hangar_and_inserts_fighters() {
        let (mut ctx, diplomacy, carrier, _) = battle();
        let mut set = WorkingSet::recompute(&ctx, &diplomacy);

        let launched = launch_fighters(&mut ctx, &mut set, &diplomacy, 1, carrier, 2);
        assert_eq!(launched, 2);
        assert_eq!(
            ctx.combatant(carrier)
                .unwrap()
                .as_craft()
                .unwrap()
                .stored_fighter_total(),
            2
        );
        assert!(ctx.combatant(ObjectId::new(-1)).is_some());
        assert!(ctx.combatant(ObjectId::new(-2)).is_some());
        assert!(set.valid_attackers.contains(&ObjectId::new(-1)));
        // The enemy can target the new fighters immediately.
        assert!(set.per_empire[&EmpireId::new(2)]
            .target_ids
            .contains(&ObjectId::new(-1)));
    }

    #[test]
    fn launch_is_clipped_to_stored_count() {
        let (mut ctx, diplomacy, carrier, _) = battle();
        let mut set = WorkingSet::recompute(&ctx, &diplomacy);
        let launched = launch_fighters(&mut ctx, &mut set, &diplomacy, 1, carrier, 99);
        assert_eq!(launched, 4);
    }

    #[test]
    fn recovery_returns_survivors_to_the_hangar() {
        let (mut ctx, diplomacy, carrier, _) = battle();
        let mut set = WorkingSet::recompute(&ctx, &diplomacy);
        launch_fighters(&mut ctx, &mut set, &diplomacy, 1, carrier, 2);

        // One fighter dies before recovery.
        ctx.combatant_mut(ObjectId::new(-1))
            .unwrap()
            .as_fighter_mut()
            .unwrap()
            .destroyed = true;

        recover_fighters(&mut ctx, 4);
        assert_eq!(
            ctx.combatant(carrier)
                .unwrap()
                .as_craft()
                .unwrap()
                .stored_fighter_total(),
            3
        );
        let recovery = ctx
            .events()
            .iter()
            .rev()
            .find(|e| matches!(e, BattleEvent::FightersLaunched { count, .. } if *count < 0));
        assert!(
            matches!(recovery, Some(BattleEvent::FightersLaunched { count: -1, .. })),
            "expected a single-fighter recovery event"
        );
    }

    #[test]
    fn fighters_of_a_dead_carrier_are_lost() {
        let (mut ctx, diplomacy, carrier, _) = battle();
        let mut set = WorkingSet::recompute(&ctx, &diplomacy);
        launch_fighters(&mut ctx, &mut set, &diplomacy, 1, carrier, 2);

        ctx.note_destroyed(carrier);
        recover_fighters(&mut ctx, 4);
        assert!(!ctx
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::FightersLaunched { count, .. } if *count < 0)));
    }
}
