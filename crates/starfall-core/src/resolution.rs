//! Attack resolution: applying one shot to one target.
//!
//! The dispatch is over (attacker kind, target kind). Two pairings are
//! illegal and reported as errors for the scheduler to log and skip:
//! stations never attack stations, and fighters never attack stations.
//!
//! Damage against craft is `max(0, power - shield)` applied to structure.
//! Damage against stations peels through shield, then defense, then
//! construction, each gauge absorbing what it can. Fighters die to any
//! positive damage. Fighter shots ignore the target craft's shield.

use crate::battle::BattleContext;
use crate::combatant::CombatantKind;
use crate::error::CombatError;
use crate::events::WeaponFire;
use verse::{MeterKind, ObjectId};

/// Resolves one shot from `attacker` against `target`, mutating the
/// target's gauges in the battle context.
///
/// Returns `Ok(None)` for zero-power shots, which have no effect and
/// produce no fire record.
///
/// # Errors
///
/// [`CombatError::MissingEntity`] if either id is unknown,
/// [`CombatError::IllegalPairing`] for forbidden kind pairings, and
/// [`CombatError::MissingGauge`] if a target craft has no structure meter.
pub fn resolve_attack(
    ctx: &mut BattleContext,
    attacker_id: ObjectId,
    weapon: &str,
    power: f32,
    target_id: ObjectId,
) -> Result<Option<WeaponFire>, CombatError> {
    let attacker_kind = ctx
        .combatant(attacker_id)
        .ok_or(CombatError::MissingEntity(attacker_id))?
        .kind();
    let target_kind = ctx
        .combatant(target_id)
        .ok_or(CombatError::MissingEntity(target_id))?
        .kind();

    let forbidden = matches!(
        (attacker_kind, target_kind),
        (CombatantKind::Station | CombatantKind::Fighter, CombatantKind::Station)
    );
    if forbidden {
        return Err(CombatError::IllegalPairing {
            attacker: attacker_id,
            target: target_id,
        });
    }

    if power <= 0.0 {
        return Ok(None);
    }

    let fire = match target_kind {
        CombatantKind::Craft => {
            resolve_against_craft(ctx, attacker_id, attacker_kind, weapon, power, target_id)?
        }
        CombatantKind::Station => resolve_against_station(ctx, attacker_id, weapon, power, target_id),
        CombatantKind::Fighter => resolve_against_fighter(ctx, attacker_id, weapon, power, target_id),
    };
    Ok(Some(fire))
}

fn resolve_against_craft(
    ctx: &mut BattleContext,
    attacker_id: ObjectId,
    attacker_kind: CombatantKind,
    weapon: &str,
    power: f32,
    target_id: ObjectId,
) -> Result<WeaponFire, CombatError> {
    // target_id was resolved by the caller
    let target = ctx
        .combatant_mut(target_id)
        .ok_or(CombatError::MissingEntity(target_id))?;

    // Fighter weapons slip past craft shields entirely.
    let shield = if attacker_kind == CombatantKind::Fighter {
        0.0
    } else {
        target.current(MeterKind::Shield)
    };
    let shield_absorbed = power.min(shield);
    let damage = (power - shield).max(0.0);

    let structure = target
        .meter_mut(MeterKind::Structure)
        .ok_or(CombatError::MissingGauge(target_id, MeterKind::Structure))?;
    structure.add(-damage);

    if damage > 0.0 {
        ctx.mark_damaged(target_id);
    }
    Ok(WeaponFire {
        attacker: attacker_id,
        target: target_id,
        weapon: weapon.to_string(),
        power,
        shield_absorbed,
        damage,
    })
}

fn resolve_against_station(
    ctx: &mut BattleContext,
    attacker_id: ObjectId,
    weapon: &str,
    power: f32,
    target_id: ObjectId,
) -> WeaponFire {
    let mut remaining = power;
    let mut shield_absorbed = 0.0;
    let mut damage = 0.0;

    if let Some(target) = ctx.combatant_mut(target_id) {
        if let Some(shield) = target.meter_mut(MeterKind::Shield) {
            shield_absorbed = shield.drain(remaining);
            remaining -= shield_absorbed;
        }
        if let Some(defense) = target.meter_mut(MeterKind::Defense) {
            let drained = defense.drain(remaining);
            remaining -= drained;
            damage += drained;
        }
        if let Some(construction) = target.meter_mut(MeterKind::Construction) {
            damage += construction.drain(remaining);
        }
    }

    // Any positive-power hit counts as damage for incapacitation purposes,
    // even one fully absorbed by shields.
    ctx.mark_damaged(target_id);

    WeaponFire {
        attacker: attacker_id,
        target: target_id,
        weapon: weapon.to_string(),
        power,
        shield_absorbed,
        damage,
    }
}

fn resolve_against_fighter(
    ctx: &mut BattleContext,
    attacker_id: ObjectId,
    weapon: &str,
    power: f32,
    target_id: ObjectId,
) -> WeaponFire {
    if let Some(fighter) = ctx
        .combatant_mut(target_id)
        .and_then(crate::combatant::Combatant::as_fighter_mut)
    {
        fighter.destroyed = true;
    }
    ctx.mark_damaged(target_id);

    WeaponFire {
        attacker: attacker_id,
        target: target_id,
        weapon: weapon.to_string(),
        power,
        shield_absorbed: 0.0,
        damage: power,
    }
}
