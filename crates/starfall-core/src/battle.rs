//! The battle context: everything one battle needs, isolated from the
//! persistent universe.
//!
//! A [`BattleContext`] is built once per (location, turn) pair. It snapshots
//! every object at the location into mutable [`Combatant`]s, computes a
//! battle-local visibility view, and accumulates the event log. Nothing in
//! the persistent universe changes while the battle runs; results are
//! written back in one step by [`BattleContext::apply_to_universe`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::combatant::{Combatant, CombatantInner};
use crate::events::{BattleEvent, StealthReport};
use verse::{
    Catalog, DiplomacyTable, EmpireId, LocationId, ObjectId, Universe, Visibility, VisibilityMap,
};

/// Battle-local state for one combat at one location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleContext {
    location: LocationId,
    turn: u32,
    combatants: BTreeMap<ObjectId, Combatant>,
    empires: BTreeSet<EmpireId>,
    visibility: VisibilityMap,
    /// Attackers each empire has been fired on by. Being fired on makes an
    /// attacker targetable at minimal visibility.
    engaged: BTreeMap<EmpireId, BTreeSet<ObjectId>>,
    damaged: BTreeSet<ObjectId>,
    destroyed: BTreeSet<ObjectId>,
    /// Per-empire record of combatants each empire knows were destroyed.
    known_destroyed: BTreeMap<EmpireId, BTreeSet<ObjectId>>,
    events: Vec<BattleEvent>,
    next_fighter_id: i32,
}

impl BattleContext {
    /// Builds the context for a battle at `location` on `turn`.
    ///
    /// Snapshots every object present, collects the participating empires
    /// from their owners, and computes the initial visibility view: each
    /// empire sees its own objects fully, sees others at whatever the
    /// universe-level oracle grants, and sees aggressive enemy craft at
    /// minimal visibility regardless. A missing location yields an empty
    /// context that concludes immediately.
    #[must_use]
    pub fn new(
        universe: &Universe,
        catalog: &Catalog,
        diplomacy: &DiplomacyTable,
        oracle: &VisibilityMap,
        location: LocationId,
        turn: u32,
    ) -> Self {
        let mut combatants = BTreeMap::new();
        let mut empires = BTreeSet::new();
        for (id, object) in universe.objects_at(location) {
            empires.insert(object.owner());
            combatants.insert(id, Combatant::from_object(id, object, catalog));
        }

        let mut visibility = VisibilityMap::new();
        for &empire in &empires {
            for (&id, combatant) in &combatants {
                let mut level = oracle.visibility(empire, id);
                if combatant.owner() == empire {
                    level = Visibility::Full;
                } else if combatant.as_craft().is_some_and(|c| c.aggressive)
                    && diplomacy.at_war(empire, combatant.owner())
                    && level < Visibility::Basic
                {
                    level = Visibility::Basic;
                }
                visibility.set(empire, id, level);
            }
        }

        let mut ctx = Self {
            location,
            turn,
            combatants,
            empires,
            visibility,
            engaged: BTreeMap::new(),
            damaged: BTreeSet::new(),
            destroyed: BTreeSet::new(),
            known_destroyed: BTreeMap::new(),
            events: Vec::new(),
            next_fighter_id: -1,
        };
        if !ctx.combatants.is_empty() {
            let reports = ctx.initial_stealth_reports();
            ctx.record_event(BattleEvent::InitialStealth { reports });
        }
        ctx
    }

    fn initial_stealth_reports(&self) -> Vec<StealthReport> {
        self.empires
            .iter()
            .map(|&empire| StealthReport {
                empire,
                hidden: self
                    .combatants
                    .keys()
                    .copied()
                    .filter(|&id| self.visibility(empire, id) == Visibility::Hidden)
                    .collect(),
            })
            .collect()
    }

    /// Returns the battle's location.
    #[must_use]
    pub const fn location(&self) -> LocationId {
        self.location
    }

    /// Returns the game turn this battle occurs on.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns `true` if the context holds no combatants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Looks up a combatant by id.
    #[must_use]
    pub fn combatant(&self, id: ObjectId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Looks up a mutable combatant by id.
    pub fn combatant_mut(&mut self, id: ObjectId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// Iterates over all combatants in id order.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    /// Iterates over all combatant ids in order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.combatants.keys().copied()
    }

    /// Returns the participating empires.
    #[must_use]
    pub const fn empires(&self) -> &BTreeSet<EmpireId> {
        &self.empires
    }

    /// Returns the battle-local visibility of `object` to `empire`.
    #[must_use]
    pub fn visibility(&self, empire: EmpireId, object: ObjectId) -> Visibility {
        self.visibility.visibility(empire, object)
    }

    /// Raises battle-local visibility to at least `floor`; returns `true`
    /// if the level changed.
    pub fn reveal(&mut self, empire: EmpireId, object: ObjectId, floor: Visibility) -> bool {
        self.visibility.ensure_at_least(empire, object, floor)
    }

    /// Records that `attacker` has fired on `empire`'s forces; returns
    /// `true` the first time the pair is recorded.
    pub fn note_engaged(&mut self, empire: EmpireId, attacker: ObjectId) -> bool {
        self.engaged.entry(empire).or_default().insert(attacker)
    }

    /// Returns `true` if `attacker` has fired on `empire`'s forces.
    #[must_use]
    pub fn is_engaged(&self, empire: EmpireId, attacker: ObjectId) -> bool {
        self.engaged
            .get(&empire)
            .is_some_and(|set| set.contains(&attacker))
    }

    /// Marks a combatant as having taken damage this battle.
    pub fn mark_damaged(&mut self, id: ObjectId) {
        self.damaged.insert(id);
    }

    /// Returns `true` if the combatant has taken damage this battle.
    #[must_use]
    pub fn is_damaged(&self, id: ObjectId) -> bool {
        self.damaged.contains(&id)
    }

    /// Marks a combatant destroyed and informs every participating empire.
    pub fn note_destroyed(&mut self, id: ObjectId) {
        self.destroyed.insert(id);
        for &empire in &self.empires {
            self.known_destroyed.entry(empire).or_default().insert(id);
        }
    }

    /// Returns `true` if the combatant was destroyed.
    #[must_use]
    pub fn is_destroyed(&self, id: ObjectId) -> bool {
        self.destroyed.contains(&id)
    }

    /// Returns the combatants `empire` knows were destroyed.
    #[must_use]
    pub fn known_destroyed(&self, empire: EmpireId) -> Option<&BTreeSet<ObjectId>> {
        self.known_destroyed.get(&empire)
    }

    /// Allocates the next synthetic fighter id. Ids are negative and
    /// strictly decreasing, so they never collide with persistent ids.
    pub fn allocate_fighter_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_fighter_id);
        self.next_fighter_id -= 1;
        id
    }

    /// Inserts a battle-scoped combatant (a launched fighter).
    pub fn insert_combatant(&mut self, combatant: Combatant) {
        self.combatants.insert(combatant.id(), combatant);
    }

    /// Appends an event to the log.
    pub fn record_event(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Returns the ordered event log.
    #[must_use]
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Writes battle results back into the persistent universe and the
    /// universe-level visibility oracle.
    ///
    /// Destroyed craft are removed from the graph; surviving craft and
    /// stations get their meter values and stored fighter counts copied
    /// back. Fighters are battle-scoped and never persist. Visibility
    /// gained during the battle is merged upward, never lowered.
    pub fn apply_to_universe(&self, universe: &mut Universe, oracle: &mut VisibilityMap) {
        for (&id, combatant) in &self.combatants {
            match combatant.inner() {
                CombatantInner::Craft(state) => {
                    if self.destroyed.contains(&id) {
                        universe.remove_object(id);
                        continue;
                    }
                    if let Some(object) = universe.object_mut(id) {
                        for kind in state.meters().map(|(k, _)| k).collect::<Vec<_>>() {
                            if let (Some(from), Some(to)) =
                                (state.meter(kind), object.meter_mut(kind))
                            {
                                to.set_current(from.current());
                            }
                        }
                        if let Some(record) = object.as_craft_mut() {
                            for hangar in &state.hangars {
                                record.set_stored_fighters(hangar.part.clone(), hangar.stored);
                            }
                        }
                    }
                }
                CombatantInner::Station(state) => {
                    if let Some(object) = universe.object_mut(id) {
                        for kind in state.meters().map(|(k, _)| k).collect::<Vec<_>>() {
                            if let (Some(from), Some(to)) =
                                (state.meter(kind), object.meter_mut(kind))
                            {
                                to.set_current(from.current());
                            }
                        }
                    }
                }
                CombatantInner::Fighter(_) => {}
            }
        }

        for (empire, object, level) in self.visibility.iter() {
            if !object.is_synthetic() {
                oracle.ensure_at_least(empire, object, level);
            }
        }
    }
}
