//! Factories for battle test scenarios.

use verse::{
    Catalog, CraftRecord, Design, DesignId, DiplomacyTable, DiplomaticStatus, EmpireId, GameRules,
    LocationId, MeterKind, Part, PartClass, StationRecord, TargetCondition, TargetScope, Universe,
    VisibilityMap,
};

use crate::battle::BattleContext;
use crate::scheduler::auto_resolve;

/// Design handles returned by [`standard_catalog`].
pub struct Designs {
    /// One laser, power 10.
    pub gunship: DesignId,
    /// Two mass driver shots per bout, power 6 each.
    pub cruiser: DesignId,
    /// One bay (rate 2) and one hangar (capacity 4, fighter power 3).
    pub carrier: DesignId,
    /// Anti-fighter weapon, power 2, prefers fighters.
    pub escort: DesignId,
    /// No parts at all.
    pub freighter: DesignId,
}

/// Builds the part/design catalog shared by the battle tests.
pub fn standard_catalog() -> (Catalog, Designs) {
    let mut catalog = Catalog::new();
    catalog.add_part(Part::new(
        "Laser",
        PartClass::DirectWeapon {
            power: 10.0,
            shots: 1,
        },
    ));
    catalog.add_part(Part::new(
        "Mass Driver",
        PartClass::DirectWeapon {
            power: 6.0,
            shots: 2,
        },
    ));
    catalog.add_part(
        Part::new(
            "Flak Battery",
            PartClass::DirectWeapon {
                power: 2.0,
                shots: 2,
            },
        )
        .with_targeting(TargetCondition::new(TargetScope::FIGHTER)),
    );
    catalog.add_part(Part::new(
        "Drone Bay",
        PartClass::FighterBay { launch_rate: 2 },
    ));
    catalog.add_part(
        Part::new(
            "Drone Hangar",
            PartClass::FighterHangar {
                capacity: 4,
                fighter_power: 3.0,
            },
        )
        .with_targeting(TargetCondition::new(TargetScope::CRAFT | TargetScope::FIGHTER)),
    );

    let designs = Designs {
        gunship: catalog.add_design(Design::new("Gunship", vec!["Laser".to_string()])),
        cruiser: catalog.add_design(Design::new("Cruiser", vec!["Mass Driver".to_string()])),
        carrier: catalog.add_design(Design::new(
            "Carrier",
            vec!["Drone Bay".to_string(), "Drone Hangar".to_string()],
        )),
        escort: catalog.add_design(Design::new("Escort", vec!["Flak Battery".to_string()])),
        freighter: catalog.add_design(Design::new("Freighter", vec![])),
    };
    (catalog, designs)
}

/// A diplomacy table with empires 1 and 2 at war.
pub fn two_empires_at_war() -> DiplomacyTable {
    let mut diplomacy = DiplomacyTable::new();
    diplomacy.set_status(EmpireId::new(1), EmpireId::new(2), DiplomaticStatus::War);
    diplomacy
}

/// An aggressive armed craft with the given design and structure.
pub fn warship(name: &str, owner: i32, design: DesignId, structure: f32) -> CraftRecord {
    CraftRecord::new(name, EmpireId::new(owner), design)
        .with_meter(MeterKind::Structure, structure)
        .aggressive()
}

/// A station with the classic layered gauges and no weapon.
pub fn layered_station(name: &str, owner: i32) -> StationRecord {
    StationRecord::new(name, EmpireId::new(owner))
        .with_meter(MeterKind::Shield, 5.0)
        .with_meter(MeterKind::Defense, 5.0)
        .with_meter(MeterKind::Construction, 5.0)
}

/// Resolves one battle at `location` with default rules and a fresh
/// visibility oracle.
pub fn resolve(
    universe: &Universe,
    catalog: &Catalog,
    diplomacy: &DiplomacyTable,
    location: LocationId,
) -> BattleContext {
    auto_resolve(
        universe,
        catalog,
        diplomacy,
        &VisibilityMap::new(),
        &GameRules::default(),
        location,
        1,
    )
}
