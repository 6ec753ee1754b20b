use crate::core::standards::{EndUse, StandardsTables};
use crate::core::systems::{degree_day_energy_mj, resolve_efficiency, BuildingContext};
use crate::input::SpaceConditioningSystem;
use crate::notes::Notes;

/// Annual primary energy of a heating system, in MJ/year, from the zone's heating degree days.
pub fn heating_energy_mj(
    system: &SpaceConditioningSystem,
    building: &BuildingContext,
    tables: &StandardsTables,
    notes: &mut Notes,
) -> f64 {
    let cop = resolve_efficiency(
        system.efficiency,
        &tables.default_efficiencies.heating,
        EndUse::Heating,
        &system.system_type,
        notes,
    );

    degree_day_energy_mj(
        &tables.heating_model,
        tables.heating_degree_days(building.zone),
        building.floor_area,
        cop,
    )
}
