use crate::core::material_properties::WATER;
use crate::core::standards::{EndUse, StandardsTables};
use crate::core::systems::{resolve_efficiency, BuildingContext};
use crate::input::HotWaterSystem;
use crate::notes::Notes;

/// Annual primary energy of a hot water system, in MJ/year.
///
/// The daily volume drawn follows the building type's demand per unit floor area, and is
/// heated through a fixed temperature rise.
pub fn hot_water_energy_mj(
    system: &HotWaterSystem,
    building: &BuildingContext,
    tables: &StandardsTables,
    notes: &mut Notes,
) -> f64 {
    let litres_per_day = tables
        .operating_profile(building.building_type)
        .hot_water_litres_per_m2_day
        * building.floor_area;
    let thermal_load_mj =
        WATER.annual_energy_to_heat_mj(litres_per_day, tables.hot_water_temperature_rise);
    let efficiency = resolve_efficiency(
        system.efficiency,
        &tables.default_efficiencies.hot_water,
        EndUse::HotWater,
        &system.system_type,
        notes,
    );

    thermal_load_mj / efficiency
}
