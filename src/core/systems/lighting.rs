use crate::core::standards::StandardsTables;
use crate::core::systems::BuildingContext;
use crate::core::units::watt_hours_to_mj;
use crate::input::LightingSystem;

/// Annual primary energy of lighting, in MJ/year, over the building type's operating hours.
pub fn lighting_energy_mj(
    system: &LightingSystem,
    building: &BuildingContext,
    tables: &StandardsTables,
) -> f64 {
    let power_density = system
        .power_density
        .unwrap_or(tables.default_lighting_power_density);
    let annual_hours = tables.operating_profile(building.building_type).annual_hours;

    watt_hours_to_mj(power_density * building.floor_area * annual_hours)
}
