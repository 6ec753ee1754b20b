use crate::core::standards::{
    BuildingType, ClimateZone, DegreeDayModel, EfficiencyDefaults, EndUse, StandardsTables,
};
use crate::core::units::{equivalent_hours_from_degree_days, watt_hours_to_mj};
use crate::input::SystemsInput;
use crate::notes::{Note, Notes};
use indexmap::IndexMap;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

pub mod cooling;
pub mod elevator;
pub mod heating;
pub mod hot_water;
pub mod lighting;
pub mod ventilation;

/// The building facts that every per-system estimate depends on.
#[derive(Clone, Copy, Debug)]
pub struct BuildingContext {
    pub building_type: BuildingType,
    pub zone: ClimateZone,
    /// m2
    pub floor_area: f64,
}

/// Annual primary energy of the designed building, by end use, in MJ/year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActualEnergy {
    pub by_use: IndexMap<EndUse, f64>,
    pub total: f64,
}

/// Use a declared efficiency, or look up a default for the system type and note that it
/// was substituted.
pub(crate) fn resolve_efficiency(
    declared: Option<f64>,
    defaults: &EfficiencyDefaults,
    end_use: EndUse,
    system_type: &str,
    notes: &mut Notes,
) -> f64 {
    declared.unwrap_or_else(|| {
        let efficiency = defaults.for_system_type(system_type);
        notes.push(Note::default_efficiency(
            &end_use.to_string(),
            system_type,
            efficiency,
        ));
        efficiency
    })
}

/// Annual energy, in MJ, of a system meeting a load estimated from degree days.
///
/// The degree days are turned into equivalent full-load hours over the model's design
/// temperature difference, the average load is the peak load scaled by the part load ratio,
/// and the rated efficiency is derated to an operational efficiency.
pub(crate) fn degree_day_energy_mj(
    model: &DegreeDayModel,
    degree_days: f64,
    floor_area: f64,
    rated_efficiency: f64,
) -> f64 {
    let annual_hours = equivalent_hours_from_degree_days(degree_days, model.design_delta_t);
    let average_load_w = floor_area * model.peak_load_w_per_m2 * model.part_load_ratio;
    let operational_efficiency = rated_efficiency * model.operational_derate;

    watt_hours_to_mj(average_load_w * annual_hours / operational_efficiency)
}

/// Estimate the annual primary energy of the designed building from its declared systems.
///
/// Absent systems contribute zero, but every end use is present in the breakdown. The
/// total is the sum of the breakdown.
pub fn estimate_actual_energy(
    systems: &SystemsInput,
    building: &BuildingContext,
    tables: &StandardsTables,
    notes: &mut Notes,
) -> ActualEnergy {
    let by_use: IndexMap<EndUse, f64> = EndUse::iter()
        .map(|end_use| {
            let energy = match end_use {
                EndUse::Heating => systems.heating.as_ref().map(|system| {
                    heating::heating_energy_mj(system, building, tables, notes)
                }),
                EndUse::Cooling => systems.cooling.as_ref().map(|system| {
                    cooling::cooling_energy_mj(system, building, tables, notes)
                }),
                EndUse::Ventilation => systems
                    .ventilation
                    .as_ref()
                    .map(|system| ventilation::ventilation_energy_mj(system, building, tables)),
                EndUse::HotWater => systems.hot_water.as_ref().map(|system| {
                    hot_water::hot_water_energy_mj(system, building, tables, notes)
                }),
                EndUse::Lighting => systems
                    .lighting
                    .as_ref()
                    .map(|system| lighting::lighting_energy_mj(system, building, tables)),
                EndUse::Elevator => Some(elevator::elevator_energy_mj(building, tables)),
            }
            .unwrap_or(0.);
            (end_use, energy)
        })
        .collect();

    let total = by_use.values().sum();
    debug!(?by_use, total, "estimated actual energy");

    ActualEnergy { by_use, total }
}
