use crate::core::standards::StandardsTables;
use crate::core::systems::BuildingContext;
use crate::core::units::watt_hours_to_mj;
use crate::input::VentilationSystem;

/// Annual primary energy of a ventilation system's fans, in MJ/year.
///
/// Airflow defaults from the floor area, and fan power defaults from the airflow. Heat
/// exchange credits a fraction of its efficiency as a reduction in fan energy.
pub fn ventilation_energy_mj(
    system: &VentilationSystem,
    building: &BuildingContext,
    tables: &StandardsTables,
) -> f64 {
    let model = &tables.ventilation_model;
    let airflow = system
        .air_volume
        .unwrap_or(building.floor_area * model.airflow_m3h_per_m2);
    let fan_power_w = system
        .power_consumption
        .unwrap_or(airflow * model.fan_power_w_per_m3h);
    let annual_hours = tables.operating_profile(building.building_type).annual_hours;
    let recovery_factor =
        1. - system.heat_exchange_efficiency.unwrap_or(0.) * model.heat_recovery_reduction;

    watt_hours_to_mj(fan_power_w * annual_hours * recovery_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standards::{BuildingType, ClimateZone};
    use approx::assert_relative_eq;
    use rstest::*;

    fn building(building_type: BuildingType) -> BuildingContext {
        BuildingContext {
            building_type,
            zone: ClimateZone::new(6).unwrap(),
            floor_area: 1000.,
        }
    }

    fn ventilation(
        air_volume: Option<f64>,
        power_consumption: Option<f64>,
        heat_exchange_efficiency: Option<f64>,
    ) -> VentilationSystem {
        VentilationSystem {
            system_type: "balanced".into(),
            air_volume,
            power_consumption,
            heat_exchange_efficiency,
        }
    }

    #[rstest]
    #[case(ventilation(None, None, None), BuildingType::Office, 2_227.5)]
    #[case(ventilation(None, None, Some(0.5)), BuildingType::Office, 1_893.375)]
    #[case(ventilation(Some(2000.), None, None), BuildingType::Office, 2_970.)]
    #[case(ventilation(Some(2000.), Some(100.), None), BuildingType::Hospital, 3_153.6)]
    #[case(ventilation(None, None, None), BuildingType::Restaurant, 2_956.5)]
    fn should_calculate_fan_energy(
        #[case] system: VentilationSystem,
        #[case] building_type: BuildingType,
        #[case] expected: f64,
    ) {
        assert_relative_eq!(
            ventilation_energy_mj(&system, &building(building_type), &StandardsTables::default()),
            expected,
            max_relative = 1e-12
        );
    }
}
