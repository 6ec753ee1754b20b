use crate::core::standards::{EndUse, StandardsTables};
use crate::core::systems::{degree_day_energy_mj, resolve_efficiency, BuildingContext};
use crate::input::SpaceConditioningSystem;
use crate::notes::Notes;

/// Annual primary energy of a cooling system, in MJ/year, from the zone's cooling degree days.
pub fn cooling_energy_mj(
    system: &SpaceConditioningSystem,
    building: &BuildingContext,
    tables: &StandardsTables,
    notes: &mut Notes,
) -> f64 {
    let cop = resolve_efficiency(
        system.efficiency,
        &tables.default_efficiencies.cooling,
        EndUse::Cooling,
        &system.system_type,
        notes,
    );

    degree_day_energy_mj(
        &tables.cooling_model,
        tables.cooling_degree_days(building.zone),
        building.floor_area,
        cop,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standards::{BuildingType, ClimateZone};
    use approx::assert_relative_eq;
    use rstest::*;

    fn chiller(efficiency: Option<f64>) -> SpaceConditioningSystem {
        SpaceConditioningSystem {
            system_type: "chiller".into(),
            rated_capacity: Some(300.),
            efficiency,
            control_method: Some("inverter".into()),
        }
    }

    fn building_in_zone(zone: u8) -> BuildingContext {
        BuildingContext {
            building_type: BuildingType::Hotel,
            zone: ClimateZone::new(zone).unwrap(),
            floor_area: 1000.,
        }
    }

    #[rstest]
    fn should_calculate_cooling_energy_with_default_chiller_cop() {
        let energy = cooling_energy_mj(
            &chiller(None),
            &building_in_zone(6),
            &StandardsTables::default(),
            &mut Notes::new(),
        );

        // 1336 hours at 24000W over an operational efficiency of 4.5 * 0.8
        assert_relative_eq!(energy, 24000. * 1336. / 3.6 / 1000. * 3.6, max_relative = 1e-12);
    }

    #[rstest]
    fn should_increase_cooling_energy_in_warmer_zones() {
        let tables = StandardsTables::default();
        let energies = ClimateZone::all()
            .map(|zone| {
                cooling_energy_mj(
                    &chiller(Some(5.0)),
                    &building_in_zone(zone.number()),
                    &tables,
                    &mut Notes::new(),
                )
            })
            .collect::<Vec<_>>();

        assert!(energies.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
