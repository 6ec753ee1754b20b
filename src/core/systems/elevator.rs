use crate::core::standards::StandardsTables;
use crate::core::systems::BuildingContext;

/// Annual primary energy of vertical transport, in MJ/year. Residential buildings are
/// taken to have none.
pub fn elevator_energy_mj(building: &BuildingContext, tables: &StandardsTables) -> f64 {
    if building.building_type.is_residential() {
        0.
    } else {
        tables.elevator_intensity * building.floor_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standards::{BuildingType, ClimateZone};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(BuildingType::Office, 28_000.)]
    #[case(BuildingType::Factory, 28_000.)]
    #[case(BuildingType::ResidentialCollective, 0.)]
    fn should_only_apply_elevator_energy_to_non_residential(
        #[case] building_type: BuildingType,
        #[case] expected: f64,
    ) {
        let building = BuildingContext {
            building_type,
            zone: ClimateZone::new(3).unwrap(),
            floor_area: 2000.,
        };
        assert_eq!(
            elevator_energy_mj(&building, &StandardsTables::default()),
            expected
        );
    }
}
