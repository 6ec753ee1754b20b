use crate::core::standards::{BuildingType, ClimateZone, EndUse, RegionalCorrection, StandardsTables};
use crate::errors::CalculationError;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Standard (model building) annual primary energy for a building.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandardEnergy {
    /// MJ/year
    pub total: f64,
    /// MJ/year by end use
    pub by_use: IndexMap<EndUse, f64>,
    pub scale_factor: f64,
    pub zone_correction: RegionalCorrection,
    /// sum of the adjusted intensities, in MJ/m2/year
    pub intensity_total: f64,
}

/// Calculate the standard primary energy of a building using the model building method.
///
/// The base intensity of each end use is multiplied by the floor-area scale factor, and
/// heating and cooling are additionally multiplied by the zone's regional correction.
///
/// Arguments:
/// * `building_type` - must have a model building row in `tables`
/// * `zone` - climate zone of the building
/// * `floor_area` - total floor area, in m2
/// * `tables` - standards tables to draw intensities and corrections from
pub fn standard_energy(
    building_type: BuildingType,
    zone: ClimateZone,
    floor_area: f64,
    tables: &StandardsTables,
) -> Result<StandardEnergy, CalculationError> {
    let base_intensities = tables
        .model_building_intensities(building_type)
        .ok_or_else(|| CalculationError::NoModelBuilding(building_type.to_string()))?;
    let scale_factor = tables.scale_factor(building_type, floor_area);
    let zone_correction = tables.regional_correction(zone);

    let adjusted_intensities = base_intensities
        .iter()
        .map(|(end_use, base)| {
            let regional_factor = match end_use {
                EndUse::Heating => zone_correction.heating,
                EndUse::Cooling => zone_correction.cooling,
                _ => 1.,
            };
            (end_use, base * regional_factor * scale_factor)
        })
        .collect::<Vec<_>>();

    let intensity_total = adjusted_intensities.iter().map(|(_, i)| i).sum::<f64>();
    let by_use = adjusted_intensities
        .into_iter()
        .map(|(end_use, intensity)| (end_use, intensity * floor_area))
        .collect::<IndexMap<_, _>>();
    let total = intensity_total * floor_area;

    debug!(
        %building_type,
        %zone,
        scale_factor,
        intensity_total,
        total,
        "standard energy from model building"
    );

    Ok(StandardEnergy {
        total,
        by_use,
        scale_factor,
        zone_correction,
        intensity_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use strum::IntoEnumIterator;

    #[fixture]
    fn tables() -> StandardsTables {
        StandardsTables::default()
    }

    #[rstest]
    fn should_apply_regional_correction_to_heating_and_cooling_only(tables: StandardsTables) {
        let zone = ClimateZone::new(1).unwrap();
        let standard = standard_energy(BuildingType::Office, zone, 200., &tables).unwrap();

        assert_eq!(standard.scale_factor, 1.);
        assert_relative_eq!(standard.by_use[&EndUse::Heating], 38. * 2.38 * 200.);
        assert_relative_eq!(standard.by_use[&EndUse::Cooling], 38. * 0.66 * 200.);
        assert_relative_eq!(standard.by_use[&EndUse::Lighting], 95. * 200.);
        assert_relative_eq!(standard.by_use[&EndUse::Elevator], 14. * 200.);
    }

    #[rstest]
    fn should_apply_scale_factor_to_every_end_use(tables: StandardsTables) {
        let zone = ClimateZone::new(6).unwrap();
        let standard = standard_energy(BuildingType::Office, zone, 2000., &tables).unwrap();

        assert_eq!(standard.scale_factor, 0.9);
        assert_relative_eq!(standard.by_use[&EndUse::Ventilation], 28. * 0.9 * 2000.);
        assert_relative_eq!(standard.by_use[&EndUse::HotWater], 3. * 0.9 * 2000.);
        assert_relative_eq!(
            standard.intensity_total,
            (38. * 0.84 + 38. * 1.15 + 28. + 3. + 95. + 14.) * 0.9,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            standard.total,
            standard.by_use.values().sum::<f64>(),
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_not_scale_residential(tables: StandardsTables) {
        let zone = ClimateZone::new(4).unwrap();
        let standard =
            standard_energy(BuildingType::ResidentialCollective, zone, 20_000., &tables).unwrap();

        assert_eq!(standard.scale_factor, 1.);
        assert_relative_eq!(standard.by_use[&EndUse::HotWater], 105. * 20_000.);
    }

    #[rstest]
    fn should_fail_for_building_type_without_model_row(tables: StandardsTables) {
        let zone = ClimateZone::new(6).unwrap();
        assert_eq!(
            standard_energy(BuildingType::Restaurant, zone, 500., &tables),
            Err(CalculationError::NoModelBuilding("restaurant".into()))
        );
    }

    #[rstest]
    fn should_have_positive_standard_energy_for_every_tabulated_type_and_zone(
        tables: StandardsTables,
    ) {
        let tabulated = BuildingType::iter()
            .filter(|building_type| tables.model_building_intensities(*building_type).is_some());

        for building_type in tabulated {
            for zone in ClimateZone::all() {
                for floor_area in [50., 1000., 7500., 60_000.] {
                    let standard =
                        standard_energy(building_type, zone, floor_area, &tables).unwrap();
                    assert!(
                        standard.total > 0.,
                        "{building_type} in zone {zone} at {floor_area}m2"
                    );
                }
            }
        }
    }
}
