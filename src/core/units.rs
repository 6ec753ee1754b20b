pub const MEGAJOULES_PER_KILOWATT_HOUR: f64 = 3.6;
pub const KILOJOULES_PER_MEGAJOULE: u32 = 1_000;
pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR: u32 = 365;

pub fn kwh_to_mj(energy_kwh: f64) -> f64 {
    energy_kwh * MEGAJOULES_PER_KILOWATT_HOUR
}

/// Convert a power drawn over a number of hours (i.e. watt-hours) into MJ.
pub fn watt_hours_to_mj(energy_wh: f64) -> f64 {
    kwh_to_mj(energy_wh / WATTS_PER_KILOWATT as f64)
}

pub(crate) fn kilojoules_to_mj(energy_kj: f64) -> f64 {
    energy_kj / KILOJOULES_PER_MEGAJOULE as f64
}

/// Number of equivalent full-load hours implied by a degree-day total and a design
/// temperature difference, i.e. `degree_days * 24 / delta_t`.
pub(crate) fn equivalent_hours_from_degree_days(degree_days: f64, design_delta_t: f64) -> f64 {
    degree_days * HOURS_PER_DAY as f64 / design_delta_t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_convert_kwh_to_mj() {
        assert_eq!(kwh_to_mj(10.), 36., "incorrect conversion of kWh to MJ");
        assert_eq!(kwh_to_mj(0.), 0.);
    }

    #[rstest]
    #[case(1_000., 3.6)]
    #[case(2_750_000., 9_900.)]
    #[case(500., 1.8)]
    fn should_convert_watt_hours_to_mj(#[case] energy_wh: f64, #[case] expected_mj: f64) {
        assert_relative_eq!(watt_hours_to_mj(energy_wh), expected_mj, max_relative = 1e-12);
    }

    #[rstest]
    fn should_convert_kilojoules_to_mj() {
        assert_eq!(kilojoules_to_mj(4_180.), 4.18);
    }

    #[rstest]
    fn should_calculate_equivalent_hours_from_degree_days() {
        assert_eq!(
            equivalent_hours_from_degree_days(1500., 20.),
            1800.,
            "incorrect equivalent operating hours for heating degree days"
        );
        assert_eq!(equivalent_hours_from_degree_days(835., 15.), 1336.);
    }
}
