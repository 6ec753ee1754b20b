use crate::core::envelope::EnvelopeResult;
use crate::core::standards::{ClimateZone, EndUse, RegionalCorrection};
use crate::errors::CalculationError;
use crate::notes::Note;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

pub const COMPLIANT_MESSAGE: &str = "Compliant with standards";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimaryEnergyResult {
    /// MJ/year
    pub total_energy_consumption: f64,
    /// MJ/year
    pub standard_energy_consumption: f64,
    /// %
    pub energy_saving_rate: f64,
    pub is_energy_compliant: bool,
    pub energy_by_use: IndexMap<EndUse, f64>,
    pub standard_energy_by_use: IndexMap<EndUse, f64>,
    pub scale_factor: f64,
    pub zone_correction: RegionalCorrection,
}

/// The outcome of a compliance calculation. A non-compliant building is still a
/// successful result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalculationResult {
    pub envelope_result: EnvelopeResult,
    pub primary_energy_result: PrimaryEnergyResult,
    pub overall_compliance: bool,
    pub message: String,
    pub climate_zone: ClimateZone,
    pub notes: Vec<Note>,
}

impl CalculationResult {
    pub(crate) fn build_from<T>(result: T) -> Result<Self, CalculationError>
    where
        T: ComplianceCalculationResult,
    {
        let standard = result.standard_energy();
        if standard <= 0. {
            return Err(CalculationError::StandardEnergyNotPositive {
                standard_mj: standard,
            });
        }
        let actual = result.actual_energy();
        let envelope_result = result.envelope_result();

        // compliance if actual consumption is less than or equal to standard consumption
        let is_energy_compliant = actual <= standard;

        let failing_checks = [
            (!envelope_result.is_ua_compliant).then_some("UA value"),
            (!envelope_result.is_eta_a_compliant).then_some("ηA value"),
            (!is_energy_compliant).then_some("primary energy consumption"),
        ]
        .into_iter()
        .flatten()
        .collect_vec();

        let overall_compliance = failing_checks.is_empty();
        let message = if overall_compliance {
            COMPLIANT_MESSAGE.to_owned()
        } else {
            format!(
                "Does not meet standards for: {}",
                failing_checks.iter().join(", ")
            )
        };

        Ok(Self {
            envelope_result,
            primary_energy_result: PrimaryEnergyResult {
                total_energy_consumption: actual,
                standard_energy_consumption: standard,
                energy_saving_rate: (standard - actual) / standard * 100.,
                is_energy_compliant,
                energy_by_use: result.actual_energy_by_use(),
                standard_energy_by_use: result.standard_energy_by_use(),
                scale_factor: result.scale_factor(),
                zone_correction: result.zone_correction(),
            },
            overall_compliance,
            message,
            climate_zone: result.climate_zone(),
            notes: result.notes(),
        })
    }
}

/// Data on the underlying calculation that a compliance result requires.
pub(crate) trait ComplianceCalculationResult {
    fn envelope_result(&self) -> EnvelopeResult;
    /// MJ/year
    fn actual_energy(&self) -> f64;
    /// MJ/year
    fn standard_energy(&self) -> f64;
    fn actual_energy_by_use(&self) -> IndexMap<EndUse, f64>;
    fn standard_energy_by_use(&self) -> IndexMap<EndUse, f64>;
    fn scale_factor(&self) -> f64;
    fn zone_correction(&self) -> RegionalCorrection;
    fn climate_zone(&self) -> ClimateZone;
    fn notes(self) -> Vec<Note>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    struct CannedResult {
        ua_value: f64,
        actual_energy: f64,
        standard_energy: f64,
    }

    impl ComplianceCalculationResult for CannedResult {
        fn envelope_result(&self) -> EnvelopeResult {
            EnvelopeResult {
                ua_value: self.ua_value,
                eta_a_value: Some(0.45),
                is_ua_compliant: self.ua_value <= 0.62,
                is_eta_a_compliant: true,
                ua_threshold: Some(0.62),
                eta_a_threshold: Some(2.8),
            }
        }

        fn actual_energy(&self) -> f64 {
            self.actual_energy
        }

        fn standard_energy(&self) -> f64 {
            self.standard_energy
        }

        fn actual_energy_by_use(&self) -> IndexMap<EndUse, f64> {
            IndexMap::from([
                (EndUse::Heating, self.actual_energy * 0.25),
                (EndUse::Lighting, self.actual_energy * 0.75),
            ])
        }

        fn standard_energy_by_use(&self) -> IndexMap<EndUse, f64> {
            IndexMap::from([
                (EndUse::Heating, self.standard_energy * 0.5),
                (EndUse::Lighting, self.standard_energy * 0.5),
            ])
        }

        fn scale_factor(&self) -> f64 {
            0.95
        }

        fn zone_correction(&self) -> RegionalCorrection {
            RegionalCorrection {
                heating: 0.84,
                cooling: 1.15,
            }
        }

        fn climate_zone(&self) -> ClimateZone {
            ClimateZone::new(6).unwrap()
        }

        fn notes(self) -> Vec<Note> {
            vec![]
        }
    }

    #[fixture]
    fn canned_result() -> CannedResult {
        CannedResult {
            ua_value: 0.5,
            actual_energy: 160000.,
            standard_energy: 200000.,
        }
    }

    #[rstest]
    fn test_serialize_result_to_response(canned_result: CannedResult) {
        let expected_json = json!({
            "envelope_result": {
                "ua_value": 0.5,
                "eta_a_value": 0.45,
                "is_ua_compliant": true,
                "is_eta_a_compliant": true,
                "ua_threshold": 0.62,
                "eta_a_threshold": 2.8,
            },
            "primary_energy_result": {
                "total_energy_consumption": 160000.0,
                "standard_energy_consumption": 200000.0,
                "energy_saving_rate": 20.0,
                "is_energy_compliant": true,
                "energy_by_use": {
                    "heating": 40000.0,
                    "lighting": 120000.0,
                },
                "standard_energy_by_use": {
                    "heating": 100000.0,
                    "lighting": 100000.0,
                },
                "scale_factor": 0.95,
                "zone_correction": {
                    "heating": 0.84,
                    "cooling": 1.15,
                },
            },
            "overall_compliance": true,
            "message": "Compliant with standards",
            "climate_zone": 6,
            "notes": [],
        });

        assert_eq!(
            expected_json,
            serde_json::to_value(CalculationResult::build_from(canned_result).unwrap()).unwrap()
        );
    }

    #[rstest]
    fn should_list_every_failing_check() {
        let result = CalculationResult::build_from(CannedResult {
            ua_value: 0.8,
            actual_energy: 250000.,
            standard_energy: 200000.,
        })
        .unwrap();

        assert!(!result.overall_compliance);
        assert!(!result.primary_energy_result.is_energy_compliant);
        assert_eq!(result.primary_energy_result.energy_saving_rate, -25.);
        assert_eq!(
            result.message,
            "Does not meet standards for: UA value, primary energy consumption"
        );
    }

    #[rstest]
    fn should_treat_equal_consumption_as_compliant() {
        let result = CalculationResult::build_from(CannedResult {
            ua_value: 0.5,
            actual_energy: 200000.,
            standard_energy: 200000.,
        })
        .unwrap();

        assert!(result.primary_energy_result.is_energy_compliant);
        assert_eq!(result.primary_energy_result.energy_saving_rate, 0.);
    }

    #[rstest]
    #[case(0.)]
    #[case(-10.)]
    fn should_fail_when_standard_energy_not_positive(#[case] standard_energy: f64) {
        assert_eq!(
            CalculationResult::build_from(CannedResult {
                ua_value: 0.5,
                actual_energy: 1000.,
                standard_energy,
            }),
            Err(CalculationError::StandardEnergyNotPositive {
                standard_mj: standard_energy
            })
        );
    }
}
