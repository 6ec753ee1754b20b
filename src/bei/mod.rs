use crate::bei::rating::Rating;
use crate::catalog::IntensityCatalog;
use crate::compare_floats::{differs_by_more_than, round_to_digits};
use crate::core::primary_energy::{guess_unit, PrimaryEnergyFactors, DEFAULT_PRIMARY_FACTOR};
use crate::errors::{CalculationError, EngineError, InvalidRequestError};
use crate::input::{BeiRequest, DesignEnergyCategory, UsageMix, UseDescription};
use crate::notes::{Note, Notes};
use rayon::prelude::*;
use serde::Serialize;
use strum::Display;
use tracing::debug;

pub mod rating;

/// Largest difference, in m2, tolerated between the summed usage mix areas and the
/// building area before it is noted.
pub const AREA_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactorSource {
    /// given with the category in the request
    Declared,
    /// looked up from the primary energy factor table by unit
    Table,
    /// the unit had no known factor, so the electricity factor was substituted
    Default,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DesignEnergyEntry {
    pub category: String,
    pub value: f64,
    /// None only when a primary factor was declared without a unit
    pub unit: Option<String>,
    /// MJ per unit
    pub primary_factor: f64,
    pub factor_source: FactorSource,
    pub primary_energy_mj: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UsageMixDetail {
    #[serde(rename = "use")]
    pub building_use: String,
    pub zone: String,
    pub area_m2: f64,
    pub area_share: f64,
    #[serde(rename = "intensity_MJ_per_m2_year")]
    pub intensity: f64,
    #[serde(rename = "total_MJ_year")]
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UseInfo {
    Single(String),
    Mixed(Vec<UsageMixDetail>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BeiResult {
    /// design / standard, rounded for display
    pub bei: f64,
    pub bei_raw: f64,
    /// taken from the unrounded ratio
    pub is_compliant: bool,
    pub design_primary_energy_mj: f64,
    pub standard_primary_energy_mj: f64,
    pub renewable_deduction_mj: f64,
    pub design_energy_per_m2: f64,
    pub standard_energy_per_m2: f64,
    pub building_area_m2: f64,
    pub use_info: UseInfo,
    pub design_energy_breakdown: Vec<DesignEnergyEntry>,
    pub standard_intensity_source: String,
    pub compliance_threshold: f64,
    pub bei_round_digits: u32,
    pub rating: Rating,
    pub notes: Vec<Note>,
}

fn design_energy_entry(
    category: &DesignEnergyCategory,
    factors: &PrimaryEnergyFactors,
    notes: &mut Notes,
) -> DesignEnergyEntry {
    // a declared factor makes the unit irrelevant, so it is never guessed
    let unit = match (&category.unit, category.primary_factor) {
        (Some(unit), _) => Some(unit.clone()),
        (None, Some(_)) => None,
        (None, None) => {
            let unit = guess_unit(&category.category);
            notes.push(Note::unit_guessed(&category.category, unit));
            Some(unit.to_owned())
        }
    };

    let (primary_factor, factor_source) = match category.primary_factor {
        Some(factor) => (factor, FactorSource::Declared),
        None => {
            let unit = unit.as_deref().unwrap_or_default();
            match factors.primary_factor(unit) {
                Some(factor) => (factor, FactorSource::Table),
                None => {
                    notes.push(Note::default_factor_used(
                        &category.category,
                        unit,
                        DEFAULT_PRIMARY_FACTOR,
                    ));
                    (DEFAULT_PRIMARY_FACTOR, FactorSource::Default)
                }
            }
        }
    };

    DesignEnergyEntry {
        category: category.category.clone(),
        value: category.value,
        unit,
        primary_factor,
        factor_source,
        primary_energy_mj: category.value * primary_factor,
    }
}

/// Total standard intensity, in MJ/m2/year, of a use in a zone. A catalog miss gives zero.
fn total_intensity(
    catalog: &impl IntensityCatalog,
    building_use: &str,
    zone: &str,
    notes: &mut Notes,
) -> f64 {
    catalog
        .lookup(building_use, zone)
        .into_intensity(notes)
        .total_intensity(notes)
}

struct StandardEnergyFigures {
    total_mj: f64,
    use_info: UseInfo,
    intensity_source: String,
}

fn mixed_standard_energy(
    mix: &[UsageMix],
    building_area_m2: f64,
    catalog: &impl IntensityCatalog,
    notes: &mut Notes,
) -> StandardEnergyFigures {
    let details = mix
        .iter()
        .map(|entry| {
            let intensity = total_intensity(catalog, &entry.building_use, &entry.zone, notes);
            let area_m2 = entry.resolved_area(building_area_m2);
            UsageMixDetail {
                building_use: entry.building_use.clone(),
                zone: entry.zone.clone(),
                area_m2,
                area_share: area_m2 / building_area_m2,
                intensity,
                total: intensity * area_m2,
            }
        })
        .collect::<Vec<_>>();

    let mix_area = details.iter().fold(0., |sum, detail| sum + detail.area_m2);
    if differs_by_more_than(mix_area, building_area_m2, AREA_TOLERANCE) {
        notes.push(Note::area_mismatch(mix_area, building_area_m2));
    }

    StandardEnergyFigures {
        total_mj: details.iter().fold(0., |sum, detail| sum + detail.total),
        use_info: UseInfo::Mixed(details),
        intensity_source: format!("{} uses area-weighted", mix.len()),
    }
}

/// Evaluate the Building Energy Index of a design: its annual primary energy divided by
/// the standard primary energy for its use (or mix of uses) and zone.
///
/// Missing units, factors and catalog entries are substituted and noted rather than
/// failing the evaluation, but a standard primary energy that is not positive (including
/// one left empty by a catalog miss) is an error.
pub fn evaluate_bei(
    request: &BeiRequest,
    catalog: &impl IntensityCatalog,
    factors: &PrimaryEnergyFactors,
) -> Result<BeiResult, EngineError> {
    request.ensure_valid()?;
    let building_area_m2 = request.building_area_m2;
    let mut notes = Notes::new();

    let design_energy_breakdown = request
        .design_energy
        .iter()
        .map(|category| design_energy_entry(category, factors, &mut notes))
        .collect::<Vec<_>>();
    let design_primary_energy_mj = design_energy_breakdown
        .iter()
        .fold(0., |sum, entry| sum + entry.primary_energy_mj)
        - request.renewable_energy_deduction_mj;

    let standard = match request.use_description()? {
        UseDescription::Single { building_use, zone } => StandardEnergyFigures {
            total_mj: total_intensity(catalog, building_use, zone, &mut notes) * building_area_m2,
            use_info: UseInfo::Single(format!("{building_use} (zone {zone})")),
            intensity_source: format!("catalog value ({building_use}, zone {zone})"),
        },
        UseDescription::Mixed(mix) => {
            mixed_standard_energy(mix, building_area_m2, catalog, &mut notes)
        }
    };

    if standard.total_mj <= 0. {
        return Err(CalculationError::StandardEnergyNotPositive {
            standard_mj: standard.total_mj,
        }
        .into());
    }

    let bei_raw = design_primary_energy_mj / standard.total_mj;
    debug!(
        design = design_primary_energy_mj,
        standard = standard.total_mj,
        bei_raw,
        "evaluated BEI"
    );

    Ok(BeiResult {
        bei: round_to_digits(bei_raw, request.bei_round_digits),
        bei_raw,
        is_compliant: bei_raw <= request.compliance_threshold,
        design_primary_energy_mj,
        standard_primary_energy_mj: standard.total_mj,
        renewable_deduction_mj: request.renewable_energy_deduction_mj,
        design_energy_per_m2: design_primary_energy_mj / building_area_m2,
        standard_energy_per_m2: standard.total_mj / building_area_m2,
        building_area_m2,
        use_info: standard.use_info,
        design_energy_breakdown,
        standard_intensity_source: standard.intensity_source,
        compliance_threshold: request.compliance_threshold,
        bei_round_digits: request.bei_round_digits,
        rating: Rating::from_bei(bei_raw),
        notes: notes.into_vec(),
    })
}

/// Evaluate many BEI requests in parallel. Each request succeeds or fails independently,
/// and results are returned in request order.
///
/// Entries that could not be read as requests are reported as they are, in their place.
pub fn evaluate_bei_batch(
    requests: &[Result<BeiRequest, InvalidRequestError>],
    catalog: &impl IntensityCatalog,
    factors: &PrimaryEnergyFactors,
) -> Vec<Result<BeiResult, EngineError>> {
    requests
        .par_iter()
        .map(|request| match request {
            Ok(request) => evaluate_bei(request, catalog, factors),
            Err(err) => Err(err.clone().into()),
        })
        .collect()
}
