use crate::compliance::compliance_response::ComplianceCalculationResult;
use crate::core::envelope::{evaluate_envelope, EnvelopeResult};
use crate::core::model_building::{standard_energy, StandardEnergy};
use crate::core::standards::{ClimateZone, EndUse, RegionalCorrection, StandardsTables};
use crate::core::systems::{estimate_actual_energy, ActualEnergy, BuildingContext};
use crate::errors::EngineError;
use crate::input::CalculationRequest;
use crate::notes::{Note, Notes};
use indexmap::IndexMap;
use tracing::debug;

pub mod compliance_response;

pub use compliance_response::{CalculationResult, PrimaryEnergyResult};

/// Figures calculated for one compliance request, before any verdict is drawn.
struct ComplianceCalculation {
    envelope: EnvelopeResult,
    standard: StandardEnergy,
    actual: ActualEnergy,
    zone: ClimateZone,
    notes: Notes,
}

impl ComplianceCalculationResult for ComplianceCalculation {
    fn envelope_result(&self) -> EnvelopeResult {
        self.envelope.clone()
    }

    fn actual_energy(&self) -> f64 {
        self.actual.total
    }

    fn standard_energy(&self) -> f64 {
        self.standard.total
    }

    fn actual_energy_by_use(&self) -> IndexMap<EndUse, f64> {
        self.actual.by_use.clone()
    }

    fn standard_energy_by_use(&self) -> IndexMap<EndUse, f64> {
        self.standard.by_use.clone()
    }

    fn scale_factor(&self) -> f64 {
        self.standard.scale_factor
    }

    fn zone_correction(&self) -> RegionalCorrection {
        self.standard.zone_correction
    }

    fn climate_zone(&self) -> ClimateZone {
        self.zone
    }

    fn notes(self) -> Vec<Note> {
        self.notes.into_vec()
    }
}

/// Evaluate a building design against the envelope and primary energy standards of its
/// climate zone.
///
/// The envelope is checked against the zone's UA and ηA thresholds, and the designed
/// systems' estimated annual primary energy is compared against the model building's.
/// A zone outside 1-8 is replaced by zone 6 with a note.
pub fn evaluate_compliance(
    request: &CalculationRequest,
    tables: &StandardsTables,
) -> Result<CalculationResult, EngineError> {
    request.ensure_valid()?;

    let mut notes = Notes::new();
    let (zone, fallback_note) = ClimateZone::resolve(request.building.climate_zone);
    if let Some(note) = fallback_note {
        notes.push(note);
    }

    let building = BuildingContext {
        building_type: request.building.building_type,
        zone,
        floor_area: request.building.total_floor_area,
    };

    let envelope = evaluate_envelope(&request.envelope.parts, &tables.envelope_standard(zone));
    let standard = standard_energy(building.building_type, zone, building.floor_area, tables)?;
    let actual = estimate_actual_energy(&request.systems, &building, tables, &mut notes);

    debug!(
        standard = standard.total,
        actual = actual.total,
        "compared primary energy"
    );

    Ok(CalculationResult::build_from(ComplianceCalculation {
        envelope,
        standard,
        actual,
        zone,
        notes,
    })?)
}
