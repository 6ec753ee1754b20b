mod compare_floats;
pub mod bei;
pub mod catalog;
pub mod compliance;
pub mod config;
pub mod core;
pub mod errors;
pub mod input;
pub mod notes;
pub mod output;

#[macro_use]
extern crate is_close;

pub use crate::bei::{evaluate_bei, evaluate_bei_batch, BeiResult};
pub use crate::compliance::{evaluate_compliance, CalculationResult};
pub use crate::config::EngineConfig;
pub use crate::errors::EngineError;

use crate::catalog::intensity::StandardIntensity;
use crate::catalog::validator::{validate_catalog_file, CatalogValidation};
use crate::catalog::CatalogStore;
use crate::core::primary_energy::PrimaryEnergyFactors;
use crate::core::standards::{EndUse, StandardsTables};
use crate::errors::{CatalogError, InvalidRequestError};
use crate::input::{ingest_bei_requests, BeiRequest, BeiRequests, CalculationRequest};
use crate::output::Output;
use csv::WriterBuilder;
use indexmap::IndexMap;
use serde::Serialize;
use std::io::{Read, Write};
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// The calculation engine: immutable standards tables, the conversion factors and a lazily
/// loaded intensity catalog, shared by every request.
#[derive(Debug)]
pub struct Engine {
    tables: StandardsTables,
    factors: PrimaryEnergyFactors,
    catalog: CatalogStore,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        let catalog_path = config.resolved_catalog_path();
        debug!(catalog = %catalog_path.display(), "building engine");

        Ok(Self::from_parts(
            config.load_standards_tables()?,
            PrimaryEnergyFactors::default(),
            CatalogStore::new(catalog_path),
        ))
    }

    pub fn from_parts(
        tables: StandardsTables,
        factors: PrimaryEnergyFactors,
        catalog: CatalogStore,
    ) -> Self {
        Self {
            tables,
            factors,
            catalog,
        }
    }

    pub fn tables(&self) -> &StandardsTables {
        &self.tables
    }

    pub fn compliance(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, EngineError> {
        evaluate_compliance(request, &self.tables)
    }

    pub fn bei(&self, request: &BeiRequest) -> Result<BeiResult, EngineError> {
        evaluate_bei(request, &self.catalog, &self.factors)
    }

    pub fn bei_batch(
        &self,
        requests: &[Result<BeiRequest, InvalidRequestError>],
    ) -> Vec<Result<BeiResult, EngineError>> {
        evaluate_bei_batch(requests, &self.catalog, &self.factors)
    }

    pub fn catalog_uses(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.catalog.catalog()?.uses().map(str::to_owned).collect())
    }

    pub fn catalog_zones(&self, building_use: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .catalog
            .catalog()?
            .zones(building_use)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    pub fn catalog_intensity(
        &self,
        building_use: &str,
        zone: &str,
    ) -> Result<StandardIntensity, CatalogError> {
        self.catalog
            .catalog()?
            .intensity(building_use, zone)
            .cloned()
    }

    /// Validate the configured catalog file, re-reading it rather than using the cache.
    pub fn validate_catalog(&self) -> CatalogValidation {
        validate_catalog_file(self.catalog.path())
    }
}

/// Serialise a result to the output as pretty-printed JSON.
pub fn write_json_output(
    output: &impl Output,
    location_key: &str,
    value: &impl Serialize,
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }
    let mut writer = output.writer_for_location_key(location_key)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Read a compliance request, evaluate it, and write the result (and optionally its per
/// end use breakdown as CSV) to the output.
pub fn run_compliance(
    engine: &Engine,
    input: impl Read,
    output: impl Output,
    write_csv: bool,
) -> anyhow::Result<CalculationResult> {
    let request = CalculationRequest::from_json(input)?;
    let result = engine.compliance(&request)?;
    info!(
        overall_compliance = result.overall_compliance,
        "{}", result.message
    );

    write_json_output(&output, "compliance.json", &result)?;
    if write_csv {
        write_compliance_breakdown_file(&output, "compliance_breakdown.csv", &result)?;
    }

    Ok(result)
}

/// The outcome of one request in a batch, which fails on its own without failing the rest.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Evaluated(Box<BeiResult>),
    Failed { error: String },
}

impl From<Result<BeiResult, EngineError>> for BatchEntry {
    fn from(result: Result<BeiResult, EngineError>) -> Self {
        match result {
            Ok(result) => BatchEntry::Evaluated(Box::new(result)),
            Err(err) => BatchEntry::Failed {
                error: err.to_string(),
            },
        }
    }
}

/// Read one BEI request (a JSON object) or a batch of them (a JSON array), evaluate them,
/// and write the results to the output.
///
/// A single request that fails is an error; in a batch each failure is reported in place
/// of its result.
pub fn run_bei(
    engine: &Engine,
    input: impl Read,
    output: impl Output,
    write_csv: bool,
) -> anyhow::Result<()> {
    match ingest_bei_requests(input)? {
        BeiRequests::Single(request) => {
            let result = engine.bei(&request)?;
            info!(bei = result.bei, is_compliant = result.is_compliant, "evaluated BEI");

            write_json_output(&output, "bei.json", &result)?;
            if write_csv {
                write_bei_breakdown_file(&output, "bei_breakdown.csv", &result)?;
            }
        }
        BeiRequests::Batch(requests) => {
            let entries = engine
                .bei_batch(&requests)
                .into_iter()
                .map(BatchEntry::from)
                .collect::<Vec<_>>();
            info!(requests = entries.len(), "evaluated BEI batch");

            write_json_output(&output, "bei.json", &entries)?;
            if write_csv {
                for (index, entry) in entries.iter().enumerate() {
                    if let BatchEntry::Evaluated(result) = entry {
                        write_bei_breakdown_file(
                            &output,
                            &format!("bei_breakdown_{index}.csv"),
                            result,
                        )?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn write_compliance_breakdown_file(
    output: &impl Output,
    location_key: &str,
    result: &CalculationResult,
) -> anyhow::Result<()> {
    debug!("writing out to {location_key}");
    let writer = output.writer_for_location_key(location_key)?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    let energy = &result.primary_energy_result;
    writer.write_record(["End use", "Actual", "Standard"])?;
    writer.write_record(["", "[MJ/year]", "[MJ/year]"])?;
    for end_use in EndUse::iter() {
        let value_for = |by_use: &IndexMap<EndUse, f64>| {
            by_use.get(&end_use).copied().unwrap_or(0.).to_string()
        };
        writer.write_record([
            end_use.to_string(),
            value_for(&energy.energy_by_use),
            value_for(&energy.standard_energy_by_use),
        ])?;
    }
    writer.write_record([
        "total".to_string(),
        energy.total_energy_consumption.to_string(),
        energy.standard_energy_consumption.to_string(),
    ])?;

    writer.flush()?;

    Ok(())
}

fn write_bei_breakdown_file(
    output: &impl Output,
    location_key: &str,
    result: &BeiResult,
) -> anyhow::Result<()> {
    debug!("writing out to {location_key}");
    let writer = output.writer_for_location_key(location_key)?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record([
        "Category",
        "Value",
        "Unit",
        "Primary factor",
        "Factor source",
        "Primary energy",
    ])?;
    writer.write_record(["", "", "", "[MJ/unit]", "", "[MJ/year]"])?;
    for entry in &result.design_energy_breakdown {
        writer.write_record([
            entry.category.clone(),
            entry.value.to_string(),
            entry.unit.clone().unwrap_or_default(),
            entry.primary_factor.to_string(),
            entry.factor_source.to_string(),
            entry.primary_energy_mj.to_string(),
        ])?;
    }
    // the deduction row makes the column sum to the design primary energy
    writer.write_record([
        "renewable deduction".to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        (-result.renewable_deduction_mj).to_string(),
    ])?;

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests;
