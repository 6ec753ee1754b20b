use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// This module contains the factors used to convert delivered energy into primary energy,
/// and a heuristic for guessing the unit that a design energy category is declared in.

pub const ELECTRICITY_UNIT: &str = "kWh";
pub const GAS_UNIT: &str = "m3_gas";

/// Factor (MJ/kWh) substituted when a unit cannot be resolved to a primary energy factor.
pub const DEFAULT_PRIMARY_FACTOR: f64 = 9.76;

/// Primary energy conversion factors, in MJ per unit.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PrimaryEnergyFactors(IndexMap<String, f64>);

impl Default for PrimaryEnergyFactors {
    fn default() -> Self {
        Self(IndexMap::from(
            [
                // electricity
                ("kWh", 9.76),
                ("MWh", 9760.0),
                ("Wh", 0.00976),
                // gas
                ("m3_gas", 45.0),
                ("MJ_gas", 1.0),
                // oil/kerosene
                ("L_kerosene", 36.7),
                ("L_oil", 38.2),
                // LPG
                ("kg_lpg", 50.8),
                ("m3_lpg", 24.9),
                // district heating/cooling
                ("MJ_district_heating", 1.36),
                ("MJ_district_cooling", 1.36),
                ("kg_coal", 25.7),
                // biomass
                ("kg_wood", 14.4),
                ("m3_wood", 10.8),
            ]
            .map(|(unit, factor)| (unit.to_owned(), factor)),
        ))
    }
}

impl PrimaryEnergyFactors {
    pub fn new(factors: IndexMap<String, f64>) -> Self {
        Self(factors)
    }

    /// Primary energy factor in MJ per unit, if the unit is known.
    pub fn primary_factor(&self, unit: &str) -> Option<f64> {
        self.0.get(unit).copied()
    }

    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Guess the unit a design energy category is most likely declared in.
///
/// Most end uses are electric. Heating and hot water are assumed to be gas-fired.
pub fn guess_unit(category: &str) -> &'static str {
    let category = category.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| category.contains(k));

    if contains_any(&["lighting", "cooling", "ventilation", "outlet", "elevator"]) {
        ELECTRICITY_UNIT
    } else if contains_any(&["heating", "hot_water", "dhw"]) {
        GAS_UNIT
    } else {
        ELECTRICITY_UNIT
    }
}
