use crate::catalog::intensity::{IntensityLookup, StandardIntensity};
use crate::errors::CatalogError;
use crate::notes::Note;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::path::Path;

pub mod intensity;
pub mod store;
pub mod validator;

pub use store::CatalogStore;

/// Somewhere standard intensities can be looked up by use and zone.
///
/// Lookups never fail: a miss is reported as a note carried by the result.
pub trait IntensityCatalog: Send + Sync {
    fn lookup(&self, building_use: &str, zone: &str) -> IntensityLookup;
}

/// Label for a YAML mapping key, accepting both string and numeric keys.
pub(crate) fn key_label(key: &Value) -> Option<String> {
    match key {
        Value::String(label) => Some(label.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn is_zone_label(label: &str) -> bool {
    !label.is_empty() && label.chars().all(|c| c.is_ascii_digit())
}

/// The zone entries of a use, which are either nested under a `zones` key or given as
/// sibling numeric keys directly under the use.
pub(crate) fn zone_entries(use_data: &Value) -> Vec<(String, &Value)> {
    let Some(use_data) = use_data.as_mapping() else {
        return vec![];
    };

    match use_data.get("zones") {
        Some(zones) => zones
            .as_mapping()
            .into_iter()
            .flatten()
            .filter_map(|(key, entry)| key_label(key).map(|label| (label, entry)))
            .collect(),
        None => use_data
            .iter()
            .filter_map(|(key, entry)| key_label(key).map(|label| (label, entry)))
            .filter(|(label, _)| is_zone_label(label))
            .collect(),
    }
}

/// The `uses` section of a raw catalog document, if present as a mapping.
pub(crate) fn uses_section(document: &Value) -> Option<&Mapping> {
    document.get("uses").and_then(Value::as_mapping)
}

/// A standard intensity catalog, normalised into one canonical shape.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    uses: IndexMap<String, IndexMap<String, StandardIntensity>>,
}

impl Catalog {
    pub fn from_yaml_value(document: &Value) -> Result<Self, CatalogError> {
        let uses = uses_section(document).ok_or(CatalogError::MissingUses)?;

        Ok(Self {
            uses: uses
                .iter()
                .filter_map(|(key, use_data)| key_label(key).map(|label| (label, use_data)))
                .map(|(building_use, use_data)| {
                    let zones = zone_entries(use_data)
                        .into_iter()
                        .filter_map(|(zone, entry)| {
                            entry
                                .as_mapping()
                                .map(|entry| (zone, StandardIntensity::from_mapping(entry)))
                        })
                        .collect();
                    (building_use, zones)
                })
                .collect(),
        })
    }

    pub fn from_yaml_str(yaml: &str, source: &str) -> Result<Self, CatalogError> {
        let document: Value =
            serde_yaml::from_str(yaml).map_err(|source_error| CatalogError::Parse {
                path: source.to_owned(),
                source: source_error,
            })?;
        Self::from_yaml_value(&document)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml, &path.display().to_string())
    }

    pub fn uses(&self) -> impl Iterator<Item = &str> {
        self.uses.keys().map(String::as_str)
    }

    /// Zones tabulated for a use; empty when the use is not in the catalog.
    pub fn zones(&self, building_use: &str) -> Vec<&str> {
        self.uses
            .get(building_use)
            .map(|zones| zones.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Explicitly query the intensity of a use in a zone.
    pub fn intensity(
        &self,
        building_use: &str,
        zone: &str,
    ) -> Result<&StandardIntensity, CatalogError> {
        self.uses
            .get(building_use)
            .and_then(|zones| zones.get(zone))
            .ok_or_else(|| CatalogError::NotFound {
                building_use: building_use.to_owned(),
                zone: zone.to_owned(),
            })
    }
}

impl IntensityCatalog for Catalog {
    fn lookup(&self, building_use: &str, zone: &str) -> IntensityLookup {
        let Some(zones) = self.uses.get(building_use) else {
            return IntensityLookup::Missing(Note::catalog_use_missing(building_use));
        };

        match zones.get(zone) {
            Some(intensity) => IntensityLookup::Found(intensity.clone()),
            None => IntensityLookup::Missing(Note::catalog_zone_missing(building_use, zone)),
        }
    }
}
