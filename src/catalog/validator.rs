use crate::catalog::intensity::{StandardIntensity, TOTAL_KEY};
use crate::catalog::{key_label, uses_section, zone_entries};
use serde::Serialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub uses_count: usize,
    pub zones_count: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogValidation {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

impl CatalogValidation {
    fn from_issues(issues: Vec<ValidationIssue>, uses_count: usize, zones_count: usize) -> Self {
        let count_of = |severity: Severity| {
            issues
                .iter()
                .filter(|issue| issue.severity == severity)
                .count()
        };
        let summary = ValidationSummary {
            uses_count,
            zones_count,
            errors: count_of(Severity::Error),
            warnings: count_of(Severity::Warning),
        };

        Self {
            is_valid: summary.errors == 0,
            issues,
            summary,
        }
    }
}

fn issue(severity: Severity, message: String, path: String) -> ValidationIssue {
    ValidationIssue {
        severity,
        message,
        path,
    }
}

/// Check a raw catalog document for structural errors and suspicious data.
///
/// Missing uses or zones are errors. Missing required categories and totals that disagree
/// with their categories are warnings, which do not make the catalog invalid.
pub fn validate_catalog(document: &Value) -> CatalogValidation {
    let mut issues = vec![];
    let mut zones_count = 0;

    let uses = uses_section(document).filter(|uses| !uses.is_empty());
    if uses.is_none() {
        issues.push(issue(
            Severity::Error,
            "No 'uses' section found in catalog".into(),
            "uses".into(),
        ));
    }

    let uses = uses
        .into_iter()
        .flatten()
        .filter_map(|(key, use_data)| key_label(key).map(|label| (label, use_data)))
        .collect::<Vec<_>>();

    for (building_use, use_data) in &uses {
        let zones = zone_entries(use_data);
        if zones.is_empty() {
            issues.push(issue(
                Severity::Error,
                format!("No zones found for use '{building_use}'"),
                format!("uses.{building_use}"),
            ));
            continue;
        }

        for (zone, entry) in zones {
            zones_count += 1;
            let intensity = entry
                .as_mapping()
                .map(StandardIntensity::from_mapping)
                .unwrap_or_default();

            let missing = intensity.missing_required_categories();
            if !missing.is_empty() {
                issues.push(issue(
                    Severity::Warning,
                    format!(
                        "Missing categories for {building_use}, zone {zone}: {}",
                        missing.join(", ")
                    ),
                    format!("uses.{building_use}.{zone}"),
                ));
            }

            if let Some(declared) = intensity
                .declared_total
                .filter(|_| intensity.has_total_mismatch())
            {
                issues.push(issue(
                    Severity::Warning,
                    format!(
                        "Total mismatch for {building_use}, zone {zone}: calculated {}, declared {declared}",
                        intensity.category_sum()
                    ),
                    format!("uses.{building_use}.{zone}.{TOTAL_KEY}"),
                ));
            }
        }
    }

    let validation = CatalogValidation::from_issues(issues, uses.len(), zones_count);
    debug!(summary = ?validation.summary, "validated catalog");

    validation
}

/// Validate a catalog file. A file that cannot be read or parsed is reported as a single
/// error issue rather than failing.
pub fn validate_catalog_file(path: &Path) -> CatalogValidation {
    let document = std::fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|yaml| serde_yaml::from_str::<Value>(&yaml).map_err(|err| err.to_string()));

    match document {
        Ok(document) => validate_catalog(&document),
        Err(reason) => CatalogValidation::from_issues(
            vec![issue(
                Severity::Error,
                format!("Failed to load or parse catalog '{}': {reason}", path.display()),
                String::new(),
            )],
            0,
            0,
        ),
    }
}
