use crate::compare_floats::round_to_digits;
use crate::core::standards::EnvelopeStandard;
use crate::input::EnvelopePart;
use serde::Serialize;
use tracing::debug;

/// Number of decimal places envelope performance values are reported to.
const ENVELOPE_REPORT_DIGITS: u32 = 3;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvelopeResult {
    pub ua_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_a_value: Option<f64>,
    pub is_ua_compliant: bool,
    pub is_eta_a_compliant: bool,
    pub ua_threshold: Option<f64>,
    pub eta_a_threshold: Option<f64>,
}

/// Area-weighted average of a per-part value over the parts that have one.
///
/// Returns None when no part contributes any area.
fn area_weighted_mean<'a>(
    parts: impl IntoIterator<Item = (&'a EnvelopePart, f64)>,
) -> Option<f64> {
    let (weighted_sum, total_area) = parts
        .into_iter()
        .fold((0., 0.), |(sum, area), (part, value)| {
            (sum + part.area * value, area + part.area)
        });

    (total_area > 0.).then(|| weighted_sum / total_area)
}

/// Calculate the average heat transmission coefficient (UA) and the average solar heat
/// gain (ηA) of a building shell, and check them against the zone's thresholds.
///
/// Arguments:
/// * `parts` - the envelope parts; ηA is only averaged over parts with an η value
/// * `standard` - the UA and ηA thresholds for the building's climate zone
pub fn evaluate_envelope(parts: &[EnvelopePart], standard: &EnvelopeStandard) -> EnvelopeResult {
    let ua_value = area_weighted_mean(parts.iter().map(|part| (part, part.u_value))).unwrap_or(0.);
    let eta_a_value = area_weighted_mean(
        parts
            .iter()
            .filter_map(|part| part.eta_value.map(|eta| (part, eta))),
    );

    debug!(ua_value, ?eta_a_value, "envelope performance");

    let is_ua_compliant = standard
        .ua_threshold
        .map_or(true, |threshold| ua_value <= threshold);
    let is_eta_a_compliant = match (eta_a_value, standard.eta_a_threshold) {
        (Some(eta_a), Some(threshold)) => eta_a <= threshold,
        _ => true,
    };

    EnvelopeResult {
        ua_value: round_to_digits(ua_value, ENVELOPE_REPORT_DIGITS),
        eta_a_value: eta_a_value.map(|eta_a| round_to_digits(eta_a, ENVELOPE_REPORT_DIGITS)),
        is_ua_compliant,
        is_eta_a_compliant,
        ua_threshold: standard.ua_threshold,
        eta_a_threshold: standard.eta_a_threshold,
    }
}
