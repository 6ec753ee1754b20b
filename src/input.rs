use crate::core::standards::BuildingType;
use crate::errors::InvalidRequestError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_valid::Validate;
use std::io::{BufReader, Read};
use strum::Display;

fn parse_json<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, InvalidRequestError> {
    serde_json::from_value(value).map_err(|err| InvalidRequestError::new("request", err.to_string()))
}

fn read_json(json: impl Read) -> Result<Value, InvalidRequestError> {
    serde_json::from_reader(BufReader::new(json))
        .map_err(|err| InvalidRequestError::new("request", format!("invalid JSON: {err}")))
}

// Compliance calculation requests

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CalculationRequest {
    #[validate]
    pub building: BuildingInput,
    #[validate]
    pub envelope: EnvelopeInput,
    #[serde(default)]
    #[validate]
    pub systems: SystemsInput,
}

impl CalculationRequest {
    pub fn from_json(json: impl Read) -> Result<Self, InvalidRequestError> {
        let request: Self = parse_json(read_json(json)?)?;
        request.ensure_valid()?;

        Ok(request)
    }

    /// Check numeric bounds and the rules that relate fields to one another.
    pub fn ensure_valid(&self) -> Result<(), InvalidRequestError> {
        self.validate()?;

        if self.envelope.parts.is_empty() {
            return Err(InvalidRequestError::new(
                "envelope.parts",
                "at least one envelope part is required",
            ));
        }

        for (index, part) in self.envelope.parts.iter().enumerate() {
            let field = || format!("envelope.parts[{index}].eta_value");
            match (part.part_type, part.eta_value) {
                (EnvelopePartType::Window, None) => {
                    return Err(InvalidRequestError::new(
                        field(),
                        format!("window '{}' must have an eta value", part.part_name),
                    ));
                }
                (part_type, Some(_)) if part_type != EnvelopePartType::Window => {
                    return Err(InvalidRequestError::new(
                        field(),
                        format!(
                            "only windows carry an eta value, but {part_type} '{}' has one",
                            part.part_name
                        ),
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BuildingInput {
    pub building_type: BuildingType,
    /// m2
    #[validate(exclusive_minimum = 0.)]
    pub total_floor_area: f64,
    /// Nominally 1-8. Values outside this range fall back to zone 6 rather than failing.
    pub climate_zone: i64,
    #[validate(minimum = 1)]
    pub num_stories: u32,
    #[serde(default)]
    pub has_central_heat_source: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeInput {
    #[validate]
    pub parts: Vec<EnvelopePart>,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnvelopePartType {
    Wall,
    Roof,
    Floor,
    Window,
    Door,
    ThermalBridge,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EnvelopePart {
    pub part_name: String,
    pub part_type: EnvelopePartType,
    /// m2
    #[validate(exclusive_minimum = 0.)]
    pub area: f64,
    /// W/(m2.K)
    #[validate(exclusive_minimum = 0.)]
    pub u_value: f64,
    /// solar heat gain coefficient, windows only
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub eta_value: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SystemsInput {
    #[validate]
    pub heating: Option<SpaceConditioningSystem>,
    #[validate]
    pub cooling: Option<SpaceConditioningSystem>,
    #[validate]
    pub ventilation: Option<VentilationSystem>,
    #[validate]
    pub hot_water: Option<HotWaterSystem>,
    #[validate]
    pub lighting: Option<LightingSystem>,
}

/// A heating or cooling system.
#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SpaceConditioningSystem {
    pub system_type: String,
    /// kW
    #[validate(exclusive_minimum = 0.)]
    pub rated_capacity: Option<f64>,
    /// rated COP (or thermal efficiency for combustion systems)
    #[validate(exclusive_minimum = 0.)]
    pub efficiency: Option<f64>,
    pub control_method: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VentilationSystem {
    pub system_type: String,
    /// m3/h
    #[validate(exclusive_minimum = 0.)]
    pub air_volume: Option<f64>,
    /// W
    #[validate(exclusive_minimum = 0.)]
    pub power_consumption: Option<f64>,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub heat_exchange_efficiency: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct HotWaterSystem {
    pub system_type: String,
    #[validate(exclusive_minimum = 0.)]
    pub efficiency: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LightingSystem {
    pub system_type: String,
    /// W/m2
    #[validate(exclusive_minimum = 0.)]
    pub power_density: Option<f64>,
    pub control_method: Option<String>,
}

// BEI requests

/// Catalog zones are keyed by label, but requests commonly give them as bare numbers.
fn deserialize_zone_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ZoneLabel {
        Number(u64),
        Text(String),
    }

    Ok(
        Option::<ZoneLabel>::deserialize(deserializer)?.map(|label| match label {
            ZoneLabel::Number(number) => number.to_string(),
            ZoneLabel::Text(text) => text,
        }),
    )
}

fn deserialize_required_zone_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_zone_label(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("zone must not be null"))
}

fn default_bei_round_digits() -> u32 {
    3
}

fn default_compliance_threshold() -> f64 {
    1.0
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BeiRequest {
    /// m2
    #[validate(exclusive_minimum = 0.)]
    pub building_area_m2: f64,
    #[serde(rename = "use", default)]
    pub building_use: Option<String>,
    #[serde(default, deserialize_with = "deserialize_zone_label")]
    pub zone: Option<String>,
    #[validate]
    pub usage_mix: Option<Vec<UsageMix>>,
    #[serde(default)]
    #[validate]
    pub design_energy: Vec<DesignEnergyCategory>,
    /// MJ/year
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub renewable_energy_deduction_mj: f64,
    #[serde(default = "default_bei_round_digits")]
    #[validate(maximum = 10)]
    pub bei_round_digits: u32,
    #[serde(default = "default_compliance_threshold")]
    #[validate(exclusive_minimum = 0.)]
    pub compliance_threshold: f64,
}

/// How the uses of a building whose standard energy is being calculated are described.
#[derive(Clone, Copy, Debug)]
pub enum UseDescription<'a> {
    Single { building_use: &'a str, zone: &'a str },
    Mixed(&'a [UsageMix]),
}

impl BeiRequest {
    pub fn from_json(json: impl Read) -> Result<Self, InvalidRequestError> {
        let request: Self = parse_json(read_json(json)?)?;
        request.ensure_valid()?;

        Ok(request)
    }

    /// Check numeric bounds and the rules that relate fields to one another.
    pub fn ensure_valid(&self) -> Result<(), InvalidRequestError> {
        self.validate()?;
        self.use_description()?;

        Ok(())
    }

    /// Whether the request describes a single-use or a mixed-use building.
    ///
    /// An empty usage mix is treated the same as an absent one.
    pub fn use_description(&self) -> Result<UseDescription<'_>, InvalidRequestError> {
        match self.usage_mix.as_deref() {
            Some(mix) if !mix.is_empty() => {
                for (index, entry) in mix.iter().enumerate() {
                    if entry.area_m2.is_some() == entry.area_share.is_some() {
                        return Err(InvalidRequestError::new(
                            format!("usage_mix[{index}]"),
                            format!(
                                "exactly one of area_m2 or area_share must be given for use '{}'",
                                entry.building_use
                            ),
                        ));
                    }
                }
                Ok(UseDescription::Mixed(mix))
            }
            _ => match (self.building_use.as_deref(), self.zone.as_deref()) {
                (Some(building_use), Some(zone)) => Ok(UseDescription::Single { building_use, zone }),
                _ => Err(InvalidRequestError::new(
                    "use",
                    "both use and zone are required for a single-use building",
                )),
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UsageMix {
    #[serde(rename = "use")]
    pub building_use: String,
    #[serde(deserialize_with = "deserialize_required_zone_label")]
    pub zone: String,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub area_share: Option<f64>,
    /// m2
    #[validate(exclusive_minimum = 0.)]
    pub area_m2: Option<f64>,
}

impl UsageMix {
    /// Floor area given over to this use, in m2.
    pub fn resolved_area(&self, building_area_m2: f64) -> f64 {
        match (self.area_m2, self.area_share) {
            (Some(area), _) => area,
            (None, Some(share)) => share * building_area_m2,
            (None, None) => 0.,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct DesignEnergyCategory {
    pub category: String,
    #[validate(exclusive_minimum = 0.)]
    pub value: f64,
    pub unit: Option<String>,
    /// MJ per unit
    #[validate(exclusive_minimum = 0.)]
    pub primary_factor: Option<f64>,
}

/// One or many BEI requests, as read from a JSON object or array.
///
/// Each entry of a batch is parsed and validated on its own, so one malformed entry does
/// not stop the rest from being evaluated.
#[derive(Debug)]
pub enum BeiRequests {
    Single(Box<BeiRequest>),
    Batch(Vec<Result<BeiRequest, InvalidRequestError>>),
}

pub fn ingest_bei_requests(json: impl Read) -> Result<BeiRequests, InvalidRequestError> {
    match read_json(json)? {
        Value::Array(values) => Ok(BeiRequests::Batch(
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    parse_json::<BeiRequest>(value)
                        .and_then(|request| request.ensure_valid().map(|_| request))
                        .map_err(|err| err.within(format!("[{index}]")))
                })
                .collect(),
        )),
        value => {
            let request: BeiRequest = parse_json(value)?;
            request.ensure_valid()?;
            Ok(BeiRequests::Single(Box::new(request)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    #[fixture]
    fn compliance_json() -> Value {
        json!({
            "building": {
                "building_type": "office",
                "total_floor_area": 1000.0,
                "climate_zone": 6,
                "num_stories": 3
            },
            "envelope": {
                "parts": [
                    {"part_name": "external wall", "part_type": "wall", "area": 400.0, "u_value": 0.5},
                    {"part_name": "south glazing", "part_type": "window", "area": 100.0, "u_value": 2.3, "eta_value": 0.4}
                ]
            },
            "systems": {
                "heating": {"system_type": "room_air_conditioner", "efficiency": 4.0}
            }
        })
    }

    fn compliance_request_from(value: Value) -> Result<CalculationRequest, InvalidRequestError> {
        CalculationRequest::from_json(value.to_string().as_bytes())
    }

    #[rstest]
    fn should_ingest_compliance_request(compliance_json: Value) {
        let request = compliance_request_from(compliance_json).unwrap();

        assert_eq!(request.building.building_type, BuildingType::Office);
        assert!(!request.building.has_central_heat_source);
        assert_eq!(request.envelope.parts.len(), 2);
        assert_eq!(
            request.systems.heating.as_ref().and_then(|h| h.efficiency),
            Some(4.0)
        );
        assert!(request.systems.cooling.is_none());
    }

    #[rstest]
    fn should_reject_unknown_building_type(mut compliance_json: Value) {
        compliance_json["building"]["building_type"] = json!("lighthouse");
        assert!(compliance_request_from(compliance_json).is_err());
    }

    #[rstest]
    fn should_reject_non_positive_floor_area(mut compliance_json: Value) {
        compliance_json["building"]["total_floor_area"] = json!(0.0);
        assert!(compliance_request_from(compliance_json).is_err());
    }

    #[rstest]
    fn should_reject_empty_envelope(mut compliance_json: Value) {
        compliance_json["envelope"]["parts"] = json!([]);
        assert!(compliance_request_from(compliance_json).is_err());
    }

    #[rstest]
    fn should_reject_window_without_eta(mut compliance_json: Value) {
        compliance_json["envelope"]["parts"][1]
            .as_object_mut()
            .unwrap()
            .remove("eta_value");
        let error = compliance_request_from(compliance_json).unwrap_err();
        assert_eq!(error.field, "envelope.parts[1].eta_value");
    }

    #[rstest]
    fn should_reject_eta_on_wall(mut compliance_json: Value) {
        compliance_json["envelope"]["parts"][0]["eta_value"] = json!(0.3);
        let error = compliance_request_from(compliance_json).unwrap_err();
        assert_eq!(error.field, "envelope.parts[0].eta_value");
    }

    #[rstest]
    fn should_allow_out_of_range_zone_to_be_resolved_later(mut compliance_json: Value) {
        compliance_json["building"]["climate_zone"] = json!(12);
        assert!(compliance_request_from(compliance_json).is_ok());
    }

    #[rstest]
    fn should_apply_bei_request_defaults() {
        let request = BeiRequest::from_json(
            json!({"building_area_m2": 2000.0, "use": "office", "zone": 6})
                .to_string()
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(request.zone.as_deref(), Some("6"));
        assert_eq!(request.bei_round_digits, 3);
        assert_eq!(request.compliance_threshold, 1.0);
        assert_eq!(request.renewable_energy_deduction_mj, 0.);
        assert!(request.design_energy.is_empty());
    }

    #[rstest]
    fn should_require_use_and_zone_for_single_use() {
        let error = BeiRequest::from_json(
            json!({"building_area_m2": 2000.0, "use": "office"})
                .to_string()
                .as_bytes(),
        )
        .unwrap_err();

        assert_eq!(error.field, "use");
    }

    #[rstest]
    #[case(json!({"use": "office", "zone": "6"}))]
    #[case(json!({"use": "office", "zone": "6", "area_share": 0.5, "area_m2": 1000.0}))]
    fn should_require_exactly_one_area_per_mix_entry(#[case] entry: Value) {
        let error = BeiRequest::from_json(
            json!({"building_area_m2": 2000.0, "usage_mix": [entry]})
                .to_string()
                .as_bytes(),
        )
        .unwrap_err();

        assert_eq!(error.field, "usage_mix[0]");
    }

    #[rstest]
    fn should_reject_out_of_range_round_digits() {
        assert!(BeiRequest::from_json(
            json!({"building_area_m2": 100.0, "use": "office", "zone": "6", "bei_round_digits": 11})
                .to_string()
                .as_bytes(),
        )
        .is_err());
    }

    #[rstest]
    fn should_resolve_mix_areas() {
        let by_share = UsageMix {
            building_use: "office".into(),
            zone: "6".into(),
            area_share: Some(0.7),
            area_m2: None,
        };
        let by_area = UsageMix {
            area_share: None,
            area_m2: Some(600.),
            ..by_share.clone()
        };

        assert_eq!(by_share.resolved_area(2000.), 1400.);
        assert_eq!(by_area.resolved_area(2000.), 600.);
    }

    #[rstest]
    fn should_ingest_single_or_batch_bei_requests() {
        let single = json!({"building_area_m2": 100.0, "use": "office", "zone": "6"});
        let batch = json!([single, single]);

        assert!(matches!(
            ingest_bei_requests(single.to_string().as_bytes()).unwrap(),
            BeiRequests::Single(_)
        ));
        assert!(matches!(
            ingest_bei_requests(batch.to_string().as_bytes()).unwrap(),
            BeiRequests::Batch(requests) if requests.len() == 2 && requests.iter().all(Result::is_ok)
        ));
    }

    #[rstest]
    fn should_keep_invalid_batch_entries_in_place() {
        let batch = json!([
            {"building_area_m2": 100.0, "use": "office", "zone": "6"},
            {"building_area_m2": 100.0, "use": "office"},
            {"building_area_m2": "large"},
        ]);

        let BeiRequests::Batch(requests) =
            ingest_bei_requests(batch.to_string().as_bytes()).unwrap()
        else {
            panic!("expected a batch");
        };

        assert_eq!(requests.len(), 3);
        assert!(requests[0].is_ok());
        assert_eq!(requests[1].as_ref().unwrap_err().field, "[1].use");
        assert_eq!(requests[2].as_ref().unwrap_err().field, "[2].request");
    }

    #[rstest]
    fn should_reject_invalid_single_bei_request() {
        let single = json!({"building_area_m2": 100.0, "use": "office"});

        assert_eq!(
            ingest_bei_requests(single.to_string().as_bytes())
                .unwrap_err()
                .field,
            "use"
        );
    }
}
