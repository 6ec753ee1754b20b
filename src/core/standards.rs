use crate::core::material_properties::WATER;
use crate::notes::Note;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

/// This module contains the building and equipment standards tables used by the
/// compliance path: model-building intensities, per-zone corrections, degree days,
/// envelope thresholds, floor-area scale schedules, default equipment efficiencies,
/// and the operating profiles of each building type.
///
/// All tables are held in a single immutable `StandardsTables` value, which defaults to
/// the canonical values but can be deserialised from JSON to substitute alternatives.

pub const NUMBER_OF_CLIMATE_ZONES: usize = 8;
pub const FALLBACK_CLIMATE_ZONE: u8 = 6;

#[derive(
    Clone, Copy, Debug, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize, StrumDisplay,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BuildingType {
    #[serde(alias = "事務所")]
    Office,
    #[serde(alias = "ホテル")]
    Hotel,
    #[serde(alias = "病院")]
    Hospital,
    ShopDepartment,
    ShopSupermarket,
    #[serde(alias = "学校")]
    SchoolSmall,
    SchoolHigh,
    SchoolUniversity,
    Restaurant,
    Assembly,
    Factory,
    #[serde(alias = "residential", alias = "共同住宅")]
    ResidentialCollective,
}

impl BuildingType {
    pub fn is_residential(&self) -> bool {
        matches!(self, BuildingType::ResidentialCollective)
    }

    /// The operating profile (annual hours, hot water demand) that the building type follows.
    pub fn operating_profile(&self) -> OperatingProfile {
        match self {
            BuildingType::Office | BuildingType::Assembly | BuildingType::Factory => {
                OperatingProfile::Office
            }
            BuildingType::Hotel => OperatingProfile::Hotel,
            BuildingType::Hospital => OperatingProfile::Hospital,
            BuildingType::ShopDepartment
            | BuildingType::ShopSupermarket
            | BuildingType::Restaurant => OperatingProfile::Retail,
            BuildingType::SchoolSmall | BuildingType::SchoolHigh | BuildingType::SchoolUniversity => {
                OperatingProfile::School
            }
            BuildingType::ResidentialCollective => OperatingProfile::Residential,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, StrumDisplay)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperatingProfile {
    Office,
    Hotel,
    Hospital,
    Residential,
    Retail,
    School,
}

/// The end uses that the model building method and the detailed estimator both cover.
#[derive(
    Clone, Copy, Debug, Deserialize, EnumIter, Eq, Hash, PartialEq, Serialize, StrumDisplay,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EndUse {
    Heating,
    Cooling,
    Ventilation,
    HotWater,
    Lighting,
    Elevator,
}

/// A climate zone in the range 1-8, where 1 is the coldest.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClimateZone(u8);

impl ClimateZone {
    pub fn new(zone: u8) -> Option<Self> {
        (1..=NUMBER_OF_CLIMATE_ZONES as u8)
            .contains(&zone)
            .then_some(Self(zone))
    }

    /// Resolve a requested zone number, falling back to zone 6 (with a note) when the
    /// number is outside 1-8.
    pub fn resolve(requested: i64) -> (Self, Option<Note>) {
        match u8::try_from(requested).ok().and_then(Self::new) {
            Some(zone) => (zone, None),
            None => (
                Self(FALLBACK_CLIMATE_ZONE),
                Some(Note::zone_fallback(requested, FALLBACK_CLIMATE_ZONE)),
            ),
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    fn index(&self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (1..=NUMBER_OF_CLIMATE_ZONES as u8).map(Self)
    }
}

impl Display for ClimateZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Annual primary energy intensities per end use, in MJ/m2/year.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EndUseIntensities {
    pub heating: f64,
    pub cooling: f64,
    pub ventilation: f64,
    pub hot_water: f64,
    pub lighting: f64,
    pub elevator: f64,
}

impl EndUseIntensities {
    pub fn get(&self, end_use: EndUse) -> f64 {
        match end_use {
            EndUse::Heating => self.heating,
            EndUse::Cooling => self.cooling,
            EndUse::Ventilation => self.ventilation,
            EndUse::HotWater => self.hot_water,
            EndUse::Lighting => self.lighting,
            EndUse::Elevator => self.elevator,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EndUse, f64)> + '_ {
        EndUse::iter().map(|end_use| (end_use, self.get(end_use)))
    }

    pub fn total(&self) -> f64 {
        self.iter().map(|(_, intensity)| intensity).sum()
    }
}

const fn intensities(
    heating: f64,
    cooling: f64,
    ventilation: f64,
    hot_water: f64,
    lighting: f64,
    elevator: f64,
) -> EndUseIntensities {
    EndUseIntensities {
        heating,
        cooling,
        ventilation,
        hot_water,
        lighting,
        elevator,
    }
}

/// Multipliers applied to the heating and cooling model-building intensities in a zone.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RegionalCorrection {
    pub heating: f64,
    pub cooling: f64,
}

/// Envelope thresholds in a zone. A threshold of `None` means no limit applies.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeStandard {
    pub ua_threshold: Option<f64>,
    pub eta_a_threshold: Option<f64>,
}

/// A step schedule of scale factors by floor area. Each step applies up to and including
/// its upper bound, and `otherwise` applies above the last step.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleSchedule {
    pub steps: Vec<ScaleStep>,
    pub otherwise: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleStep {
    pub up_to_area: f64,
    pub factor: f64,
}

impl ScaleSchedule {
    fn new(steps: &[(f64, f64)], otherwise: f64) -> Self {
        Self {
            steps: steps
                .iter()
                .map(|&(up_to_area, factor)| ScaleStep { up_to_area, factor })
                .collect(),
            otherwise,
        }
    }

    pub fn factor_for(&self, floor_area: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| floor_area <= step.up_to_area)
            .map(|step| step.factor)
            .unwrap_or(self.otherwise)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleSchedules {
    pub office: ScaleSchedule,
    pub hotel: ScaleSchedule,
    pub other: ScaleSchedule,
}

/// Default rated efficiencies (COP, or thermal efficiency for boilers) by system type,
/// used when a request does not declare one.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EfficiencyDefaults {
    #[serde(default)]
    pub by_system_type: IndexMap<String, f64>,
    pub fallback: f64,
}

impl EfficiencyDefaults {
    fn new(by_system_type: &[(&str, f64)], fallback: f64) -> Self {
        Self {
            by_system_type: by_system_type
                .iter()
                .map(|&(system_type, efficiency)| (system_type.to_owned(), efficiency))
                .collect(),
            fallback,
        }
    }

    pub fn for_system_type(&self, system_type: &str) -> f64 {
        self.by_system_type
            .get(system_type)
            .copied()
            .unwrap_or(self.fallback)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultEfficiencies {
    pub heating: EfficiencyDefaults,
    pub cooling: EfficiencyDefaults,
    pub hot_water: EfficiencyDefaults,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OperatingProfileData {
    pub annual_hours: f64,
    pub hot_water_litres_per_m2_day: f64,
}

/// Constants of the degree-day model used to estimate heating or cooling energy.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DegreeDayModel {
    /// design indoor/outdoor temperature difference, in K
    pub design_delta_t: f64,
    /// peak load, in W/m2
    pub peak_load_w_per_m2: f64,
    pub part_load_ratio: f64,
    /// multiplier applied to rated efficiency to give operational efficiency
    pub operational_derate: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VentilationModel {
    /// default airflow per m2 of floor area (ceiling height x air changes per hour), in m3/h
    pub airflow_m3h_per_m2: f64,
    /// default fan power per unit airflow, in W per m3/h
    pub fan_power_w_per_m3h: f64,
    /// fraction of heat exchange efficiency credited as a fan energy reduction
    pub heat_recovery_reduction: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandardsTables {
    pub model_building: IndexMap<BuildingType, EndUseIntensities>,
    pub regional_corrections: [RegionalCorrection; NUMBER_OF_CLIMATE_ZONES],
    pub heating_degree_days: [f64; NUMBER_OF_CLIMATE_ZONES],
    pub cooling_degree_days: [f64; NUMBER_OF_CLIMATE_ZONES],
    pub envelope: [EnvelopeStandard; NUMBER_OF_CLIMATE_ZONES],
    pub scale_schedules: ScaleSchedules,
    pub default_efficiencies: DefaultEfficiencies,
    pub operating_profiles: IndexMap<OperatingProfile, OperatingProfileData>,
    pub heating_model: DegreeDayModel,
    pub cooling_model: DegreeDayModel,
    pub ventilation_model: VentilationModel,
    /// temperature rise applied to supplied hot water, in K
    pub hot_water_temperature_rise: f64,
    /// W/m2
    pub default_lighting_power_density: f64,
    /// MJ/m2/year, non-residential buildings only
    pub elevator_intensity: f64,
}

/// Daily hot water draw, in L/m2/day, that takes the given annual energy (MJ/m2/year) to
/// heat through the temperature rise.
pub fn hot_water_draw_for(annual_mj_per_m2: f64, temperature_rise: f64) -> f64 {
    annual_mj_per_m2 / WATER.annual_energy_to_heat_mj(1., temperature_rise)
}

impl Default for StandardsTables {
    fn default() -> Self {
        let correction = |heating, cooling| RegionalCorrection { heating, cooling };
        let envelope = |ua_threshold, eta_a_threshold| EnvelopeStandard {
            ua_threshold: Some(ua_threshold),
            eta_a_threshold: Some(eta_a_threshold),
        };
        let hot_water_temperature_rise = 35.;
        // hot water demand is tabulated as annual MJ/m2 and drawn as the equivalent volume
        let profile = |annual_hours, hot_water_mj_per_m2_year| OperatingProfileData {
            annual_hours,
            hot_water_litres_per_m2_day: hot_water_draw_for(
                hot_water_mj_per_m2_year,
                hot_water_temperature_rise,
            ),
        };

        Self {
            model_building: IndexMap::from([
                (BuildingType::Office, intensities(38., 38., 28., 3., 95., 14.)),
                (BuildingType::Hotel, intensities(54., 54., 28., 176., 70., 14.)),
                (BuildingType::Hospital, intensities(72., 72., 89., 176., 98., 14.)),
                (BuildingType::ShopDepartment, intensities(20., 20., 28., 3., 126., 14.)),
                (BuildingType::ShopSupermarket, intensities(20., 20., 28., 3., 140., 14.)),
                (BuildingType::SchoolSmall, intensities(58., 23., 14., 17., 49., 2.)),
                (BuildingType::ResidentialCollective, intensities(38., 38., 14., 105., 42., 14.)),
            ]),
            regional_corrections: [
                correction(2.38, 0.66),
                correction(2.01, 0.69),
                correction(1.54, 0.86),
                correction(1.16, 0.99),
                correction(1.07, 1.07),
                correction(0.84, 1.15),
                correction(0.70, 1.27),
                correction(0.36, 1.35),
            ],
            heating_degree_days: [3800., 3400., 2800., 2200., 1800., 1500., 1000., 500.],
            cooling_degree_days: [83., 160., 297., 459., 608., 835., 1071., 1385.],
            envelope: [
                envelope(0.46, 2.8),
                envelope(0.46, 2.8),
                envelope(0.56, 2.8),
                envelope(0.56, 3.0),
                envelope(0.62, 3.0),
                envelope(0.62, 2.8),
                envelope(0.68, 2.7),
                envelope(0.68, 3.2),
            ],
            scale_schedules: ScaleSchedules {
                office: ScaleSchedule::new(
                    &[(300., 1.00), (1000., 0.95), (5000., 0.90), (10000., 0.85)],
                    0.80,
                ),
                hotel: ScaleSchedule::new(&[(2000., 1.00), (5000., 0.95), (10000., 0.90)], 0.85),
                other: ScaleSchedule::new(&[(1000., 1.00), (5000., 0.95), (10000., 0.90)], 0.85),
            },
            default_efficiencies: DefaultEfficiencies {
                heating: EfficiencyDefaults::new(
                    &[
                        ("room_air_conditioner", 3.8),
                        ("air_conditioner", 3.6),
                        ("boiler", 0.85),
                        ("ルームエアコン", 3.8),
                        ("エアコン", 3.6),
                        ("ボイラー", 0.85),
                    ],
                    3.8,
                ),
                cooling: EfficiencyDefaults::new(
                    &[
                        ("room_air_conditioner", 3.5),
                        ("air_conditioner", 3.2),
                        ("chiller", 4.5),
                        ("ルームエアコン", 3.5),
                        ("エアコン", 3.2),
                        ("チラー", 4.5),
                    ],
                    3.5,
                ),
                hot_water: EfficiencyDefaults::new(&[], 0.85),
            },
            operating_profiles: IndexMap::from([
                (OperatingProfile::Office, profile(2750., 1.5)),
                (OperatingProfile::Hotel, profile(6570., 80.)),
                (OperatingProfile::Hospital, profile(8760., 30.)),
                (OperatingProfile::Residential, profile(8760., 40.)),
                (OperatingProfile::Retail, profile(3650., 2.)),
                (OperatingProfile::School, profile(1800., 3.)),
            ]),
            heating_model: DegreeDayModel {
                design_delta_t: 20.,
                peak_load_w_per_m2: 45.,
                part_load_ratio: 0.35,
                operational_derate: 0.85,
            },
            cooling_model: DegreeDayModel {
                design_delta_t: 15.,
                peak_load_w_per_m2: 80.,
                part_load_ratio: 0.30,
                operational_derate: 0.80,
            },
            ventilation_model: VentilationModel {
                // 3.0m ceiling height at 0.5 air changes per hour
                airflow_m3h_per_m2: 3.0 * 0.5,
                fan_power_w_per_m3h: 0.15,
                heat_recovery_reduction: 0.3,
            },
            hot_water_temperature_rise,
            default_lighting_power_density: 10.,
            elevator_intensity: 14.,
        }
    }
}

impl StandardsTables {
    pub fn from_json(json: impl std::io::Read) -> anyhow::Result<Self> {
        Ok(serde_json::from_reader(json)?)
    }

    pub fn model_building_intensities(
        &self,
        building_type: BuildingType,
    ) -> Option<&EndUseIntensities> {
        self.model_building.get(&building_type)
    }

    pub fn regional_correction(&self, zone: ClimateZone) -> RegionalCorrection {
        self.regional_corrections[zone.index()]
    }

    pub fn heating_degree_days(&self, zone: ClimateZone) -> f64 {
        self.heating_degree_days[zone.index()]
    }

    pub fn cooling_degree_days(&self, zone: ClimateZone) -> f64 {
        self.cooling_degree_days[zone.index()]
    }

    pub fn envelope_standard(&self, zone: ClimateZone) -> EnvelopeStandard {
        self.envelope[zone.index()]
    }

    /// Floor-area scale factor for a building. Residential types are never scaled.
    pub fn scale_factor(&self, building_type: BuildingType, floor_area: f64) -> f64 {
        if building_type.is_residential() {
            return 1.0;
        }

        match building_type {
            BuildingType::Office => &self.scale_schedules.office,
            BuildingType::Hotel => &self.scale_schedules.hotel,
            _ => &self.scale_schedules.other,
        }
        .factor_for(floor_area)
    }

    /// Operating profile data for a building type, using the office profile if a
    /// substituted table omits the building type's profile.
    pub fn operating_profile(&self, building_type: BuildingType) -> OperatingProfileData {
        self.operating_profiles
            .get(&building_type.operating_profile())
            .or_else(|| self.operating_profiles.get(&OperatingProfile::Office))
            .copied()
            .unwrap_or(OperatingProfileData {
                annual_hours: 2750.,
                hot_water_litres_per_m2_day: hot_water_draw_for(
                    1.5,
                    self.hot_water_temperature_rise,
                ),
            })
    }
}
