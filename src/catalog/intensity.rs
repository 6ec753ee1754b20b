use crate::compare_floats::differs_by_more_than;
use crate::notes::{Note, Notes};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// Largest difference, in MJ/m2/year, tolerated between a declared total and the sum of
/// its categories before it is reported.
pub const TOTAL_TOLERANCE: f64 = 0.1;

pub const TOTAL_KEY: &str = "total_MJ_per_m2_year";

/// Categories every catalog entry is expected to carry.
pub const REQUIRED_CATEGORIES: [&str; 5] = ["lighting", "cooling", "heating", "ventilation", "hot_water"];

/// Map a catalog key onto its canonical category name, reconciling aliases.
pub fn canonical_category(key: &str) -> Option<&'static str> {
    match key {
        "lighting" => Some("lighting"),
        "cooling" => Some("cooling"),
        "heating" => Some("heating"),
        "ventilation" => Some("ventilation"),
        "hot_water" => Some("hot_water"),
        "elevator" => Some("elevator"),
        "outlet_and_others" | "others" | "outlet" | "outlets" => Some("outlet_and_others"),
        _ => None,
    }
}

/// Standard annual primary energy intensities of a use in a zone, in MJ/m2/year.
///
/// Any category may be absent, as may the declared total.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StandardIntensity {
    pub lighting: Option<f64>,
    pub cooling: Option<f64>,
    pub heating: Option<f64>,
    pub ventilation: Option<f64>,
    pub hot_water: Option<f64>,
    pub outlet_and_others: Option<f64>,
    pub elevator: Option<f64>,
    #[serde(rename = "total_MJ_per_m2_year")]
    pub declared_total: Option<f64>,
}

impl StandardIntensity {
    /// Build an intensity from a raw catalog zone entry. Unrecognised keys and non-numeric
    /// values are ignored.
    pub(crate) fn from_mapping(entry: &Mapping) -> Self {
        let mut intensity = Self::default();

        for (key, value) in entry {
            let (Some(key), Some(value)) = (key.as_str(), value.as_f64()) else {
                continue;
            };
            if key == TOTAL_KEY {
                intensity.declared_total = Some(value);
            } else if let Some(category) = canonical_category(key) {
                // a canonically named key wins over its aliases
                if key == category || intensity.category(category).is_none() {
                    intensity.set_category(category, value);
                }
            }
        }

        intensity
    }

    pub fn category(&self, category: &str) -> Option<f64> {
        match category {
            "lighting" => self.lighting,
            "cooling" => self.cooling,
            "heating" => self.heating,
            "ventilation" => self.ventilation,
            "hot_water" => self.hot_water,
            "outlet_and_others" => self.outlet_and_others,
            "elevator" => self.elevator,
            _ => None,
        }
    }

    fn set_category(&mut self, category: &str, value: f64) {
        let field = match category {
            "lighting" => &mut self.lighting,
            "cooling" => &mut self.cooling,
            "heating" => &mut self.heating,
            "ventilation" => &mut self.ventilation,
            "hot_water" => &mut self.hot_water,
            "outlet_and_others" => &mut self.outlet_and_others,
            "elevator" => &mut self.elevator,
            _ => return,
        };
        *field = Some(value);
    }

    /// Categories present in this intensity, in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        [
            ("lighting", self.lighting),
            ("cooling", self.cooling),
            ("heating", self.heating),
            ("ventilation", self.ventilation),
            ("hot_water", self.hot_water),
            ("outlet_and_others", self.outlet_and_others),
            ("elevator", self.elevator),
        ]
        .into_iter()
        .filter_map(|(category, value)| value.map(|value| (category, value)))
    }

    pub fn missing_required_categories(&self) -> Vec<&'static str> {
        REQUIRED_CATEGORIES
            .into_iter()
            .filter(|category| self.category(category).is_none())
            .collect()
    }

    /// Sum of the present categories; zero (never negative zero) when none are present.
    pub fn category_sum(&self) -> f64 {
        self.categories().fold(0., |sum, (_, value)| sum + value)
    }

    /// Whether the declared total and the category sum disagree beyond tolerance.
    pub fn has_total_mismatch(&self) -> bool {
        self.declared_total.is_some_and(|declared| {
            differs_by_more_than(self.category_sum(), declared, TOTAL_TOLERANCE)
        })
    }

    /// Total standard intensity in MJ/m2/year.
    ///
    /// The declared total is preferred, even when it disagrees with the category sum (in
    /// which case both are noted). Without a declared total, the category sum is used.
    pub fn total_intensity(&self, notes: &mut Notes) -> f64 {
        match self.declared_total {
            Some(declared) => {
                if self.has_total_mismatch() {
                    notes.push(Note::total_mismatch(self.category_sum(), declared));
                }
                declared
            }
            None => {
                let total = self.category_sum();
                notes.push(Note::total_derived(total));
                total
            }
        }
    }
}

/// The outcome of looking a use and zone up in a catalog.
#[derive(Clone, Debug, PartialEq)]
pub enum IntensityLookup {
    Found(StandardIntensity),
    Missing(Note),
}

impl IntensityLookup {
    /// The intensity found, or an all-absent intensity with the reason recorded in `notes`.
    pub fn into_intensity(self, notes: &mut Notes) -> StandardIntensity {
        match self {
            IntensityLookup::Found(intensity) => intensity,
            IntensityLookup::Missing(note) => {
                notes.push(note);
                StandardIntensity::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NoteKind;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[fixture]
    fn office_zone_six() -> StandardIntensity {
        StandardIntensity::from_mapping(&mapping(
            "
lighting: 58
cooling: 119
heating: 30
ventilation: 38
hot_water: 12
outlet_and_others: 163
total_MJ_per_m2_year: 420
",
        ))
    }

    #[rstest]
    fn should_prefer_consistent_declared_total(office_zone_six: StandardIntensity) {
        let mut notes = Notes::new();
        assert_eq!(office_zone_six.total_intensity(&mut notes), 420.);
        assert!(notes.is_empty());
    }

    #[rstest]
    fn should_keep_declared_total_on_mismatch_and_note_both() {
        let intensity = StandardIntensity::from_mapping(&mapping(
            "lighting: 100\ncooling: 100\ntotal_MJ_per_m2_year: 250",
        ));
        let mut notes = Notes::new();

        assert_eq!(intensity.total_intensity(&mut notes), 250.);
        assert_eq!(notes.count_of(NoteKind::TotalMismatch), 1);
        let message = notes.iter().next().unwrap().message.clone();
        assert!(message.contains("250.0") && message.contains("200.0"));
    }

    #[rstest]
    fn should_tolerate_small_total_difference() {
        let intensity = StandardIntensity::from_mapping(&mapping(
            "lighting: 100.05\ncooling: 100\ntotal_MJ_per_m2_year: 200",
        ));
        let mut notes = Notes::new();

        assert_eq!(intensity.total_intensity(&mut notes), 200.);
        assert!(notes.is_empty());
    }

    #[rstest]
    fn should_derive_total_from_categories_when_undeclared() {
        let intensity = StandardIntensity::from_mapping(&mapping("lighting: 70\nheating: 30.5"));
        let mut notes = Notes::new();

        assert_eq!(intensity.total_intensity(&mut notes), 100.5);
        assert_eq!(notes.count_of(NoteKind::TotalDerived), 1);
    }

    #[rstest]
    fn should_derive_unsigned_zero_for_empty_entry() {
        let mut notes = Notes::new();

        let total = StandardIntensity::default().total_intensity(&mut notes);

        assert_eq!(total, 0.);
        assert!(total.is_sign_positive());
        assert_eq!(
            notes.iter().next().unwrap().message,
            "Standard intensity derived from category sum: 0.0 MJ/m2/year"
        );
    }

    #[rstest]
    #[case("others")]
    #[case("outlet")]
    #[case("outlets")]
    fn should_reconcile_outlet_aliases(#[case] alias: &str) {
        let intensity = StandardIntensity::from_mapping(&mapping(&format!("{alias}: 82")));
        assert_eq!(intensity.outlet_and_others, Some(82.));
    }

    #[rstest]
    fn should_prefer_canonical_name_over_alias() {
        let intensity =
            StandardIntensity::from_mapping(&mapping("outlet_and_others: 90\nothers: 82"));
        assert_eq!(intensity.outlet_and_others, Some(90.));
    }

    #[rstest]
    fn should_ignore_unknown_keys_and_non_numeric_values() {
        let intensity = StandardIntensity::from_mapping(&mapping(
            "lighting: 58\nsource: survey 2024\ncooling: n/a\nprocess: 12",
        ));
        assert_eq!(
            intensity,
            StandardIntensity {
                lighting: Some(58.),
                ..Default::default()
            }
        );
        assert_eq!(
            intensity.missing_required_categories(),
            vec!["cooling", "heating", "ventilation", "hot_water"]
        );
    }

    #[rstest]
    fn should_record_note_when_lookup_misses() {
        let mut notes = Notes::new();
        let intensity =
            IntensityLookup::Missing(Note::catalog_use_missing("aquarium")).into_intensity(&mut notes);

        assert_eq!(intensity, StandardIntensity::default());
        assert_eq!(notes.count_of(NoteKind::CatalogMiss), 1);
    }
}
