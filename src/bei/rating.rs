use serde::Serialize;
use strum::Display;

/// Upper BEI bounds (inclusive) for 5, 4, 3 and 2 BELS stars. Anything above earns 1 star.
const BELS_STAR_BOUNDS: [(f64, u8); 4] = [(0.6, 5), (0.7, 4), (0.8, 3), (0.9, 2)];

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZebLevel {
    Zeb,
    NearlyZeb,
    ZebReady,
    ZebOriented,
    NotApplicable,
}

impl ZebLevel {
    pub fn from_bei(bei: f64) -> Self {
        if bei <= 0.0 {
            ZebLevel::Zeb
        } else if bei <= 0.25 {
            ZebLevel::NearlyZeb
        } else if bei <= 0.5 {
            ZebLevel::ZebReady
        } else if bei <= 0.6 {
            ZebLevel::ZebOriented
        } else {
            ZebLevel::NotApplicable
        }
    }
}

/// Energy performance labels for a BEI, always taken from the unrounded value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rating {
    pub bels_stars: u8,
    pub zeb_level: ZebLevel,
}

impl Rating {
    pub fn from_bei(bei: f64) -> Self {
        Self {
            bels_stars: bels_stars(bei),
            zeb_level: ZebLevel::from_bei(bei),
        }
    }
}

pub fn bels_stars(bei: f64) -> u8 {
    BELS_STAR_BOUNDS
        .iter()
        .find(|(bound, _)| bei <= *bound)
        .map_or(1, |(_, stars)| *stars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(0.45, 5)]
    #[case(0.6, 5)]
    #[case(0.6001, 4)]
    #[case(0.7, 4)]
    #[case(0.75, 3)]
    #[case(0.9, 2)]
    #[case(0.95, 1)]
    #[case(1.4, 1)]
    fn should_award_bels_stars(#[case] bei: f64, #[case] expected: u8) {
        assert_eq!(bels_stars(bei), expected);
    }

    #[rstest]
    #[case(-0.1, ZebLevel::Zeb)]
    #[case(0.0, ZebLevel::Zeb)]
    #[case(0.2, ZebLevel::NearlyZeb)]
    #[case(0.25, ZebLevel::NearlyZeb)]
    #[case(0.5, ZebLevel::ZebReady)]
    #[case(0.55, ZebLevel::ZebOriented)]
    #[case(0.61, ZebLevel::NotApplicable)]
    fn should_classify_zeb_level(#[case] bei: f64, #[case] expected: ZebLevel) {
        assert_eq!(ZebLevel::from_bei(bei), expected);
    }

    #[rstest]
    fn should_serialize_rating() {
        assert_eq!(
            serde_json::to_value(Rating::from_bei(0.58)).unwrap(),
            serde_json::json!({"bels_stars": 5, "zeb_level": "zeb_oriented"})
        );
    }
}
