use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::{info, warn};

/// The kinds of advisory note that a calculation can record.
///
/// None of these abort a calculation: they report a substitution or an inconsistency so that
/// a caller never needs to re-derive the inputs to find out what the engine assumed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    UnitGuessed,
    DefaultFactorUsed,
    TotalMismatch,
    TotalDerived,
    CatalogMiss,
    CatalogUnavailable,
    AreaMismatch,
    ZoneFallback,
    DefaultEfficiency,
}

impl NoteKind {
    /// Whether the note points at questionable input data rather than a routine default.
    fn is_warning(&self) -> bool {
        matches!(
            self,
            NoteKind::DefaultFactorUsed
                | NoteKind::TotalMismatch
                | NoteKind::CatalogMiss
                | NoteKind::CatalogUnavailable
                | NoteKind::AreaMismatch
                | NoteKind::ZoneFallback
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Note {
    pub kind: NoteKind,
    pub message: String,
}

impl Note {
    fn new(kind: NoteKind, message: String) -> Self {
        Self { kind, message }
    }

    pub(crate) fn unit_guessed(category: &str, unit: &str) -> Self {
        Self::new(
            NoteKind::UnitGuessed,
            format!("No unit given for category '{category}'; assumed '{unit}'"),
        )
    }

    pub(crate) fn default_factor_used(category: &str, unit: &str, factor: f64) -> Self {
        Self::new(
            NoteKind::DefaultFactorUsed,
            format!(
                "Unit '{unit}' for category '{category}' has no known primary energy factor; used default factor {factor}"
            ),
        )
    }

    pub(crate) fn total_mismatch(category_sum: f64, declared_total: f64) -> Self {
        Self::new(
            NoteKind::TotalMismatch,
            format!(
                "Used declared total {declared_total:.1} MJ/m2/year rather than category sum {category_sum:.1} MJ/m2/year"
            ),
        )
    }

    pub(crate) fn total_derived(total: f64) -> Self {
        Self::new(
            NoteKind::TotalDerived,
            format!("Standard intensity derived from category sum: {total:.1} MJ/m2/year"),
        )
    }

    pub(crate) fn catalog_use_missing(building_use: &str) -> Self {
        Self::new(
            NoteKind::CatalogMiss,
            format!("No catalog entry for use '{building_use}'; standard intensity left empty"),
        )
    }

    pub(crate) fn catalog_zone_missing(building_use: &str, zone: &str) -> Self {
        Self::new(
            NoteKind::CatalogMiss,
            format!(
                "No catalog entry for use '{building_use}' in zone {zone}; standard intensity left empty"
            ),
        )
    }

    pub(crate) fn catalog_unavailable(reason: &str) -> Self {
        Self::new(
            NoteKind::CatalogUnavailable,
            format!("Standard intensity catalog could not be read: {reason}"),
        )
    }

    pub(crate) fn area_mismatch(mix_area: f64, building_area: f64) -> Self {
        Self::new(
            NoteKind::AreaMismatch,
            format!(
                "Usage mix areas sum to {mix_area:.1} m2 but building area is {building_area:.1} m2"
            ),
        )
    }

    pub(crate) fn zone_fallback(requested: i64, fallback: u8) -> Self {
        Self::new(
            NoteKind::ZoneFallback,
            format!("Climate zone {requested} is outside 1-8; zone {fallback} was used instead"),
        )
    }

    pub(crate) fn default_efficiency(end_use: &str, system_type: &str, efficiency: f64) -> Self {
        Self::new(
            NoteKind::DefaultEfficiency,
            format!(
                "No efficiency given for {end_use} system '{system_type}'; default {efficiency} used"
            ),
        )
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Ordered collection of the notes recorded while evaluating one request.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Notes(Vec<Note>);

impl Notes {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, note: Note) {
        if note.kind.is_warning() {
            warn!(kind = ?note.kind, "{}", note.message);
        } else {
            info!(kind = ?note.kind, "{}", note.message);
        }
        self.0.push(note);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count_of(&self, kind: NoteKind) -> usize {
        self.0.iter().filter(|note| note.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Note> {
        self.0
    }
}

impl From<Notes> for Vec<Note> {
    fn from(notes: Notes) -> Self {
        notes.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    #[rstest]
    fn should_keep_notes_in_recorded_order() {
        let mut notes = Notes::new();
        notes.push(Note::unit_guessed("lighting", "kWh"));
        notes.push(Note::area_mismatch(1900., 2000.));
        notes.push(Note::unit_guessed("cooling", "kWh"));

        let kinds = notes.iter().map(|note| note.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                NoteKind::UnitGuessed,
                NoteKind::AreaMismatch,
                NoteKind::UnitGuessed
            ]
        );
        assert_eq!(notes.count_of(NoteKind::UnitGuessed), 2);
    }

    #[rstest]
    fn should_serialize_note_with_kind_and_message() {
        let note = Note::zone_fallback(11, 6);
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({
                "kind": "zone_fallback",
                "message": "Climate zone 11 is outside 1-8; zone 6 was used instead",
            })
        );
    }

    #[rstest]
    fn should_report_both_values_on_total_mismatch() {
        let note = Note::total_mismatch(418.04, 420.);
        assert_eq!(
            note.to_string(),
            "Used declared total 420.0 MJ/m2/year rather than category sum 418.0 MJ/m2/year"
        );
    }
}
