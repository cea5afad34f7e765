use serde::{Deserialize, Serialize};

/// The fixed set of identity attributes the extractors try to fill.
///
/// Each slot holds the first satisfying match and is never overwritten once
/// set; a slot left at `None` means no match was found, which is a normal
/// outcome rather than an error. Serialized field names match the wire
/// contract (`ID Number`, `Name`, …); absent slots are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    #[serde(rename = "ID Number", skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Father's Name", skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(rename = "Date of Birth", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(rename = "Gender", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field matched at all.
    pub fn is_empty(&self) -> bool {
        self.id_number.is_none()
            && self.name.is_none()
            && self.father_name.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
    }

    /// Number of filled slots (0–5).
    pub fn filled(&self) -> usize {
        [
            &self.id_number,
            &self.name,
            &self.father_name,
            &self.date_of_birth,
            &self.gender,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}
