use std::sync::OnceLock;

use regex::Regex;

use idscan_core::FieldSet;

use crate::ner::{EntityLabel, EntityTagger};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Label alternatives are ordered longest-first so `ID Number: 123` captures
// the value, not the tail of the label.
re!(re_id_number,
    r"(?i)\b(?:ID Number|ID No|ID)\s?:?\s?([A-Z0-9-]+)");
re!(re_dob,
    r"(?i)\b(?:Date of Birth|DOB|Age)\s?:?\s?(\d{2}[/-]\d{2}[/-]\d{4})");
re!(re_gender,
    r"(?i)\bGender\s?:?\s?(Male|Female|M|F|Other)\b");

// ── Public extraction API ─────────────────────────────────────────────────────

pub struct FieldExtractor;

impl FieldExtractor {
    /// Extract the identity field set from flat OCR text.
    ///
    /// Two passes over disjoint fields: fixed label patterns fill ID Number,
    /// Date of Birth, and Gender; tagged entities fill Name and Father's
    /// Name. Within each pass the first (leftmost) match wins and a filled
    /// slot is never overwritten. Absent fields are a normal outcome.
    pub fn extract(text: &str, tagger: &dyn EntityTagger) -> FieldSet {
        let mut fields = FieldSet::new();

        if let Some(c) = re_id_number().captures(text) {
            fields.id_number = c.get(1).map(|m| m.as_str().to_string());
        }
        if let Some(c) = re_dob().captures(text) {
            fields.date_of_birth = c.get(1).map(|m| m.as_str().to_string());
        }
        if let Some(c) = re_gender().captures(text) {
            fields.gender = c.get(1).map(|m| m.as_str().to_string());
        }

        for entity in tagger.tag(text) {
            if entity.label == EntityLabel::Person && fields.name.is_none() {
                fields.name = Some(entity.text);
            } else if fields.father_name.is_none()
                && entity.text.to_lowercase().contains("father")
            {
                fields.father_name = Some(entity.text);
            }
        }

        fields
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
