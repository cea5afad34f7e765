/// Outcome of the remote narrative extraction.
///
/// Remote-service failures are reported as data: the pipeline degrades to a
/// descriptive string instead of failing the request, and callers that need
/// to distinguish the two cases can match on the variant instead of parsing
/// the text for an error marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeOutcome {
    /// The service returned a formatted `Field: value` answer.
    Answer(String),
    /// The call failed or its response was malformed; the string describes
    /// what went wrong and is surfaced verbatim in the `answers` field.
    Degraded(String),
}

impl NarrativeOutcome {
    /// The string surfaced to the HTTP caller, whichever variant.
    pub fn as_text(&self) -> &str {
        match self {
            NarrativeOutcome::Answer(s) | NarrativeOutcome::Degraded(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            NarrativeOutcome::Answer(s) | NarrativeOutcome::Degraded(s) => s,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, NarrativeOutcome::Degraded(_))
    }
}
