pub mod answer;
pub mod fields;

pub use answer::NarrativeOutcome;
pub use fields::FieldSet;
