//! Named-entity tagging over recognized text.
//!
//! The tagger is a capability provider behind a trait: the extraction pass
//! consumes (surface text, label) pairs and stays agnostic of how they were
//! found, so a statistical model can replace the rule-based default without
//! touching the extractor.

/// Semantic category of a recognized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Other,
}

/// A recognized span of the input text, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
}

impl Entity {
    pub fn person(text: impl Into<String>) -> Self {
        Entity {
            text: text.into(),
            label: EntityLabel::Person,
        }
    }

    pub fn other(text: impl Into<String>) -> Self {
        Entity {
            text: text.into(),
            label: EntityLabel::Other,
        }
    }
}

pub trait EntityTagger: Send + Sync {
    /// Recognized entities, ordered by position in the text.
    fn tag(&self, text: &str) -> Vec<Entity>;
}

// ── Rule-based tagger ─────────────────────────────────────────────────────────

/// Document keywords that never belong inside a person-name run.
const STOPWORDS: &[&str] = &[
    "name", "father", "fathers", "date", "birth", "gender", "male", "female",
    "other", "age", "dob", "id", "number", "card", "identity", "national",
    "government", "republic", "issued", "expiry",
];

/// Heuristic person tagger: runs of two or more title-case words become
/// Person entities. Tokens ending with a colon (field labels) and tokens in
/// the keyword stoplist break runs. A run directly preceded by a token
/// containing "father" keeps that token in its span, so relational names
/// stay attributable to the right slot downstream.
///
/// Pure and deterministic — the same text always yields the same entities.
pub struct RuleBasedTagger;

struct Token<'a> {
    /// Token with surrounding punctuation stripped.
    core: &'a str,
    /// Whether the raw token ended with a colon (a field label).
    is_label: bool,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    text.split_whitespace()
        .map(|raw| {
            let is_label = raw.ends_with(':');
            let core = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-');
            Token { core, is_label }
        })
        .collect()
}

fn is_name_word(token: &Token<'_>) -> bool {
    if token.is_label || token.core.len() < 2 {
        return false;
    }
    if STOPWORDS.contains(&token.core.to_lowercase().as_str()) {
        return false;
    }
    let mut chars = token.core.chars();
    let first_upper = chars.next().is_some_and(|c| c.is_uppercase());
    let has_lower = chars.clone().any(|c| c.is_lowercase());
    let rest_plain = chars.all(|c| c.is_alphabetic() || c == '\'' || c == '-');
    first_upper && has_lower && rest_plain
}

impl EntityTagger for RuleBasedTagger {
    fn tag(&self, text: &str) -> Vec<Entity> {
        let tokens = tokenize(text);
        let mut entities = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if !is_name_word(&tokens[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i < tokens.len() && is_name_word(&tokens[i]) {
                i += 1;
            }
            if i - start < 2 {
                continue;
            }

            let mut words: Vec<&str> = tokens[start..i].iter().map(|t| t.core).collect();
            // Attach a preceding father-label so the relational span is
            // recognizable as such.
            if start > 0 && tokens[start - 1].core.to_lowercase().contains("father") {
                words.insert(0, tokens[start - 1].core);
            }
            entities.push(Entity::person(words.join(" ")));
        }

        entities
    }
}

// ── Mock tagger ───────────────────────────────────────────────────────────────

/// Preset entities, ignoring the input text — for extractor tests.
pub struct MockTagger {
    entities: Vec<Entity>,
}

impl MockTagger {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

impl EntityTagger for MockTagger {
    fn tag(&self, _text: &str) -> Vec<Entity> {
        self.entities.clone()
    }
}
