//! Raw answers collected from the question flow

use std::collections::BTreeMap;
use std::fmt;

/// A single answer value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Bool(bool),
    Text(String),
}

impl Answer {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Answer::Bool(b) => Some(*b),
            Answer::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            Answer::Bool(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Answer::Bool(_) => "boolean",
            Answer::Text(_) => "text",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Bool(true) => write!(f, "yes"),
            Answer::Bool(false) => write!(f, "no"),
            Answer::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Answers keyed by question key
///
/// Question predicates only ever read keys that were answered earlier in the
/// flow, so an unanswered key reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: BTreeMap<&'static str, Answer>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, answer: Answer) {
        self.values.insert(key, answer);
    }

    pub fn set_bool(&mut self, key: &'static str, value: bool) {
        self.set(key, Answer::Bool(value));
    }

    pub fn set_text(&mut self, key: &'static str, value: impl Into<String>) {
        self.set(key, Answer::Text(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Answer> {
        self.values.get(key)
    }

    /// Boolean view used by question predicates
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Answer::as_bool).unwrap_or(false)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Answer> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Answer)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanswered_flag_reads_false() {
        let answers = Answers::new();
        assert!(!answers.flag("react"));
    }

    #[test]
    fn test_text_answer_is_not_a_flag() {
        let mut answers = Answers::new();
        answers.set_text("react", "yes");
        assert!(!answers.flag("react"));
        assert_eq!(answers.get("react").map(Answer::kind), Some("text"));
    }

    #[test]
    fn test_answer_display() {
        assert_eq!(Answer::Bool(true).to_string(), "yes");
        assert_eq!(Answer::Bool(false).to_string(), "no");
        assert_eq!(Answer::Text("site".into()).to_string(), "site");
    }
}
