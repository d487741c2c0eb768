use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::PositionalId;

/// A respondent's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A yes/no answer given as a boolean.
    Bool(bool),

    /// A rating or other numeric answer.
    Number(f64),

    /// Free text, a single chosen option, or "Yes"/"No".
    Text(String),

    /// The options picked in a multiple-choice question.
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Try to get this value as text. Booleans read as "Yes"/"No".
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(true) => Some("Yes"),
            Self::Bool(false) => Some("No"),
            _ => None,
        }
    }

    /// Try to get this value as a number, parsing text if necessary.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to get the picked options.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(choices) => Some(choices),
            _ => None,
        }
    }

    /// Check if this counts as no answer (blank text or nothing picked).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Choices(choices) => choices.is_empty(),
            _ => false,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Number(_) => "Number",
            Self::Text(_) => "Text",
            Self::Choices(_) => "Choices",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for AnswerValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(choices: Vec<String>) -> Self {
        Self::Choices(choices)
    }
}

/// A respondent's answers, keyed by the positional id of each question.
///
/// Serializes as a plain JSON object, the shape the responses service stores:
///
/// ```
/// use survey_builder_types::{Answers, PositionalId};
///
/// let answers: Answers = serde_json::from_str(r#"{ "q1": "Option 1", "q2": 4 }"#).unwrap();
/// assert_eq!(answers.get(&PositionalId::from("q2")).unwrap().as_number(), Some(4.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: HashMap<PositionalId, AnswerValue>,
}

impl Answers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, id: impl Into<PositionalId>, value: impl Into<AnswerValue>) -> Self {
        self.insert(id, value);
        self
    }

    /// Record an answer.
    pub fn insert(&mut self, id: impl Into<PositionalId>, value: impl Into<AnswerValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Get the answer to a question.
    pub fn get(&self, id: &PositionalId) -> Option<&AnswerValue> {
        self.values.get(id)
    }

    /// Check if a question has a non-blank answer.
    pub fn is_answered(&self, id: &PositionalId) -> bool {
        self.get(id).is_some_and(|value| !value.is_blank())
    }

    /// Remove the answer to a question.
    pub fn remove(&mut self, id: &PositionalId) -> Option<AnswerValue> {
        self.values.remove(id)
    }

    /// Get an iterator over all answers.
    pub fn iter(&self) -> impl Iterator<Item = (&PositionalId, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn answers_deserialize_by_shape() {
        let answers: Answers = serde_json::from_value(json!({
            "q1": "Option 1",
            "q2": 4,
            "q3": true,
            "q4": ["a", "b"],
        }))
        .unwrap();

        let get = |id: &str| answers.get(&PositionalId::from(id)).unwrap();
        assert_eq!(get("q1"), &AnswerValue::Text("Option 1".into()));
        assert_eq!(get("q2"), &AnswerValue::Number(4.0));
        assert_eq!(get("q3").as_text(), Some("Yes"));
        assert_eq!(get("q4").as_choices().unwrap().len(), 2);
    }

    #[test]
    fn blank_answers_do_not_count() {
        let answers = Answers::new()
            .with("q1", "  ")
            .with("q2", Vec::<String>::new())
            .with("q3", 0_i64);
        assert!(!answers.is_answered(&"q1".into()));
        assert!(!answers.is_answered(&"q2".into()));
        assert!(answers.is_answered(&"q3".into()));
        assert!(!answers.is_answered(&"q4".into()));
    }

    #[test]
    fn numbers_parse_from_text() {
        assert_eq!(AnswerValue::from("7").as_number(), Some(7.0));
        assert_eq!(AnswerValue::from(true).as_number(), None);
    }
}
