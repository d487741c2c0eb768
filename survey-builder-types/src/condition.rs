use std::fmt;

use serde::{Deserialize, Serialize};

/// A rule making a question visible only for a specific answer to an earlier one.
///
/// The identifier type says which scheme `depends_on` uses: the editor works with
/// `ConditionRule<EditId>`, the persisted document with `ConditionRule<PositionalId>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule<Id> {
    /// The prerequisite question. Must precede the dependent question.
    pub depends_on: Id,

    /// How the respondent's answer is compared against `condition_value`.
    pub condition_type: ConditionType,

    /// The value that triggers visibility.
    pub condition_value: ConditionValue,
}

impl<Id> ConditionRule<Id> {
    /// Create a new rule.
    pub fn new(
        depends_on: Id,
        condition_type: ConditionType,
        condition_value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            depends_on,
            condition_type,
            condition_value: condition_value.into(),
        }
    }

    /// Create an `equals` rule.
    pub fn equals(depends_on: Id, condition_value: impl Into<ConditionValue>) -> Self {
        Self::new(depends_on, ConditionType::Equals, condition_value)
    }

    /// Translate the prerequisite reference into another identifier scheme.
    pub fn with_depends_on<Other>(self, depends_on: Other) -> ConditionRule<Other> {
        ConditionRule {
            depends_on,
            condition_type: self.condition_type,
            condition_value: self.condition_value,
        }
    }
}

/// The comparison a condition rule applies.
///
/// Only [`ConditionType::Equals`] applies to single-choice and yes/no
/// prerequisites; rating prerequisites allow all four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    #[serde(alias = "answerValueIs")]
    Equals,

    #[serde(alias = "not-equals", alias = "answerValueNotIs")]
    NotEquals,

    #[serde(alias = "greater-than", alias = "answerValueGreaterThan")]
    GreaterThan,

    #[serde(alias = "less-than", alias = "answerValueLessThan")]
    LessThan,
}

impl ConditionType {
    /// Every condition type, in the order an editor offers them.
    pub const ALL: [ConditionType; 4] = [
        Self::Equals,
        Self::GreaterThan,
        Self::LessThan,
        Self::NotEquals,
    ];

    /// The serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
        }
    }

    /// Human-readable label for a rule editor.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equals => "Answer Is Equal To",
            Self::NotEquals => "Answer Is Not Equal To",
            Self::GreaterThan => "Answer Is Greater Than",
            Self::LessThan => "Answer Is Less Than",
        }
    }

    /// Check if this comparison only makes sense for numeric answers.
    pub fn is_numeric_only(&self) -> bool {
        !matches!(self, Self::Equals)
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a condition rule compares the respondent's answer against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// A JSON number, as written by numeric rule editors.
    Number(serde_json::Number),

    /// A string: an option label, "Yes"/"No", or a number typed as text.
    Text(String),
}

impl ConditionValue {
    /// Check if the value is blank (an empty or whitespace-only string).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Interpret the value as a finite number, parsing text if necessary.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => n.as_f64()?,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// The value as text, for comparing against option labels.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl Default for ConditionValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for ConditionValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u32> for ConditionValue {
    fn from(n: u32) -> Self {
        Self::Number(n.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::PositionalId;

    #[test]
    fn rule_serializes_with_snake_case_keys() {
        let rule = ConditionRule::equals(PositionalId::from("q1"), "Option 1");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "depends_on": "q1",
                "condition_type": "equals",
                "condition_value": "Option 1",
            })
        );
    }

    #[test]
    fn legacy_condition_names_are_accepted() {
        let parsed: Vec<ConditionType> = serde_json::from_value(json!([
            "answerValueIs",
            "answerValueNotIs",
            "greater-than",
            "less_than",
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                ConditionType::Equals,
                ConditionType::NotEquals,
                ConditionType::GreaterThan,
                ConditionType::LessThan,
            ]
        );
    }

    #[test]
    fn numeric_values_parse_from_text_and_numbers() {
        let from_json: ConditionValue = serde_json::from_value(json!(4)).unwrap();
        assert_eq!(from_json.as_number(), Some(4.0));
        assert_eq!(ConditionValue::from(" 3 ").as_number(), Some(3.0));
        assert_eq!(ConditionValue::from("three").as_number(), None);
        assert_eq!(ConditionValue::from("NaN").as_number(), None);
    }

    #[test]
    fn blank_text_is_empty() {
        assert!(ConditionValue::from("  ").is_empty());
        assert!(!ConditionValue::from(0_i64).is_empty());
    }
}
