//! Which questions a respondent sees, given their answers so far.

use crate::{AnswerValue, Answers, ConditionRule, ConditionType, PositionalId, SurveyDocument};

/// Positional ids of the questions shown for `answers`, in survey order.
///
/// A question with a rule is shown only when its prerequisite is shown,
/// answered, and the answer satisfies the rule. A rule that does not name an
/// earlier question is ignored and the question is shown.
///
/// ```
/// use serde_json::json;
/// use survey_builder::{Answers, PositionalId, SurveyDocument, visible_questions};
///
/// let document = SurveyDocument::from_value(json!({
///     "questions": [
///         { "id": "q1", "type": "YES_NO", "question": "Attending?" },
///         { "id": "q2", "type": "SHORT_TEXT", "question": "Dietary needs?" },
///     ],
///     "conditional_logic": {
///         "q2": { "depends_on": "q1", "condition_type": "equals", "condition_value": "Yes" },
///     },
/// }))
/// .unwrap();
///
/// let shown = visible_questions(&document, &Answers::new().with("q1", "No"));
/// assert_eq!(shown, vec![PositionalId::from("q1")]);
/// ```
pub fn visible_questions(document: &SurveyDocument, answers: &Answers) -> Vec<PositionalId> {
    let mut visible = Vec::with_capacity(document.len());

    for index in 0..document.len() {
        let id = PositionalId::from_index(index);
        let shown = match document.rule_for(&id) {
            None => true,
            Some(rule) => match rule.depends_on.position().filter(|&p| p < index) {
                None => true,
                Some(prerequisite) => {
                    visible[prerequisite]
                        && answers
                            .get(&rule.depends_on)
                            .is_some_and(|answer| !answer.is_blank() && rule_matches(rule, answer))
                }
            },
        };
        visible.push(shown);
    }

    visible
        .into_iter()
        .enumerate()
        .filter_map(|(index, shown)| shown.then(|| PositionalId::from_index(index)))
        .collect()
}

/// Check if an answer satisfies a rule.
pub fn rule_matches<Id>(rule: &ConditionRule<Id>, answer: &AnswerValue) -> bool {
    let value = &rule.condition_value;
    match rule.condition_type {
        ConditionType::Equals => answer_equals(answer, &value.to_text(), value.as_number()),
        ConditionType::NotEquals => !answer_equals(answer, &value.to_text(), value.as_number()),
        ConditionType::GreaterThan => {
            matches!((answer.as_number(), value.as_number()), (Some(a), Some(v)) if a > v)
        }
        ConditionType::LessThan => {
            matches!((answer.as_number(), value.as_number()), (Some(a), Some(v)) if a < v)
        }
    }
}

fn answer_equals(answer: &AnswerValue, text: &str, number: Option<f64>) -> bool {
    if let AnswerValue::Choices(choices) = answer {
        return choices.iter().any(|choice| choice == text);
    }
    if let (Some(a), Some(v)) = (answer.as_number(), number) {
        return a == v;
    }
    answer.as_text().is_some_and(|answer| answer.trim() == text.trim())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rule(condition_type: ConditionType, value: serde_json::Value) -> ConditionRule<PositionalId> {
        serde_json::from_value(json!({
            "depends_on": "q1",
            "condition_type": condition_type.as_str(),
            "condition_value": value,
        }))
        .unwrap()
    }

    fn chain() -> SurveyDocument {
        SurveyDocument::from_value(json!({
            "questions": [
                { "type": "RATING", "question": "How was it?" },
                { "type": "YES_NO", "question": "Would you come again?" },
                { "type": "LONG_TEXT", "question": "What kept you away?" },
                { "type": "DATE", "question": "When?" },
            ],
            "conditional_logic": {
                "q2": { "depends_on": "q1", "condition_type": "greater_than", "condition_value": 3 },
                "q3": { "depends_on": "q2", "condition_type": "equals", "condition_value": "No" },
                "q4": { "depends_on": "q9", "condition_type": "equals", "condition_value": "x" },
            },
        }))
        .unwrap()
    }

    fn shown(document: &SurveyDocument, answers: &Answers) -> Vec<String> {
        visible_questions(document, answers)
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn unanswered_prerequisite_hides_dependents() {
        assert_eq!(shown(&chain(), &Answers::new()), vec!["q1", "q4"]);
    }

    #[test]
    fn visibility_follows_the_chain() {
        let document = chain();
        let answers = Answers::new().with("q1", 4_i64).with("q2", false);
        assert_eq!(shown(&document, &answers), vec!["q1", "q2", "q3", "q4"]);

        let answers = Answers::new().with("q1", 2_i64).with("q2", "No");
        assert_eq!(shown(&document, &answers), vec!["q1", "q4"]);
    }

    #[test]
    fn numeric_comparisons() {
        let four = AnswerValue::from(4_i64);
        assert!(rule_matches(&rule(ConditionType::GreaterThan, json!(3)), &four));
        assert!(!rule_matches(&rule(ConditionType::LessThan, json!("3")), &four));
        assert!(rule_matches(&rule(ConditionType::Equals, json!("4")), &four));
        assert!(rule_matches(&rule(ConditionType::NotEquals, json!(5)), &four));
        assert!(!rule_matches(
            &rule(ConditionType::GreaterThan, json!(3)),
            &AnswerValue::from("many")
        ));
    }

    #[test]
    fn text_and_choice_comparisons() {
        let equals = rule(ConditionType::Equals, json!("Option 1"));
        assert!(rule_matches(&equals, &AnswerValue::from("Option 1")));
        assert!(!rule_matches(&equals, &AnswerValue::from("Option 2")));
        assert!(rule_matches(
            &equals,
            &AnswerValue::from(vec!["Option 2".to_string(), "Option 1".to_string()])
        ));

        let yes = rule(ConditionType::Equals, json!("Yes"));
        assert!(rule_matches(&yes, &AnswerValue::from(true)));
        assert!(!rule_matches(&yes, &AnswerValue::from(false)));
    }
}
