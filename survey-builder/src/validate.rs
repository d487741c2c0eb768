//! Structural checks for condition rules and question settings.
//!
//! Rules are checked lazily: when a rule editor is rendered and when a survey
//! is flattened for saving. Nothing here repairs a rule.

use std::collections::HashMap;

use crate::{
    ChoiceQuestion, ConditionRule, ConditionType, DanglingDependency, EditId,
    InvalidConditionValue, Question, QuestionFields, QuestionIssue, QuestionKind, QuestionType,
    RatingQuestion, RuleError, YesNoQuestion,
};

/// Check the rule of the question at `index`.
///
/// A question without a rule is valid, as is an index past the end.
///
/// ```
/// use survey_builder::{ConditionRule, QuestionStore, QuestionType, validate_rule};
///
/// let mut store = QuestionStore::new();
/// let color = store.add(QuestionType::SingleChoice);
/// let why = store.add(QuestionType::ShortText);
/// store
///     .update_with(why, |fields| {
///         fields.dependency = Some(ConditionRule::equals(color, "Option 1"));
///     })
///     .unwrap();
///
/// assert!(validate_rule(store.list(), 1).is_ok());
/// ```
pub fn validate_rule(questions: &[Question], index: usize) -> Result<(), RuleError> {
    let Some(rule) = questions.get(index).and_then(Question::dependency) else {
        return Ok(());
    };
    check_rule(questions, &positions(questions), index, rule).map(|_| ())
}

/// The comparisons a rule editor offers for a prerequisite of this type.
pub fn condition_types_for(question_type: QuestionType) -> &'static [ConditionType] {
    question_type.condition_types()
}

/// Problems with a question's own settings, as the per-type editors report them.
pub fn question_issues(fields: &QuestionFields) -> Vec<QuestionIssue> {
    let mut issues = Vec::new();
    match &fields.kind {
        QuestionKind::SingleChoice(choice) => option_issues(choice, &mut issues),
        QuestionKind::MultipleChoice(multi) => {
            option_issues(&multi.choices, &mut issues);
            if multi.max_selections == Some(0) {
                issues.push(QuestionIssue::ZeroMaxSelections);
            }
        }
        QuestionKind::Rating(rating) => {
            if !(RatingQuestion::MIN_SCALE..=RatingQuestion::MAX_SCALE).contains(&rating.scale) {
                issues.push(QuestionIssue::ScaleOutOfRange(rating.scale));
            }
        }
        QuestionKind::ShortText(_)
        | QuestionKind::LongText(_)
        | QuestionKind::Email(_)
        | QuestionKind::YesNo(_)
        | QuestionKind::Date => {}
    }
    issues
}

fn option_issues(choice: &ChoiceQuestion, issues: &mut Vec<QuestionIssue>) {
    if choice.options.len() < ChoiceQuestion::MIN_OPTIONS {
        issues.push(QuestionIssue::TooFewOptions);
    }
    if choice.options.iter().any(|option| option.trim().is_empty()) {
        issues.push(QuestionIssue::BlankOption);
    }
}

/// Current index of every question, by edit id.
pub(crate) fn positions(questions: &[Question]) -> HashMap<EditId, usize> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| (question.edit_id(), index))
        .collect()
}

/// Whether the prerequisite of `rule` still precedes the question at `index`.
///
/// Returns the prerequisite's index.
pub(crate) fn check_order(
    questions: &[Question],
    positions: &HashMap<EditId, usize>,
    index: usize,
    rule: &ConditionRule<EditId>,
) -> Result<usize, DanglingDependency> {
    let dependent = questions[index].edit_id();
    let depends_on = rule.depends_on;
    match positions.get(&depends_on) {
        None => Err(DanglingDependency::MissingPrerequisite {
            dependent,
            depends_on,
        }),
        Some(&prerequisite) if prerequisite >= index => {
            Err(DanglingDependency::ForwardReference {
                dependent,
                depends_on,
            })
        }
        Some(&prerequisite) => Ok(prerequisite),
    }
}

/// Full structural check of `rule`, attached to the question at `index`.
///
/// Returns the prerequisite's index.
pub(crate) fn check_rule(
    questions: &[Question],
    positions: &HashMap<EditId, usize>,
    index: usize,
    rule: &ConditionRule<EditId>,
) -> Result<usize, RuleError> {
    let prerequisite_index = check_order(questions, positions, index, rule)?;
    let prerequisite = &questions[prerequisite_index];
    let prerequisite_type = prerequisite.question_type();

    if !prerequisite_type.is_condition_source() {
        return Err(RuleError::UnsupportedSource(prerequisite_type));
    }
    if !prerequisite_type
        .condition_types()
        .contains(&rule.condition_type)
    {
        return Err(RuleError::UnsupportedCondition {
            condition: rule.condition_type,
            prerequisite: prerequisite_type,
        });
    }

    check_value(prerequisite.kind(), rule)?;
    Ok(prerequisite_index)
}

fn check_value(
    prerequisite: &QuestionKind,
    rule: &ConditionRule<EditId>,
) -> Result<(), InvalidConditionValue> {
    let value = &rule.condition_value;
    if value.is_empty() {
        return Err(InvalidConditionValue::Empty);
    }

    match prerequisite {
        QuestionKind::Rating(rating) => {
            let number = value
                .as_number()
                .ok_or_else(|| InvalidConditionValue::NotANumber(value.to_text()))?;
            if number < 1.0 || number > f64::from(rating.scale) {
                return Err(InvalidConditionValue::OutOfRange {
                    value: number,
                    max: rating.scale,
                });
            }
        }
        QuestionKind::SingleChoice(choice) => {
            let text = value.to_text();
            if !choice.options.contains(&text) {
                return Err(InvalidConditionValue::UnknownOption(text));
            }
        }
        QuestionKind::YesNo(_) => {
            let text = value.to_text();
            if !YesNoQuestion::ANSWERS.contains(&text.as_str()) {
                return Err(InvalidConditionValue::UnknownOption(text));
            }
        }
        _ => {}
    }
    Ok(())
}
