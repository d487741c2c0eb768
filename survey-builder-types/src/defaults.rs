use serde::{Deserialize, Serialize};
use serde_json::Map;

use crate::{
    ChoiceQuestion, MultipleChoiceQuestion, QuestionFields, QuestionKind, QuestionType,
    RatingQuestion, TextQuestion, YesNoQuestion,
};

/// Points a question awards unless configured otherwise.
pub const DEFAULT_POINTS: u32 = 5;

/// Values used to fill in newly added and duplicated questions.
///
/// Every field has a default, so a partial configuration deserializes:
///
/// ```
/// use survey_builder_types::BuilderDefaults;
///
/// let defaults: BuilderDefaults = serde_json::from_str(r#"{ "points": 10 }"#).unwrap();
/// assert_eq!(defaults.points, 10);
/// assert_eq!(defaults.rating_scale, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderDefaults {
    /// Points for a new question.
    pub points: u32,

    /// Whether new questions may be bookmarked by respondents.
    pub addable: bool,

    /// Placeholder for new text, long-text and email questions.
    pub placeholder: String,

    /// Options for new choice questions.
    pub options: Vec<String>,

    /// Scale for new rating questions.
    pub rating_scale: u32,

    /// Appended to the prompt of a duplicated question.
    pub copy_suffix: String,

    /// Prompt for a new question; `{label}` is replaced by the type label.
    pub prompt_template: String,
}

impl Default for BuilderDefaults {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            addable: true,
            placeholder: "Type answer here...".to_string(),
            options: vec!["Option 1".to_string(), "Option 2".to_string()],
            rating_scale: RatingQuestion::DEFAULT_SCALE,
            copy_suffix: " (Copy)".to_string(),
            prompt_template: "New {label} Question".to_string(),
        }
    }
}

impl BuilderDefaults {
    /// The prompt a new question of this type starts with.
    pub fn prompt_for(&self, question_type: QuestionType) -> String {
        self.prompt_template.replace("{label}", question_type.label())
    }

    /// The type-specific settings a new question of this type starts with.
    pub fn kind_for(&self, question_type: QuestionType) -> QuestionKind {
        let text = || TextQuestion::with_placeholder(&self.placeholder);
        match question_type {
            QuestionType::ShortText => QuestionKind::ShortText(text()),
            QuestionType::LongText => QuestionKind::LongText(text()),
            QuestionType::Email => QuestionKind::Email(text()),
            QuestionType::SingleChoice => {
                QuestionKind::SingleChoice(ChoiceQuestion::new(self.options.clone()))
            }
            QuestionType::MultipleChoice => {
                QuestionKind::MultipleChoice(MultipleChoiceQuestion::new(self.options.clone()))
            }
            QuestionType::Rating => QuestionKind::Rating(RatingQuestion::new(self.rating_scale)),
            QuestionType::YesNo => QuestionKind::YesNo(YesNoQuestion::default()),
            QuestionType::Date => QuestionKind::Date,
        }
    }

    /// All fields of a new question of this type. New questions never carry a rule.
    pub fn fields_for(&self, question_type: QuestionType) -> QuestionFields {
        QuestionFields {
            prompt: self.prompt_for(question_type),
            kind: self.kind_for(question_type),
            points: self.points,
            addable: self.addable,
            validation: None,
            dependency: None,
            extra: Map::new(),
        }
    }

    /// The prompt of a copy of a question with the given prompt.
    pub fn copy_prompt(&self, prompt: &str) -> String {
        format!("{prompt}{}", self.copy_suffix)
    }
}
