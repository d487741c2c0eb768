use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ConditionRule, ConditionType, EditId};

/// A single question in the editor.
///
/// The edit id is fixed at construction; everything else lives in
/// [`QuestionFields`] and may be replaced freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Stable identifier for this editing session.
    edit_id: EditId,

    /// The content-bearing fields.
    fields: QuestionFields,
}

impl Question {
    /// Create a new question.
    pub fn new(edit_id: EditId, fields: QuestionFields) -> Self {
        Self { edit_id, fields }
    }

    /// Get the edit id.
    pub fn edit_id(&self) -> EditId {
        self.edit_id
    }

    /// Get the content fields.
    pub fn fields(&self) -> &QuestionFields {
        &self.fields
    }

    /// Get a mutable reference to the content fields.
    pub fn fields_mut(&mut self) -> &mut QuestionFields {
        &mut self.fields
    }

    /// Consume the question, keeping only its content fields.
    pub fn into_fields(self) -> QuestionFields {
        self.fields
    }

    /// Get the prompt text.
    pub fn prompt(&self) -> &str {
        &self.fields.prompt
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.fields.kind
    }

    /// Get the question type.
    pub fn question_type(&self) -> QuestionType {
        self.fields.kind.question_type()
    }

    /// Points awarded for answering.
    pub fn points(&self) -> u32 {
        self.fields.points
    }

    /// Whether a respondent may bookmark this question and their answer.
    pub fn addable(&self) -> bool {
        self.fields.addable
    }

    /// The conditional-display rule, if any.
    pub fn dependency(&self) -> Option<&ConditionRule<EditId>> {
        self.fields.dependency.as_ref()
    }
}

/// Everything about a question except its edit id.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFields {
    /// The prompt text shown to respondents.
    pub prompt: String,

    /// The kind of question and its type-specific settings.
    pub kind: QuestionKind,

    /// Points awarded for answering.
    pub points: u32,

    /// Whether a respondent may bookmark this question and their answer.
    pub addable: bool,

    /// Answer validation settings shared by all kinds. `None` when the
    /// stored question had no `validation` object.
    pub validation: Option<Validation>,

    /// Show this question only when the rule holds.
    pub dependency: Option<ConditionRule<EditId>>,

    /// Stored fields this crate does not interpret, written back unchanged.
    pub extra: Map<String, Value>,
}

/// The closed set of question types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    ShortText,
    LongText,
    SingleChoice,
    MultipleChoice,
    Rating,
    YesNo,
    Email,
    Date,
}

impl QuestionType {
    /// Every question type, in the order an "add question" palette shows them.
    pub const ALL: [QuestionType; 8] = [
        Self::ShortText,
        Self::LongText,
        Self::SingleChoice,
        Self::MultipleChoice,
        Self::Rating,
        Self::YesNo,
        Self::Email,
        Self::Date,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortText => "Short Text",
            Self::LongText => "Long Text",
            Self::SingleChoice => "Single Choice",
            Self::MultipleChoice => "Multiple Choice",
            Self::Rating => "Rating Scale",
            Self::YesNo => "Yes/No",
            Self::Email => "Email",
            Self::Date => "Date",
        }
    }

    /// Check if answers to this type can drive a condition rule.
    pub fn is_condition_source(&self) -> bool {
        !self.condition_types().is_empty()
    }

    /// The comparisons a rule may apply to answers of this type.
    pub fn condition_types(&self) -> &'static [ConditionType] {
        match self {
            Self::SingleChoice | Self::YesNo => &[ConditionType::Equals],
            Self::Rating => &ConditionType::ALL,
            _ => &[],
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The kind of question, carrying its type-specific settings.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Single-line text input.
    ShortText(TextQuestion),

    /// Multi-line text input.
    LongText(TextQuestion),

    /// Email address input.
    Email(TextQuestion),

    /// Pick exactly one option.
    SingleChoice(ChoiceQuestion),

    /// Pick any number of options, optionally capped.
    MultipleChoice(MultipleChoiceQuestion),

    /// Pick a number from 1 to the scale.
    Rating(RatingQuestion),

    /// Yes or no.
    YesNo(YesNoQuestion),

    /// A calendar date. Bounds live in [`Validation`].
    Date,
}

impl QuestionKind {
    /// The type tag of this kind.
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::ShortText(_) => QuestionType::ShortText,
            Self::LongText(_) => QuestionType::LongText,
            Self::Email(_) => QuestionType::Email,
            Self::SingleChoice(_) => QuestionType::SingleChoice,
            Self::MultipleChoice(_) => QuestionType::MultipleChoice,
            Self::Rating(_) => QuestionType::Rating,
            Self::YesNo(_) => QuestionType::YesNo,
            Self::Date => QuestionType::Date,
        }
    }

    /// The answer options of a choice question.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::SingleChoice(choice) => Some(&choice.options),
            Self::MultipleChoice(multi) => Some(&multi.choices.options),
            _ => None,
        }
    }

    /// The scale of a rating question.
    pub fn scale(&self) -> Option<u32> {
        match self {
            Self::Rating(rating) => Some(rating.scale),
            _ => None,
        }
    }
}

/// Settings for the text kinds (short text, long text, email).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextQuestion {
    /// Hint shown in the empty input.
    pub placeholder: Option<String>,
}

impl TextQuestion {
    /// Create with a placeholder.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: Some(placeholder.into()),
        }
    }
}

/// Settings for a single-choice question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceQuestion {
    /// The options, in display order.
    pub options: Vec<String>,

    /// Shuffle the options for each respondent.
    pub randomize: bool,

    /// Whether the free-text "Other" option has been added.
    pub has_other_option: bool,
}

impl ChoiceQuestion {
    /// Label of the free-text "Other" option.
    pub const OTHER_OPTION: &'static str = "Other (please specify)";

    /// A choice question must keep at least this many options.
    pub const MIN_OPTIONS: usize = 2;

    /// Create with the given options.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            options,
            randomize: false,
            has_other_option: false,
        }
    }

    /// Append a numbered option ("Option 3", ...).
    pub fn add_option(&mut self) {
        let label = format!("Option {}", self.options.len() + 1);
        self.options.push(label);
    }

    /// Append the "Other" option unless it is already present.
    pub fn add_other_option(&mut self) {
        if self.options.iter().any(|o| o == Self::OTHER_OPTION) {
            return;
        }
        self.options.push(Self::OTHER_OPTION.to_string());
        self.has_other_option = true;
    }

    /// Remove the option at `index`.
    ///
    /// Refuses (returning `false`) when that would leave fewer than
    /// [`Self::MIN_OPTIONS`] options or the index is out of range.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= Self::MIN_OPTIONS || index >= self.options.len() {
            return false;
        }
        let removed = self.options.remove(index);
        if removed == Self::OTHER_OPTION {
            self.has_other_option = false;
        }
        true
    }
}

/// Settings for a multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipleChoiceQuestion {
    /// Options and their presentation.
    pub choices: ChoiceQuestion,

    /// Upper bound on selected options; `None` means unlimited.
    pub max_selections: Option<u32>,
}

impl MultipleChoiceQuestion {
    /// Create with the given options and no selection cap.
    pub fn new(options: Vec<String>) -> Self {
        Self {
            choices: ChoiceQuestion::new(options),
            max_selections: None,
        }
    }
}

/// Settings for a rating question.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingQuestion {
    /// Highest selectable rating; the lowest is always 1.
    pub scale: u32,

    /// Caption for the low end, e.g. "Poor".
    pub low_label: Option<String>,

    /// Caption for the high end, e.g. "Excellent".
    pub high_label: Option<String>,
}

impl RatingQuestion {
    pub const MIN_SCALE: u32 = 2;
    pub const MAX_SCALE: u32 = 10;
    pub const DEFAULT_SCALE: u32 = 5;

    /// Create with the given scale and no captions.
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            low_label: None,
            high_label: None,
        }
    }
}

impl Default for RatingQuestion {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCALE)
    }
}

/// Settings for a yes/no question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YesNoQuestion {
    /// Replacement caption for "Yes".
    pub yes_label: Option<String>,

    /// Replacement caption for "No".
    pub no_label: Option<String>,
}

impl YesNoQuestion {
    /// The answer values a yes/no question produces, regardless of captions.
    pub const ANSWERS: [&'static str; 2] = ["Yes", "No"];
}

/// Answer validation shared by every question kind.
///
/// Keys this crate does not know are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Earliest accepted date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,

    /// Latest accepted date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_format: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validation {
    /// Check if no validation setting is present.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether an answer is required.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}
