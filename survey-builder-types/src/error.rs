use crate::{ConditionType, EditId, PositionalId, QuestionType};

/// Error type for question store operations.
///
/// A failed operation leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("No question with edit id {0}")]
    NotFound(EditId),

    #[error("Index {index} is out of bounds for {len} questions")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A condition rule whose prerequisite cannot be resolved to an earlier question.
///
/// Never fatal: the rule is dropped on load or omitted on save, and the
/// survey stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum DanglingDependency {
    /// Stored conditional logic for `target` names a question that was not loaded.
    #[error("Conditional logic for {target} depends on unknown question {depends_on}")]
    UnknownPrerequisite {
        target: PositionalId,
        depends_on: PositionalId,
    },

    /// Stored conditional logic is keyed by a question that was not loaded.
    #[error("Conditional logic targets unknown question {target}")]
    UnknownTarget { target: PositionalId },

    /// The prerequisite was removed from the survey.
    #[error("Question {dependent} depends on {depends_on}, which is no longer in the survey")]
    MissingPrerequisite { dependent: EditId, depends_on: EditId },

    /// The prerequisite no longer comes strictly before the dependent question.
    #[error("Question {dependent} depends on {depends_on}, which no longer precedes it")]
    ForwardReference { dependent: EditId, depends_on: EditId },
}

/// A rule value the prerequisite question can never produce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidConditionValue {
    #[error("A condition value is required")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("{value} is outside the rating scale 1-{max}")]
    OutOfRange { value: f64, max: u32 },

    #[error("'{0}' is not one of the prerequisite's answers")]
    UnknownOption(String),
}

/// Why a condition rule is not structurally valid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Dangling(#[from] DanglingDependency),

    #[error("{0} questions cannot be used as a condition")]
    UnsupportedSource(QuestionType),

    #[error("'{condition}' does not apply to {prerequisite} questions")]
    UnsupportedCondition {
        condition: ConditionType,
        prerequisite: QuestionType,
    },

    #[error(transparent)]
    InvalidValue(#[from] InvalidConditionValue),
}

/// A problem with a question's own settings, reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionIssue {
    #[error("Must have at least 2 options")]
    TooFewOptions,

    #[error("Options cannot be empty")]
    BlankOption,

    #[error("Rating scale must be between 2 and 10, got {0}")]
    ScaleOutOfRange(u32),

    #[error("Maximum selections must be at least 1")]
    ZeroMaxSelections,
}

/// Error type for reading or writing a survey document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid survey document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a survey cannot be published yet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    #[error("Please provide a survey title")]
    MissingTitle,

    #[error("Add at least one question before publishing")]
    NoQuestions,
}

/// A non-fatal problem found while loading a stored survey.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadWarning {
    #[error(transparent)]
    Dangling(#[from] DanglingDependency),

    /// Some settings could not be parsed; defaults are used for them.
    #[error("Question {position} has malformed settings, using defaults: {message}")]
    MalformedFields {
        position: PositionalId,
        message: String,
    },

    /// A stored rule could not be parsed and was dropped.
    #[error("Conditional logic for {target} could not be read and was dropped: {message}")]
    MalformedRule {
        target: PositionalId,
        message: String,
    },

    /// The stored id disagrees with the question's position. Rules resolve by position.
    #[error("Question {position} is stored with id {stored}")]
    IdMismatch {
        position: PositionalId,
        stored: PositionalId,
    },
}

/// A rule left out of a saved document because it is not valid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Rule on question {dependent} was not saved: {reason}")]
pub struct OmittedRule {
    pub dependent: EditId,
    pub reason: RuleError,
}
