//! Core types for the survey-builder crate.
//!
//! This crate provides the foundational types for editing and storing surveys:
//! - `EditId` and `PositionalId` - The two identifier schemes
//! - `Question`, `QuestionFields` and `QuestionKind` - Questions and their type-specific settings
//! - `ConditionRule` - Conditional display of a question
//! - `SurveyDocument` and `QuestionRecord` - The persisted form
//! - `Answers` - A respondent's answers, for evaluating rules
//! - `BuilderDefaults` - Values for newly added questions

mod identifier;
pub use identifier::{EditId, PositionalId};

mod condition;
pub use condition::{ConditionRule, ConditionType, ConditionValue};

mod question;
pub use question::{
    ChoiceQuestion, MultipleChoiceQuestion, Question, QuestionFields, QuestionKind, QuestionType,
    RatingQuestion, TextQuestion, Validation, YesNoQuestion,
};

mod defaults;
pub use defaults::{BuilderDefaults, DEFAULT_POINTS};

mod document;
pub use document::{ConditionalLogic, EDITOR_ONLY_FIELDS, QuestionRecord, SurveyDocument};

mod answer;
pub use answer::{AnswerValue, Answers};

mod error;
pub use error::{
    DanglingDependency, DocumentError, InvalidConditionValue, LoadWarning, OmittedRule,
    PublishError, QuestionIssue, RuleError, StoreError,
};
