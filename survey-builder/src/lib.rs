//! # survey-builder
//!
//! Edit surveys whose questions can be shown conditionally. Storage-agnostic.
//!
//! While a survey is being edited every question has an [`EditId`] that
//! survives reordering. When the survey is saved, questions are numbered
//! `q1..qN` by their final order and the conditional rules are rewritten to
//! use those [`PositionalId`]s.
//!
//! ## Usage
//!
//! ```rust
//! use survey_builder::{ConditionRule, QuestionStore, QuestionType, flatten};
//!
//! let mut store = QuestionStore::new();
//! let color = store.add(QuestionType::SingleChoice);
//! let rating = store.add(QuestionType::Rating);
//!
//! // Only ask for a rating when "Option 1" was picked
//! store
//!     .update_with(rating, |fields| {
//!         fields.dependency = Some(ConditionRule::equals(color, "Option 1"));
//!     })
//!     .unwrap();
//!
//! let saved = flatten(store.list());
//! assert_eq!(saved.questions.len(), 2);
//! assert_eq!(saved.conditional_logic.len(), 1);
//!
//! // Moving the rating first breaks its rule, so it is no longer saved
//! let broken = store.reorder(0, 1).unwrap();
//! assert_eq!(broken.len(), 1);
//! assert!(flatten(store.list()).conditional_logic.is_empty());
//! ```
//!
//! ## Pieces
//!
//! - [`QuestionStore`] - The ordered questions and the operations that change them
//! - [`hydrate`] / [`flatten`] - Load and save, translating between id schemes
//! - [`candidate_prerequisites`] - What a rule editor may offer as a prerequisite
//! - [`validate_rule`] / [`question_issues`] - Editor checks
//! - [`visible_questions`] - Which questions a respondent sees
//! - [`SurveyDraft`] - A survey with its title, description and questions
//!
//! ## Logging
//!
//! Dangling rules are reported through `tracing` at `warn` level and store
//! changes at `debug` level. No subscriber is installed.

// Re-export all types from survey-builder-types
pub use survey_builder_types::*;

mod store;
pub use store::{QuestionStore, Removed};

mod resolver;
pub use resolver::{
    Candidate, Flattened, Hydrated, candidate_prerequisites, flatten, hydrate, hydrate_with,
};

mod validate;
pub use validate::{condition_types_for, question_issues, validate_rule};

mod visibility;
pub use visibility::{rule_matches, visible_questions};

mod draft;
pub use draft::{Saved, SurveyDraft, SurveyMeta};
