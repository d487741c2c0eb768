//! Stored surveys used by the survey-builder tests and docs.
//!
//! Each module builds one [`SurveyDocument`] the way the storage service
//! returns it.

pub mod customer_feedback;
pub mod damaged_rules;
pub mod event_signup;
pub mod legacy_import;

pub use survey_builder_types::SurveyDocument;
