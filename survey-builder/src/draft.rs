use tracing::{debug, info};

use crate::resolver::{flatten, hydrate_with};
use crate::{
    BuilderDefaults, LoadWarning, OmittedRule, PublishError, QuestionStore, SurveyDocument,
};

/// Survey-level settings edited next to the questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyMeta {
    /// Storage id, `None` until the survey has been saved once.
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

/// A survey open in the builder.
#[derive(Debug, Clone, Default)]
pub struct SurveyDraft {
    pub meta: SurveyMeta,
    pub questions: QuestionStore,
}

/// The document produced by [`SurveyDraft::save`], with the rules it left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    pub document: SurveyDocument,
    pub omitted: Vec<OmittedRule>,
}

impl SurveyDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a stored survey for editing.
    pub fn load(document: &SurveyDocument) -> (Self, Vec<LoadWarning>) {
        Self::load_with_defaults(document, BuilderDefaults::default())
    }

    /// Open a stored survey, filling in new and malformed questions from `defaults`.
    pub fn load_with_defaults(
        document: &SurveyDocument,
        defaults: BuilderDefaults,
    ) -> (Self, Vec<LoadWarning>) {
        let hydrated = hydrate_with(document, &defaults);
        let draft = Self {
            meta: SurveyMeta {
                id: document.id.clone(),
                title: document.title.clone().unwrap_or_default(),
                description: document.description.clone().unwrap_or_default(),
            },
            questions: QuestionStore::from_questions(hydrated.questions, defaults),
        };
        (draft, hydrated.warnings)
    }

    /// Serialize the draft as it stands.
    pub fn save(&self) -> Saved {
        let flattened = flatten(self.questions.list());
        let omitted = flattened.omitted.clone();

        let mut document = flattened.into_document();
        document.id = self.meta.id.clone();
        document.title = non_blank(&self.meta.title);
        document.description = non_blank(&self.meta.description);

        debug!(
            questions = document.questions.len(),
            rules = document.conditional_logic.len(),
            omitted = omitted.len(),
            "Saved survey"
        );
        Saved { document, omitted }
    }

    /// Serialize the draft for respondents. Requires a title and at least one question.
    pub fn publish(&self) -> Result<Saved, PublishError> {
        if self.meta.title.trim().is_empty() {
            return Err(PublishError::MissingTitle);
        }
        if self.questions.is_empty() {
            return Err(PublishError::NoQuestions);
        }

        let saved = self.save();
        info!(title = %self.meta.title, "Published survey");
        Ok(saved)
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{ConditionRule, QuestionType};

    #[test]
    fn empty_draft_cannot_be_published() {
        let mut draft = SurveyDraft::new();
        assert_eq!(draft.publish(), Err(PublishError::MissingTitle));

        draft.meta.title = "  Feedback ".into();
        assert_eq!(draft.publish(), Err(PublishError::NoQuestions));

        draft.questions.add(QuestionType::Date);
        let saved = draft.publish().unwrap();
        assert_eq!(saved.document.title.as_deref(), Some("Feedback"));
        assert_eq!(saved.document.len(), 1);
    }

    #[test]
    fn save_reports_omitted_rules_but_still_saves() {
        let mut draft = SurveyDraft::new();
        let a = draft.questions.add(QuestionType::YesNo);
        let b = draft.questions.add(QuestionType::ShortText);
        draft
            .questions
            .update_with(b, |fields| fields.dependency = Some(ConditionRule::equals(a, "Yes")))
            .unwrap();
        draft.questions.remove(a).unwrap();

        let saved = draft.save();
        assert_eq!(saved.document.len(), 1);
        assert!(saved.document.conditional_logic.is_empty());
        assert_eq!(saved.omitted.len(), 1);
        assert_eq!(saved.omitted[0].dependent, b);
    }

    #[test]
    fn load_keeps_meta_and_save_writes_it_back() {
        let document = SurveyDocument::from_value(json!({
            "id": "survey-42",
            "title": "Team offsite",
            "questions": [{ "id": "q1", "type": "DATE", "question": "Which day?" }],
            "conditional_logic": {},
        }))
        .unwrap();

        let (draft, warnings) = SurveyDraft::load(&document);
        assert!(warnings.is_empty());
        assert_eq!(draft.meta.id.as_deref(), Some("survey-42"));
        assert_eq!(draft.meta.title, "Team offsite");
        assert_eq!(draft.meta.description, "");
        assert_eq!(draft.questions.focused(), None);

        assert_eq!(draft.save().document, document);
    }
}
