use std::collections::HashSet;

use tracing::{debug, warn};

use crate::resolver::{Candidate, candidate_prerequisites, unique_id};
use crate::validate::{check_order, check_rule, positions};
use crate::{
    BuilderDefaults, DanglingDependency, EditId, Question, QuestionFields, QuestionType,
    RuleError, StoreError,
};

/// A question taken out of the store, with the rules it leaves dangling.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub question: Question,

    /// One entry per remaining question whose rule depended on the removed one.
    pub dangling: Vec<DanglingDependency>,
}

/// The ordered questions of one editing session.
///
/// The store is the only way to change questions, and every change goes
/// through one of its operations. Order in the store is survey order. Edit ids
/// are unique within a store and never change. An id is never issued twice in
/// one session, even after its question was removed.
///
/// Rules are not repaired when a change makes them unsatisfiable: `remove` and
/// `reorder` report what broke, and the broken rules stay on their questions
/// until the editor changes them. [`crate::flatten`] leaves them out.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
    focused: Option<EditId>,
    defaults: BuilderDefaults,
    issued: HashSet<EditId>,
}

impl QuestionStore {
    /// Create an empty store using the default question settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that fills in new questions from `defaults`.
    pub fn with_defaults(defaults: BuilderDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Take ownership of already hydrated questions.
    pub(crate) fn from_questions(questions: Vec<Question>, defaults: BuilderDefaults) -> Self {
        let issued = questions.iter().map(Question::edit_id).collect();
        Self {
            questions,
            focused: None,
            defaults,
            issued,
        }
    }

    pub fn defaults(&self) -> &BuilderDefaults {
        &self.defaults
    }

    /// Append a new question of the given type and focus it.
    pub fn add(&mut self, question_type: QuestionType) -> EditId {
        let edit_id = self.fresh_id();
        let fields = self.defaults.fields_for(question_type);
        self.questions.push(Question::new(edit_id, fields));
        self.focused = Some(edit_id);

        debug!(question = %edit_id, question_type = %question_type, "Added question");
        edit_id
    }

    /// Insert a copy of a question right after it and focus the copy.
    ///
    /// The copy gets a new edit id, a suffixed prompt and no rule.
    pub fn duplicate(&mut self, edit_id: EditId) -> Result<EditId, StoreError> {
        let index = self.require(edit_id)?;

        let mut fields = self.questions[index].fields().clone();
        fields.prompt = self.defaults.copy_prompt(&fields.prompt);
        fields.dependency = None;

        let copy_id = self.fresh_id();
        self.questions.insert(index + 1, Question::new(copy_id, fields));
        self.focused = Some(copy_id);

        debug!(original = %edit_id, copy = %copy_id, "Duplicated question");
        Ok(copy_id)
    }

    /// Remove a question.
    ///
    /// Rules of other questions that depended on it are kept but can no
    /// longer be satisfied; they are returned in [`Removed::dangling`].
    pub fn remove(&mut self, edit_id: EditId) -> Result<Removed, StoreError> {
        let index = self.require(edit_id)?;
        let question = self.questions.remove(index);

        if self.focused == Some(edit_id) {
            self.focused = None;
        }

        let dangling: Vec<_> = self
            .questions
            .iter()
            .filter(|q| q.dependency().is_some_and(|rule| rule.depends_on == edit_id))
            .map(|q| DanglingDependency::MissingPrerequisite {
                dependent: q.edit_id(),
                depends_on: edit_id,
            })
            .collect();
        for dependency in &dangling {
            warn!("{}", dependency);
        }

        debug!(question = %edit_id, index, "Removed question");
        Ok(Removed { question, dangling })
    }

    /// Move the question at `from` to `to`, shifting the questions between.
    ///
    /// Returns the rules this move broke. Rules that were already broken
    /// before the move are not reported again.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<Vec<DanglingDependency>, StoreError> {
        let len = self.questions.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfBounds { index, len });
            }
        }
        if from == to {
            return Ok(Vec::new());
        }

        let before: HashSet<_> = self.dangling_dependencies().into_iter().collect();
        let question = self.questions.remove(from);
        self.questions.insert(to, question);

        let broken: Vec<_> = self
            .dangling_dependencies()
            .into_iter()
            .filter(|dependency| !before.contains(dependency))
            .collect();
        for dependency in &broken {
            warn!("{}", dependency);
        }

        debug!(from, to, "Reordered question");
        Ok(broken)
    }

    /// Replace a question's content fields, including its rule.
    pub fn update(&mut self, edit_id: EditId, fields: QuestionFields) -> Result<(), StoreError> {
        self.update_with(edit_id, |current| *current = fields)
    }

    /// Edit a question's content fields in place.
    pub fn update_with<F>(&mut self, edit_id: EditId, edit: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut QuestionFields),
    {
        let index = self.require(edit_id)?;
        edit(self.questions[index].fields_mut());

        debug!(question = %edit_id, "Updated question");
        Ok(())
    }

    /// The questions in survey order.
    pub fn list(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, edit_id: EditId) -> Option<&Question> {
        self.questions.iter().find(|q| q.edit_id() == edit_id)
    }

    /// Current position of a question.
    pub fn index_of(&self, edit_id: EditId) -> Option<usize> {
        self.questions.iter().position(|q| q.edit_id() == edit_id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// The focused question, if it is still in the store.
    pub fn focused(&self) -> Option<EditId> {
        self.focused
    }

    /// Current position of the focused question.
    pub fn focused_index(&self) -> Option<usize> {
        self.focused.and_then(|id| self.index_of(id))
    }

    pub fn set_focus(&mut self, edit_id: Option<EditId>) -> Result<(), StoreError> {
        if let Some(id) = edit_id {
            self.require(id)?;
        }
        self.focused = edit_id;
        Ok(())
    }

    /// Focus a question, or unfocus it if it already has focus.
    pub fn toggle_focus(&mut self, edit_id: EditId) -> Result<(), StoreError> {
        self.require(edit_id)?;
        self.focused = if self.focused == Some(edit_id) {
            None
        } else {
            Some(edit_id)
        };
        Ok(())
    }

    /// Every rule whose prerequisite is gone or no longer precedes it.
    pub fn dangling_dependencies(&self) -> Vec<DanglingDependency> {
        let positions = positions(&self.questions);
        self.questions
            .iter()
            .enumerate()
            .filter_map(|(index, question)| {
                let rule = question.dependency()?;
                check_order(&self.questions, &positions, index, rule).err()
            })
            .collect()
    }

    /// Why a question's rule is invalid, or `None` if it is valid or absent.
    pub fn rule_error(&self, edit_id: EditId) -> Result<Option<RuleError>, StoreError> {
        let index = self.require(edit_id)?;
        let Some(rule) = self.questions[index].dependency() else {
            return Ok(None);
        };
        Ok(check_rule(&self.questions, &positions(&self.questions), index, rule).err())
    }

    /// Questions that precede the question at `index`.
    pub fn candidate_prerequisites(&self, index: usize) -> Vec<Candidate> {
        candidate_prerequisites(&self.questions, index)
    }

    fn require(&self, edit_id: EditId) -> Result<usize, StoreError> {
        self.index_of(edit_id).ok_or(StoreError::NotFound(edit_id))
    }

    fn fresh_id(&mut self) -> EditId {
        unique_id(&mut self.issued)
    }
}

impl<'a> IntoIterator for &'a QuestionStore {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
