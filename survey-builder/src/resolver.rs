//! Translation between edit ids and positional ids.
//!
//! [`hydrate`] turns a stored [`SurveyDocument`] into editor questions with
//! fresh [`EditId`]s; [`flatten`] turns editor questions back into stored
//! records keyed `q1..qN`. Both are pure: they never fail and never touch
//! anything but their arguments. Rules that cannot be resolved are dropped or
//! omitted and reported alongside the result.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::validate::{check_rule, positions};
use crate::{
    BuilderDefaults, ConditionalLogic, DanglingDependency, EditId, LoadWarning, OmittedRule,
    PositionalId, Question, QuestionRecord, QuestionType, RuleError, SurveyDocument,
};

/// Editor questions produced by [`hydrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrated {
    /// Questions in stored order.
    pub questions: Vec<Question>,

    /// Everything that had to be dropped or patched on the way in.
    pub warnings: Vec<LoadWarning>,
}

/// Stored records produced by [`flatten`].
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    /// Records with ids `q1..qN` in current order.
    pub questions: Vec<QuestionRecord>,

    /// Rules of every question whose rule is valid, keyed by positional id.
    pub conditional_logic: ConditionalLogic,

    /// Rules that were left out.
    pub omitted: Vec<OmittedRule>,
}

impl Flattened {
    /// Wrap the records in a document with no id, title or description.
    pub fn into_document(self) -> SurveyDocument {
        SurveyDocument {
            questions: self.questions,
            conditional_logic: self.conditional_logic,
            ..SurveyDocument::default()
        }
    }
}

/// A question that may be offered as the prerequisite of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub edit_id: EditId,

    /// The id the question would receive if the survey were saved now.
    pub positional_id: PositionalId,

    pub prompt: String,
    pub question_type: QuestionType,
    pub options: Option<Vec<String>>,
    pub scale: Option<u32>,
}

impl Candidate {
    /// Prompts longer than this are shortened in [`Candidate::label`].
    const LABEL_PROMPT_CHARS: usize = 40;

    /// Check if rules may depend on this question.
    pub fn is_condition_source(&self) -> bool {
        self.question_type.is_condition_source()
    }

    /// Display label for a prerequisite picker, e.g. `Q2: How was it? (Rating Scale)`.
    pub fn label(&self) -> String {
        let number = self
            .positional_id
            .position()
            .map_or_else(|| self.positional_id.to_string(), |i| (i + 1).to_string());

        let mut prompt: String = self.prompt.chars().take(Self::LABEL_PROMPT_CHARS).collect();
        if self.prompt.chars().count() > Self::LABEL_PROMPT_CHARS {
            prompt.push_str("...");
        }

        format!("Q{number}: {prompt} ({})", self.question_type.label())
    }
}

/// Every question before `index`, annotated with its current positional id.
///
/// No filtering by type happens here; see [`Candidate::is_condition_source`].
/// An `index` past the end yields every question.
pub fn candidate_prerequisites(questions: &[Question], index: usize) -> Vec<Candidate> {
    questions
        .iter()
        .take(index)
        .enumerate()
        .map(|(i, question)| Candidate {
            edit_id: question.edit_id(),
            positional_id: PositionalId::from_index(i),
            prompt: question.prompt().to_string(),
            question_type: question.question_type(),
            options: question.kind().options().map(<[String]>::to_vec),
            scale: question.kind().scale(),
        })
        .collect()
}

/// Load a stored survey with the default settings for malformed questions.
pub fn hydrate(document: &SurveyDocument) -> Hydrated {
    hydrate_with(document, &BuilderDefaults::default())
}

/// Load a stored survey.
///
/// The result starts with the repairs made while reading the document (see
/// [`SurveyDocument::warnings`]). Every question gets a fresh edit id. Rules are resolved by position: `qN`
/// refers to the N-th stored question whatever id that record carries.
/// A rule whose target or prerequisite is not among the loaded questions is
/// dropped. A rule pointing at a later question is kept, since the editor
/// reports it as invalid and it is omitted on save.
pub fn hydrate_with(document: &SurveyDocument, defaults: &BuilderDefaults) -> Hydrated {
    let mut warnings = document.warnings.clone();
    for warning in &warnings {
        warn!("Repaired while reading: {}", warning);
    }
    let mut used = HashSet::with_capacity(document.questions.len());

    let mut questions: Vec<Question> = document
        .questions
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let position = PositionalId::from_index(index);

            if let Some(stored) = &record.id
                && *stored != position
            {
                warn!("Question {} is stored with id {}", position, stored);
                warnings.push(LoadWarning::IdMismatch {
                    position: position.clone(),
                    stored: stored.clone(),
                });
            }

            let fields = record.to_fields().unwrap_or_else(|err| {
                warn!(question = %position, "Malformed question settings: {}", err);
                warnings.push(LoadWarning::MalformedFields {
                    position,
                    message: err.to_string(),
                });
                record.to_fields_with_kind(defaults.kind_for(record.question_type))
            });

            Question::new(unique_id(&mut used), fields)
        })
        .collect();

    for (target, rule) in &document.conditional_logic {
        let Some(target_index) = resolve(target, questions.len()) else {
            let dangling = DanglingDependency::UnknownTarget {
                target: target.clone(),
            };
            warn!("Dropping conditional logic: {}", dangling);
            warnings.push(dangling.into());
            continue;
        };
        let Some(prerequisite_index) = resolve(&rule.depends_on, questions.len()) else {
            let dangling = DanglingDependency::UnknownPrerequisite {
                target: target.clone(),
                depends_on: rule.depends_on.clone(),
            };
            warn!("Dropping conditional logic: {}", dangling);
            warnings.push(dangling.into());
            continue;
        };

        let dependent = questions[target_index].edit_id();
        let depends_on = questions[prerequisite_index].edit_id();
        if prerequisite_index >= target_index {
            let dangling = DanglingDependency::ForwardReference {
                dependent,
                depends_on,
            };
            warn!(question = %target, "Loaded rule is not satisfiable: {}", dangling);
            warnings.push(dangling.into());
        }

        questions[target_index].fields_mut().dependency =
            Some(rule.clone().with_depends_on(depends_on));
    }

    debug!(
        questions = questions.len(),
        warnings = warnings.len(),
        "Hydrated survey"
    );
    Hydrated {
        questions,
        warnings,
    }
}

/// Serialize editor questions for storage.
///
/// Ids are assigned `q1..qN` by current order. A rule is emitted only if it
/// passes [`validate_rule`](crate::validate_rule); everything else is omitted
/// and listed in [`Flattened::omitted`].
pub fn flatten(questions: &[Question]) -> Flattened {
    let positions = positions(questions);
    let mut conditional_logic = ConditionalLogic::new();
    let mut omitted = Vec::new();

    let records = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let id = PositionalId::from_index(index);

            if let Some(rule) = question.dependency() {
                match check_rule(questions, &positions, index, rule) {
                    Ok(prerequisite) => {
                        let depends_on = PositionalId::from_index(prerequisite);
                        conditional_logic
                            .insert(id.clone(), rule.clone().with_depends_on(depends_on));
                    }
                    Err(reason) => {
                        match &reason {
                            RuleError::Dangling(dangling) => {
                                warn!(question = %id, "Omitting rule: {}", dangling)
                            }
                            other => debug!(question = %id, "Omitting invalid rule: {}", other),
                        }
                        omitted.push(OmittedRule {
                            dependent: question.edit_id(),
                            reason,
                        });
                    }
                }
            }

            question.fields().to_record(id)
        })
        .collect();

    Flattened {
        questions: records,
        conditional_logic,
        omitted,
    }
}

/// The index `id` denotes among `len` questions.
fn resolve(id: &PositionalId, len: usize) -> Option<usize> {
    id.position().filter(|&index| index < len)
}

/// A fresh edit id not yet in `used`.
pub(crate) fn unique_id(used: &mut HashSet<EditId>) -> EditId {
    loop {
        let id = EditId::generate();
        if used.insert(id) {
            return id;
        }
    }
}
