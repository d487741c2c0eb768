use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    ChoiceQuestion, ConditionRule, DEFAULT_POINTS, DocumentError, LoadWarning,
    MultipleChoiceQuestion, PositionalId, QuestionFields, QuestionKind, QuestionType,
    RatingQuestion, TextQuestion, Validation, YesNoQuestion,
};

/// Stored keys that belong to the editor and are never persisted on a question.
pub const EDITOR_ONLY_FIELDS: &[&str] = &["dependency"];

/// Conditional-display rules of a stored survey, keyed by the dependent question.
pub type ConditionalLogic = BTreeMap<PositionalId, ConditionRule<PositionalId>>;

/// A survey as it crosses the storage boundary.
///
/// Questions carry positional ids and no embedded rules; rules live in
/// `conditional_logic`.
///
/// Reading is lenient. A rule that cannot be parsed is dropped, and a common
/// question field (`id`, `question`, `points`, `addable`, `validation`) that
/// cannot be parsed falls back to its default. Each such repair is listed in
/// [`SurveyDocument::warnings`]. Only a document that is not a JSON object,
/// or a question without a known `type`, fails to read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredDocument")]
pub struct SurveyDocument {
    /// Storage id of the survey, `None` for a survey that was never saved.
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Questions in survey order.
    pub questions: Vec<QuestionRecord>,

    pub conditional_logic: ConditionalLogic,

    /// What had to be dropped or defaulted while reading. Never written.
    #[serde(skip)]
    pub warnings: Vec<LoadWarning>,
}

impl SurveyDocument {
    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert a JSON value into a document.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// The question a positional id denotes, by position.
    pub fn question(&self, id: &PositionalId) -> Option<&QuestionRecord> {
        self.questions.get(id.position()?)
    }

    /// The rule attached to a question, if any.
    pub fn rule_for(&self, target: &PositionalId) -> Option<&ConditionRule<PositionalId>> {
        self.conditional_logic.get(target)
    }
}

/// The stored shape before questions and rules are checked one by one.
#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    questions: Vec<Value>,

    #[serde(default)]
    conditional_logic: Option<Map<String, Value>>,
}

impl TryFrom<StoredDocument> for SurveyDocument {
    type Error = serde_json::Error;

    fn try_from(stored: StoredDocument) -> Result<Self, Self::Error> {
        let mut warnings = Vec::new();

        let questions = stored
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                read_question(PositionalId::from_index(index), value, &mut warnings)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut conditional_logic = ConditionalLogic::new();
        for (target, value) in stored.conditional_logic.unwrap_or_default() {
            let target = PositionalId::new(target);
            match serde_json::from_value(value) {
                Ok(rule) => {
                    conditional_logic.insert(target, rule);
                }
                Err(err) => warnings.push(LoadWarning::MalformedRule {
                    target,
                    message: err.to_string(),
                }),
            }
        }

        Ok(Self {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            questions,
            conditional_logic,
            warnings,
        })
    }
}

/// Read one stored question, dropping common fields that do not parse.
fn read_question(
    position: PositionalId,
    value: Value,
    warnings: &mut Vec<LoadWarning>,
) -> Result<QuestionRecord, serde_json::Error> {
    let mut object = match value {
        Value::Object(object) => object,
        other => return serde_json::from_value(other),
    };

    let malformed = [
        drop_malformed::<Option<PositionalId>>(&mut object, "id"),
        drop_malformed::<String>(&mut object, "question"),
        drop_malformed::<u32>(&mut object, "points"),
        drop_malformed::<bool>(&mut object, "addable"),
        drop_malformed::<Validation>(&mut object, "validation"),
    ];
    for message in malformed.into_iter().flatten() {
        warnings.push(LoadWarning::MalformedFields {
            position: position.clone(),
            message,
        });
    }

    serde_json::from_value(Value::Object(object))
}

/// Remove `key` if its value does not parse as `T`, describing why.
fn drop_malformed<T: DeserializeOwned>(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    let value = object.get(key)?;
    let err = serde_json::from_value::<T>(value.clone()).err()?;
    object.remove(key);
    Some(format!("'{key}' {err}"))
}

fn default_points() -> u32 {
    DEFAULT_POINTS
}

fn default_addable() -> bool {
    true
}

/// A question as stored: common fields plus the raw type-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Positional id, `q{n}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PositionalId>,

    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// The prompt text.
    #[serde(rename = "question", default)]
    pub prompt: String,

    #[serde(default = "default_points")]
    pub points: u32,

    #[serde(default = "default_addable")]
    pub addable: bool,

    /// Kept as `Some` whenever the stored question had the key, even if empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Validation>,

    /// Everything else: type-specific settings and unknown keys.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl QuestionRecord {
    /// Decode into editor fields.
    ///
    /// Known type-specific keys are parsed into the [`QuestionKind`]; unknown
    /// keys are kept in [`QuestionFields::extra`]; editor-only keys are dropped.
    /// The result never carries a rule: rules come from the document's
    /// conditional logic.
    pub fn to_fields(&self) -> Result<QuestionFields, serde_json::Error> {
        let mut fields = self.to_fields_with_kind(QuestionKind::Date);
        fields.kind = QuestionKind::take_fields(self.question_type, &mut fields.extra)?;
        Ok(fields)
    }

    /// Decode into editor fields, substituting `kind` when the stored
    /// type-specific keys cannot be parsed. The raw keys stay in `extra`.
    pub fn to_fields_with_kind(&self, kind: QuestionKind) -> QuestionFields {
        let mut extra = self.fields.clone();
        for key in EDITOR_ONLY_FIELDS {
            extra.remove(*key);
        }
        QuestionFields {
            prompt: self.prompt.clone(),
            kind,
            points: self.points,
            addable: self.addable,
            validation: self.validation.clone(),
            dependency: None,
            extra,
        }
    }
}

impl QuestionFields {
    /// Encode for storage under the given positional id. The rule is not included.
    pub fn to_record(&self, id: PositionalId) -> QuestionRecord {
        let mut fields = self.extra.clone();
        self.kind.put_fields(&mut fields);
        QuestionRecord {
            id: Some(id),
            question_type: self.kind.question_type(),
            prompt: self.prompt.clone(),
            points: self.points,
            addable: self.addable,
            validation: self.validation.clone(),
            fields,
        }
    }
}

impl QuestionKind {
    /// Remove and parse the keys this kind understands.
    fn take_fields(
        question_type: QuestionType,
        fields: &mut Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let text = |fields: &mut Map<String, Value>| -> Result<TextQuestion, serde_json::Error> {
            Ok(TextQuestion {
                placeholder: take(fields, "placeholder")?,
            })
        };
        let choice = |fields: &mut Map<String, Value>| -> Result<ChoiceQuestion, serde_json::Error> {
            Ok(ChoiceQuestion {
                options: take(fields, "options")?.unwrap_or_default(),
                randomize: take(fields, "randomize")?.unwrap_or(false),
                has_other_option: take(fields, "hasOtherOption")?.unwrap_or(false),
            })
        };

        Ok(match question_type {
            QuestionType::ShortText => Self::ShortText(text(fields)?),
            QuestionType::LongText => Self::LongText(text(fields)?),
            QuestionType::Email => Self::Email(text(fields)?),
            QuestionType::SingleChoice => Self::SingleChoice(choice(fields)?),
            QuestionType::MultipleChoice => Self::MultipleChoice(MultipleChoiceQuestion {
                choices: choice(fields)?,
                max_selections: take(fields, "maxSelections")?,
            }),
            QuestionType::Rating => Self::Rating(RatingQuestion {
                scale: take(fields, "scale")?.unwrap_or(RatingQuestion::DEFAULT_SCALE),
                low_label: take(fields, "lowLabel")?,
                high_label: take(fields, "highLabel")?,
            }),
            QuestionType::YesNo => Self::YesNo(YesNoQuestion {
                yes_label: take(fields, "yesLabel")?,
                no_label: take(fields, "noLabel")?,
            }),
            QuestionType::Date => Self::Date,
        })
    }

    /// Write the keys this kind understands, replacing any raw values.
    fn put_fields(&self, fields: &mut Map<String, Value>) {
        fn put_choice(fields: &mut Map<String, Value>, choice: &ChoiceQuestion) {
            fields.insert("options".into(), Value::from(choice.options.clone()));
            if choice.randomize {
                fields.insert("randomize".into(), Value::Bool(true));
            }
            if choice.has_other_option {
                fields.insert("hasOtherOption".into(), Value::Bool(true));
            }
        }

        match self {
            Self::ShortText(text) | Self::LongText(text) | Self::Email(text) => {
                put(fields, "placeholder", text.placeholder.clone());
            }
            Self::SingleChoice(choice) => put_choice(fields, choice),
            Self::MultipleChoice(multi) => {
                put_choice(fields, &multi.choices);
                put(fields, "maxSelections", multi.max_selections);
            }
            Self::Rating(rating) => {
                fields.insert("scale".into(), Value::from(rating.scale));
                put(fields, "lowLabel", rating.low_label.clone());
                put(fields, "highLabel", rating.high_label.clone());
            }
            Self::YesNo(yes_no) => {
                put(fields, "yesLabel", yes_no.yes_label.clone());
                put(fields, "noLabel", yes_no.no_label.clone());
            }
            Self::Date => {}
        }
    }
}

/// Remove `key` and parse it; missing and `null` both read as `None`.
fn take<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some),
    }
}

fn put<T: Into<Value>>(fields: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        fields.insert(key.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ConditionType;

    fn record(value: Value) -> QuestionRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_common_fields_take_defaults() {
        let record = record(json!({ "type": "DATE" }));
        assert_eq!(record.points, 5);
        assert!(record.addable);
        assert_eq!(record.prompt, "");
        assert!(record.id.is_none());
    }

    #[test]
    fn kind_fields_are_parsed_and_unknown_keys_kept() {
        let record = record(json!({
            "id": "q1",
            "type": "MULTIPLE_CHOICE",
            "question": "Pick some",
            "options": ["A", "B", "C"],
            "maxSelections": 2,
            "randomize": true,
            "accent": "purple",
        }));
        let fields = record.to_fields().unwrap();

        let QuestionKind::MultipleChoice(multi) = &fields.kind else {
            panic!("expected multiple choice, got {:?}", fields.kind);
        };
        assert_eq!(multi.choices.options, vec!["A", "B", "C"]);
        assert_eq!(multi.max_selections, Some(2));
        assert!(multi.choices.randomize);
        assert_eq!(fields.extra.len(), 1);
        assert_eq!(fields.extra["accent"], json!("purple"));
    }

    #[test]
    fn editor_only_dependency_is_stripped() {
        let record = record(json!({
            "type": "YES_NO",
            "question": "Ok?",
            "dependency": { "depends_on": "abc" },
        }));
        let fields = record.to_fields().unwrap();
        assert!(fields.extra.is_empty());
        assert!(fields.dependency.is_none());
    }

    #[test]
    fn wrongly_shaped_kind_fields_fail() {
        let record = record(json!({ "type": "RATING", "scale": "five" }));
        assert!(record.to_fields().is_err());
    }

    #[test]
    fn encoding_writes_kind_and_extra() {
        let record = record(json!({
            "id": "q7",
            "type": "RATING",
            "question": "How was it?",
            "scale": 7,
            "lowLabel": "Poor",
            "validation": { "required": true, "custom": 1 },
            "accent": "purple",
        }));
        let fields = record.to_fields().unwrap();
        let encoded = fields.to_record(PositionalId::from("q1"));

        assert_eq!(
            serde_json::to_value(&encoded).unwrap(),
            json!({
                "id": "q1",
                "type": "RATING",
                "question": "How was it?",
                "points": 5,
                "addable": true,
                "validation": { "required": true, "custom": 1 },
                "scale": 7,
                "lowLabel": "Poor",
                "accent": "purple",
            })
        );
    }

    #[test]
    fn document_parses_conditional_logic() {
        let document = SurveyDocument::from_value(json!({
            "id": null,
            "questions": [
                { "id": "q1", "type": "SINGLE_CHOICE", "question": "A", "options": ["x", "y"] },
                { "id": "q2", "type": "SHORT_TEXT", "question": "B" },
            ],
            "conditional_logic": {
                "q2": { "depends_on": "q1", "condition_type": "answerValueIs", "condition_value": "x" },
            },
        }))
        .unwrap();

        let rule = document.rule_for(&PositionalId::from("q2")).unwrap();
        assert_eq!(rule.depends_on, PositionalId::from("q1"));
        assert_eq!(rule.condition_type, ConditionType::Equals);
        assert_eq!(
            document.question(&rule.depends_on).unwrap().prompt,
            "A".to_string()
        );
    }

    #[test]
    fn document_id_serializes_as_null() {
        let json = SurveyDocument::default().to_json().unwrap();
        assert_eq!(json, r#"{"id":null,"questions":[],"conditional_logic":{}}"#);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SurveyDocument::from_json("{ not json"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn unreadable_rules_are_dropped_one_by_one() {
        let document = SurveyDocument::from_value(json!({
            "questions": [
                { "id": "q1", "type": "YES_NO", "question": "A" },
                { "id": "q2", "type": "SHORT_TEXT", "question": "B" },
                { "id": "q3", "type": "DATE", "question": "C" },
                { "id": "q4", "type": "DATE", "question": "D" },
            ],
            "conditional_logic": {
                "q2": { "depends_on": "q1", "condition_type": "equals", "condition_value": "Yes" },
                "q3": { "depends_on": "q1", "condition_type": "contains", "condition_value": "Y" },
                "q4": { "depends_on": "q1", "condition_type": "equals", "condition_value": null },
            },
        }))
        .unwrap();

        assert_eq!(document.len(), 4);
        assert_eq!(document.conditional_logic.len(), 1);
        assert!(document.rule_for(&PositionalId::from("q2")).is_some());

        let targets: Vec<_> = document
            .warnings
            .iter()
            .map(|warning| match warning {
                LoadWarning::MalformedRule { target, .. } => target.to_string(),
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(targets, vec!["q3", "q4"]);
    }

    #[test]
    fn unreadable_common_fields_fall_back_to_defaults() {
        let document = SurveyDocument::from_value(json!({
            "questions": [
                { "id": "q1", "type": "RATING", "question": "Rate", "points": "5", "addable": "yes" },
                { "id": 2, "type": "DATE", "question": ["Which", "day?"], "validation": "strict" },
            ],
        }))
        .unwrap();

        let first = &document.questions[0];
        assert_eq!(first.points, 5);
        assert!(first.addable);
        assert_eq!(first.prompt, "Rate");

        let second = &document.questions[1];
        assert_eq!(second.id, None);
        assert_eq!(second.prompt, "");
        assert_eq!(second.validation, None);

        let positions: Vec<_> = document
            .warnings
            .iter()
            .map(|warning| match warning {
                LoadWarning::MalformedFields { position, .. } => position.to_string(),
                other => panic!("unexpected warning {other:?}"),
            })
            .collect();
        assert_eq!(positions, vec!["q1", "q1", "q2", "q2", "q2"]);
    }

    #[test]
    fn question_without_known_type_fails_the_document() {
        let result = SurveyDocument::from_value(json!({
            "questions": [{ "id": "q1", "type": "MATRIX", "question": "Grid" }],
        }));
        assert!(matches!(result, Err(DocumentError::Json(_))));
    }

    #[test]
    fn empty_validation_object_survives_encoding() {
        let with_validation = record(json!({ "type": "EMAIL", "question": "Mail", "validation": {} }));
        assert_eq!(with_validation.validation, Some(Validation::default()));

        let encoded = with_validation.to_fields().unwrap().to_record(PositionalId::from("q1"));
        assert_eq!(serde_json::to_value(&encoded).unwrap()["validation"], json!({}));

        let bare = record(json!({ "type": "EMAIL", "question": "Mail" }));
        let encoded = bare.to_fields().unwrap().to_record(PositionalId::from("q1"));
        assert!(serde_json::to_value(&encoded).unwrap().get("validation").is_none());
    }
}
