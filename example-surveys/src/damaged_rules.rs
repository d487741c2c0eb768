use anyhow::Context;
use serde_json::{Value, json};
use survey_builder_types::SurveyDocument;

/// A survey whose stored data was partly corrupted.
///
/// - `q2` has `points` stored as text and `addable` as a string
/// - the rule on `q3` uses a comparison that does not exist
/// - the rule on `q4` has no value
/// - the rule on `q5` has no prerequisite
/// - the rules on `q2` and `q6` are intact
pub fn json() -> Value {
    json!({
        "id": "bikes-3",
        "title": "Cycling habits",
        "questions": [
            { "id": "q1", "type": "YES_NO", "question": "Do you own a bike?" },
            {
                "id": "q2",
                "type": "SINGLE_CHOICE",
                "question": "What kind?",
                "options": ["Road", "Mountain", "City"],
                "points": "5",
                "addable": "yes",
            },
            { "id": "q3", "type": "SHORT_TEXT", "question": "Which brand?" },
            { "id": "q4", "type": "RATING", "question": "How often do you ride?", "scale": 5 },
            { "id": "q5", "type": "DATE", "question": "When did you last ride?" },
            { "id": "q6", "type": "LONG_TEXT", "question": "What stops you from cycling?" },
        ],
        "conditional_logic": {
            "q2": { "depends_on": "q1", "condition_type": "equals", "condition_value": "Yes" },
            "q3": { "depends_on": "q2", "condition_type": "contains", "condition_value": "Road" },
            "q4": { "depends_on": "q1", "condition_type": "equals", "condition_value": null },
            "q5": { "condition_type": "equals", "condition_value": "Yes" },
            "q6": { "depends_on": "q1", "condition_type": "equals", "condition_value": "No" },
        },
    })
}

pub fn document() -> anyhow::Result<SurveyDocument> {
    SurveyDocument::from_value(json()).context("damaged rules fixture")
}
