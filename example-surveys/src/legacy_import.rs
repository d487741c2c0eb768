use anyhow::Context;
use serde_json::{Value, json};
use survey_builder_types::SurveyDocument;

/// A survey saved by an older builder, with the problems such data tends to have.
///
/// - `q2` carries an editor-only `dependency` key and an unknown `accent` key
/// - `q3` has a rating scale stored as text
/// - the rule on `q3` points at `q7`, which does not exist
/// - the rule on `q5` targets a question that does not exist
/// - the rule on `q1` points forward at `q2`
pub fn json() -> Value {
    json!({
        "id": "legacy-7",
        "questions": [
            { "id": "q1", "type": "SHORT_TEXT", "question": "Name" },
            {
                "id": "q2",
                "type": "YES_NO",
                "question": "Returning visitor?",
                "dependency": { "dependsOn": "1699999999", "conditionType": "equals" },
                "accent": "teal",
            },
            { "id": "q3", "type": "RATING", "question": "Rate the venue", "scale": "five" },
        ],
        "conditional_logic": {
            "q1": { "depends_on": "q2", "condition_type": "equals", "condition_value": "Yes" },
            "q3": { "depends_on": "q7", "condition_type": "equals", "condition_value": "Yes" },
            "q5": { "depends_on": "q1", "condition_type": "not-equals", "condition_value": "x" },
        },
    })
}

pub fn document() -> anyhow::Result<SurveyDocument> {
    SurveyDocument::from_value(json()).context("legacy import fixture")
}
