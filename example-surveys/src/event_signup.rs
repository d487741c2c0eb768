use anyhow::Context;
use serde_json::{Value, json};
use survey_builder_types::SurveyDocument;

/// An event registration with more than nine questions, written with the
/// legacy condition names. `q10` depends on `q2`, so sorting keys as plain
/// strings would put it before `q2`.
pub fn json() -> Value {
    json!({
        "id": null,
        "title": "Summer Meetup",
        "questions": [
            { "id": "q1", "type": "SHORT_TEXT", "question": "Full name", "validation": { "required": true } },
            { "id": "q2", "type": "YES_NO", "question": "Will you attend in person?", "yesLabel": "Count me in" },
            { "id": "q3", "type": "SINGLE_CHOICE", "question": "Meal preference", "options": ["Vegetarian", "Vegan", "No preference"] },
            { "id": "q4", "type": "LONG_TEXT", "question": "Allergies" },
            { "id": "q5", "type": "MULTIPLE_CHOICE", "question": "Sessions", "options": ["Keynote", "Workshops", "Lightning talks"], "maxSelections": 2 },
            { "id": "q6", "type": "DATE", "question": "Arrival date", "validation": { "minDate": "2024-07-01" } },
            { "id": "q7", "type": "RATING", "question": "How excited are you?", "scale": 10 },
            { "id": "q8", "type": "SHORT_TEXT", "question": "What would make it better?" },
            { "id": "q9", "type": "EMAIL", "question": "Email for updates" },
            { "id": "q10", "type": "LONG_TEXT", "question": "Why remote?" },
        ],
        "conditional_logic": {
            "q3": { "depends_on": "q2", "condition_type": "answerValueIs", "condition_value": "Yes" },
            "q4": { "depends_on": "q3", "condition_type": "answerValueIs", "condition_value": "No preference" },
            "q8": { "depends_on": "q7", "condition_type": "answerValueLessThan", "condition_value": "6" },
            "q10": { "depends_on": "q2", "condition_type": "answerValueIs", "condition_value": "No" },
        },
    })
}

pub fn document() -> anyhow::Result<SurveyDocument> {
    SurveyDocument::from_value(json()).context("event signup fixture")
}
