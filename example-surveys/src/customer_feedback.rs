use anyhow::Context;
use serde_json::{Value, json};
use survey_builder_types::SurveyDocument;

/// A short feedback form. Rules hang off a choice, a rating and a yes/no question.
///
/// - `q2` only when `q1` is "In store"
/// - `q4` only when `q3` is below 3
/// - `q6` only when `q5` is "Yes"
pub fn json() -> Value {
    json!({
        "id": "feedback-2024",
        "title": "Customer Feedback",
        "description": "Tell us how we did.",
        "questions": [
            {
                "id": "q1",
                "type": "SINGLE_CHOICE",
                "question": "Where did you shop?",
                "points": 5,
                "addable": true,
                "options": ["In store", "Online", "By phone"],
            },
            {
                "id": "q2",
                "type": "SHORT_TEXT",
                "question": "Which store?",
                "points": 5,
                "addable": false,
                "placeholder": "Store name",
            },
            {
                "id": "q3",
                "type": "RATING",
                "question": "How satisfied are you overall?",
                "points": 10,
                "addable": true,
                "scale": 5,
                "lowLabel": "Not at all",
                "highLabel": "Very",
                "validation": { "required": true },
            },
            {
                "id": "q4",
                "type": "LONG_TEXT",
                "question": "What went wrong?",
                "points": 5,
                "addable": true,
                "placeholder": "Type answer here...",
                "validation": { "minLength": 10 },
            },
            {
                "id": "q5",
                "type": "YES_NO",
                "question": "May we contact you?",
                "points": 5,
                "addable": true,
            },
            {
                "id": "q6",
                "type": "EMAIL",
                "question": "Your email address",
                "points": 5,
                "addable": true,
                "validation": { "emailFormat": true },
            },
        ],
        "conditional_logic": {
            "q2": { "depends_on": "q1", "condition_type": "equals", "condition_value": "In store" },
            "q4": { "depends_on": "q3", "condition_type": "less_than", "condition_value": 3 },
            "q6": { "depends_on": "q5", "condition_type": "equals", "condition_value": "Yes" },
        },
    })
}

pub fn document() -> anyhow::Result<SurveyDocument> {
    SurveyDocument::from_value(json()).context("customer feedback fixture")
}
