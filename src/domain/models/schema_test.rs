use super::Field;
use super::Schema;
use crate::domain::models::PipelineError;

const SCHEMA: Schema = Schema {
    name: "answer-domain-question-input",
    fields: &[
        Field {
            name: "question",
            required: true,
            description: "The question to be answered.",
        },
        Field {
            name: "chatHistory",
            required: false,
            description: "Previous chat history.",
        },
    ],
};

#[test]
fn it_accepts_a_valid_object() {
    let input = serde_json::json!({
        "question": "What is the risk?",
        "chatHistory": "",
    });

    assert!(SCHEMA.validate_input(&input).is_ok());
}

#[test]
fn it_rejects_non_objects() {
    let err = SCHEMA
        .validate_input(&serde_json::json!("What is the risk?"))
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::Validation(
            "answer-domain-question-input expects a JSON object".to_string()
        ))
    );
}

#[test]
fn it_rejects_missing_required_fields() {
    let err = SCHEMA
        .validate_input(&serde_json::json!({ "chatHistory": "" }))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Validation(_))
    ));
}

#[test]
fn it_rejects_empty_required_fields() {
    let err = SCHEMA
        .validate_input(&serde_json::json!({ "question": "   " }))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Validation(_))
    ));
}

#[test]
fn it_rejects_non_string_fields() {
    let err = SCHEMA
        .validate_input(&serde_json::json!({ "question": 42 }))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Validation(_))
    ));
}

#[test]
fn it_allows_empty_output_fields() {
    let output = Schema {
        name: "answer-domain-question-output",
        fields: &[Field {
            name: "answer",
            required: true,
            description: "The answer to the question.",
        }],
    };

    assert!(output.validate_output(&serde_json::json!({ "answer": "" })).is_ok());
    assert!(output.validate_output(&serde_json::json!({})).is_ok());
    assert!(output.validate_output(&serde_json::json!({ "answer": 13 })).is_err());
    assert!(output.validate_output(&serde_json::json!([])).is_err());
}
