// Unit tests for the response evaluator

use personal_manager::core::{
    parse_answer_set, render_prompt, score_answers, strip_code_fence, AnswerLabel,
    EvaluationError, CONVERSATION_MARKER,
};
use personal_manager::ParsedAnswerSet;
use serde_json::json;

#[test]
fn test_rendered_prompt_contains_subject_at_marker() {
    let templates = [
        "{conversation}",
        "Evaluate:\n{conversation}\nAnswer in JSON.",
        "prefix {conversation}",
        "{conversation} suffix",
    ];
    let subject = "Agent: hello!\nCustomer: hi, I need help with my order.";

    for template in templates {
        let prompt = render_prompt(template, subject).unwrap();
        let position = template.find(CONVERSATION_MARKER).unwrap();

        assert_eq!(&prompt[position..position + subject.len()], subject);
        assert_eq!(prompt.matches(subject).count(), 1);
        assert!(!prompt.contains(CONVERSATION_MARKER));
    }
}

#[test]
fn test_subject_containing_marker_is_not_expanded_again() {
    let prompt = render_prompt("Q: {conversation}", "says {conversation}").unwrap();
    assert_eq!(prompt, "Q: says {conversation}");
}

#[test]
fn test_invalid_input() {
    for subject in ["", " ", "\t\n"] {
        assert!(matches!(
            render_prompt("{conversation}", subject),
            Err(EvaluationError::InvalidInput(_))
        ));
    }
    for template in ["", "Rate the conversation", "{ conversation }", "{conversations"] {
        assert!(matches!(
            render_prompt(template, "hello"),
            Err(EvaluationError::InvalidInput(_))
        ));
    }
}

#[test]
fn test_fenced_output_scores_five() {
    let raw = "```json\n{\"Q1\":\"Good\",\"Q2\":\"Yes\"}\n```";
    let answers = parse_answer_set(raw).unwrap();

    let expected: ParsedAnswerSet =
        serde_json::from_value(json!({"Q1": "Good", "Q2": "Yes"})).unwrap();
    assert_eq!(answers, expected);
    assert_eq!(score_answers(&answers).unwrap(), 5.00);
}

#[test]
fn test_poor_and_average_score_two() {
    let answers = parse_answer_set(r#"{"Q1":"Poor","Q2":"Average"}"#).unwrap();
    assert_eq!(score_answers(&answers).unwrap(), 2.00);
}

#[test]
fn test_unknown_labels_have_no_valid_answers() {
    let answers = parse_answer_set(r#"{"Q1":"Unknown"}"#).unwrap();
    assert!(matches!(score_answers(&answers), Err(EvaluationError::NoValidAnswers)));
}

#[test]
fn test_non_json_is_malformed() {
    for raw in ["Sure! Here is my evaluation.", "```json\n```", "{\"Q1\": \"Good\""] {
        assert!(matches!(
            parse_answer_set(raw),
            Err(EvaluationError::MalformedResponse(_))
        ));
    }
}

#[test]
fn test_only_closing_fence_is_stripped() {
    assert_eq!(strip_code_fence("{\"Q1\":\"No\"}\n```"), "{\"Q1\":\"No\"}\n");
    let answers = parse_answer_set("{\"Q1\":\"No\"}\n```").unwrap();
    assert_eq!(score_answers(&answers).unwrap(), 1.00);
}

#[test]
fn test_score_range_and_rounding() {
    // Every combination of up to three labels
    let labels = AnswerLabel::ALL;
    for a in labels {
        for b in labels {
            for c in labels {
                let answers: ParsedAnswerSet = serde_json::from_value(json!({
                    "Q1": a.as_str(),
                    "Q2": b.as_str(),
                    "Q3": c.as_str(),
                    "Q4": "N/A"
                }))
                .unwrap();

                let score = score_answers(&answers).unwrap();
                assert!((1.0..=5.0).contains(&score), "score {score} out of range");
                assert_eq!((score * 100.0).round() / 100.0, score);

                let mean = f64::from(a.score() + b.score() + c.score()) / 3.0;
                assert!((score - mean).abs() <= 0.005);
            }
        }
    }
}
