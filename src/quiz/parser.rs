// src/quiz/parser.rs

use serde_json::Value;

use crate::{error::AppError, models::quiz::QuizQuestion, utils::text::strip_code_fences};

/// Decodes model output into validated quiz questions.
///
/// The strict path expects the whole (fence-stripped) text to be a JSON array, or an
/// object with a `questions` array. If that fails, the text is scanned for the first
/// JSON array of objects, which tolerates prose around the payload.
///
/// Any element that violates the question shape rejects the whole batch. Strings are
/// kept exactly as the model wrote them.
pub fn parse_questions(raw: &str) -> Result<Vec<QuizQuestion>, AppError> {
    let items = match decode_strict(raw) {
        Some(items) => items,
        None => {
            tracing::debug!("Strict decode failed, scanning model output for a JSON array");
            find_object_array(raw).ok_or_else(|| {
                AppError::MalformedResponse("no JSON array of questions found".to_string())
            })?
        }
    };

    if items.is_empty() {
        return Err(AppError::MalformedResponse(
            "model returned an empty question list".to_string(),
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| validate_question(idx, item))
        .collect()
}

fn decode_strict(raw: &str) -> Option<Vec<Value>> {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<Value>(&cleaned).ok()? {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Tries each `[` in turn and stream-decodes a JSON value starting there.
/// Returns the first array whose elements are all objects.
fn find_object_array(raw: &str) -> Option<Vec<Value>> {
    raw.match_indices('[').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Array(items)))
                if !items.is_empty() && items.iter().all(Value::is_object) =>
            {
                Some(items)
            }
            _ => None,
        }
    })
}

fn malformed(idx: usize, reason: &str) -> AppError {
    AppError::MalformedResponse(format!("question {}: {}", idx + 1, reason))
}

fn validate_question(idx: usize, item: &Value) -> Result<QuizQuestion, AppError> {
    let obj = item
        .as_object()
        .ok_or_else(|| malformed(idx, "element is not an object"))?;

    let question = obj
        .get("question")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(idx, "missing `question` string"))?
        .to_string();

    let options = obj
        .get("options")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(idx, "missing `options` array"))?
        .iter()
        .map(|opt| {
            opt.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed(idx, "every option must be a string"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if options.len() < 2 {
        return Err(malformed(idx, "at least two options are required"));
    }

    let correct_answer = obj
        .get("correct_answer")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed(idx, "`correct_answer` must be a non-negative integer"))?;

    let correct_answer = usize::try_from(correct_answer)
        .ok()
        .filter(|&c| c < options.len())
        .ok_or_else(|| {
            malformed(
                idx,
                &format!(
                    "`correct_answer` {} is out of range for {} options",
                    correct_answer,
                    options.len()
                ),
            )
        })?;

    let explanation = match obj.get("explanation") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(malformed(idx, "`explanation` must be a string")),
    };

    Ok(QuizQuestion {
        question,
        options,
        correct_answer,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                question: "What does photosynthesis convert light into?".to_string(),
                options: vec![
                    "Energy".to_string(),
                    "Water".to_string(),
                    "Soil".to_string(),
                    "Wind".to_string(),
                ],
                correct_answer: 0,
                explanation: Some("Plants store light as chemical energy.".to_string()),
            },
            QuizQuestion {
                question: "Which organelle hosts photosynthesis?".to_string(),
                options: vec!["Nucleus".to_string(), "Chloroplast".to_string()],
                correct_answer: 1,
                explanation: None,
            },
        ]
    }

    #[test]
    fn parses_plain_array() {
        let raw = serde_json::to_string(&sample()).unwrap();
        assert_eq!(parse_questions(&raw).unwrap(), sample());
    }

    #[test]
    fn tolerates_prose_and_closing_fence() {
        let body = serde_json::to_string_pretty(&sample()).unwrap();
        let raw = format!("Sure! Here is a quiz based on your notes [draft]:\n{}\n```", body);
        assert_eq!(parse_questions(&raw).unwrap(), sample());
    }

    #[test]
    fn tolerates_full_code_fence() {
        let body = serde_json::to_string(&sample()).unwrap();
        let raw = format!("```json\n{}\n```\nGood luck!", body);
        assert_eq!(parse_questions(&raw).unwrap(), sample());
    }

    #[test]
    fn accepts_questions_wrapper_object() {
        let raw = serde_json::json!({ "questions": sample() }).to_string();
        assert_eq!(parse_questions(&raw).unwrap(), sample());
    }

    #[test]
    fn brackets_inside_strings_do_not_confuse_scanner() {
        let raw = r#"Result: [{"question":"Is [x] a list?","options":["yes]","no"],"correct_answer":0}]"#;
        let parsed = parse_questions(raw).unwrap();
        assert_eq!(parsed[0].question, "Is [x] a list?");
        assert_eq!(parsed[0].options[0], "yes]");
    }

    #[test]
    fn rejects_missing_options_for_whole_batch() {
        let raw = r#"[
            {"question":"ok","options":["a","b"],"correct_answer":0},
            {"question":"broken","correct_answer":0}
        ]"#;
        assert!(matches!(
            parse_questions(raw),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let raw = r#"[{"question":"q","options":["a","b"],"correct_answer":2}]"#;
        assert!(matches!(
            parse_questions(raw),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_negative_or_fractional_answer() {
        for answer in ["-1", "0.5", "\"1\""] {
            let raw = format!(
                r#"[{{"question":"q","options":["a","b"],"correct_answer":{}}}]"#,
                answer
            );
            assert!(parse_questions(&raw).is_err(), "accepted {}", answer);
        }
    }

    #[test]
    fn rejects_single_option() {
        let raw = r#"[{"question":"q","options":["only"],"correct_answer":0}]"#;
        assert!(parse_questions(raw).is_err());
    }

    #[test]
    fn rejects_text_without_array() {
        assert!(matches!(
            parse_questions("I could not generate a quiz from these notes."),
            Err(AppError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_empty_array() {
        assert!(parse_questions("[]").is_err());
    }

    #[test]
    fn padded_strings_round_trip_unchanged() {
        let questions = vec![
            QuizQuestion {
                question: "What is 2 + 2? ".to_string(),
                options: vec![" 4".to_string(), "5".to_string()],
                correct_answer: 0,
                explanation: Some("  ".to_string()),
            },
            QuizQuestion {
                question: String::new(),
                options: vec!["".to_string(), " b ".to_string()],
                correct_answer: 1,
                explanation: None,
            },
        ];
        let raw = format!(
            "Here you go:\n{}\n```",
            serde_json::to_string(&questions).unwrap()
        );
        assert_eq!(parse_questions(&raw).unwrap(), questions);
    }

    #[test]
    fn rejects_non_string_question() {
        let raw = r#"[{"question":42,"options":["a","b"],"correct_answer":0}]"#;
        assert!(matches!(
            parse_questions(raw),
            Err(AppError::MalformedResponse(_))
        ));
    }
}
