//! Model-reply parsing and shape validation.
//!
//! Replies arrive as raw JSON, fenced ```json blocks, or JSON buried in
//! prose. Parsing is strict about the top-level shape (a reply with neither
//! `training` nor `quiz` is a validation failure the caller answers with
//! fallback content) and lenient per quiz question: a malformed question is
//! dropped, not fatal.

use serde_json::Value;
use thiserror::Error;

use crate::models::{GeneratedTraining, QuizQuestion, TrainingContent};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("model reply contained no JSON object")]
    NoJson,

    #[error("model reply was not valid JSON: {0}")]
    Json(String),

    #[error("model reply carried neither a training nor a quiz shape")]
    Shape,
}

/// Locate the JSON candidate inside a reply: a fenced block wins, then the
/// outermost brace span, then nothing.
fn candidate_json(reply: &str) -> Option<String> {
    if let Some(fence_start) = reply.find("```") {
        let after = &reply[fence_start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if !inner.is_empty() {
                return Some(inner.to_string());
            }
        }
    }

    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end >= start).then(|| reply[start..=end].to_string())
}

/// A question is usable when it deserialized, offers exactly four options,
/// and its answer index points at one of them.
fn question_is_valid(q: &QuizQuestion) -> bool {
    q.options.len() == 4 && q.correct < q.options.len()
}

/// Parse a model reply into a `GeneratedTraining`.
///
/// Failures come back as `Err` so the caller can substitute deterministic
/// fallback content; nothing here panics on model output.
pub fn parse_generation_reply(reply: &str) -> Result<GeneratedTraining, ValidationError> {
    let json_str = candidate_json(reply).ok_or(ValidationError::NoJson)?;

    let value: Value =
        serde_json::from_str(&json_str).map_err(|e| ValidationError::Json(e.to_string()))?;
    let obj = value.as_object().ok_or(ValidationError::Shape)?;

    let has_training = obj.contains_key("training");
    let has_quiz = obj.contains_key("quiz");
    if !has_training && !has_quiz {
        return Err(ValidationError::Shape);
    }

    let training: TrainingContent = obj
        .get("training")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    let quiz: Vec<QuizQuestion> = obj
        .get("quiz")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| serde_json::from_value::<QuizQuestion>(v.clone()).ok())
                .filter(question_is_valid)
                .collect()
        })
        .unwrap_or_default();

    let dropped = obj
        .get("quiz")
        .and_then(Value::as_array)
        .map(|items| items.len().saturating_sub(quiz.len()))
        .unwrap_or(0);
    if dropped > 0 {
        tracing::warn!(dropped, "dropped malformed quiz questions from model reply");
    }

    Ok(GeneratedTraining { training, quiz })
}

/// Force a quiz to exactly `requested` questions: excess is truncated, a
/// shortfall is filled by cycling `filler` (the deterministic fallback
/// quiz).
pub fn clamp_question_count(
    mut quiz: Vec<QuizQuestion>,
    requested: usize,
    filler: &[QuizQuestion],
) -> Vec<QuizQuestion> {
    quiz.truncate(requested);
    let mut next = 0;
    while quiz.len() < requested && !filler.is_empty() {
        quiz.push(filler[next % filler.len()].clone());
        next += 1;
    }
    quiz
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct: 0,
            explanation: "exp".into(),
            kind: "recall".into(),
            source: None,
        }
    }

    const FULL_REPLY: &str = r#"Here is your training module:

```json
{
  "training": {
    "introduction": "Welcome to the module",
    "sections": [{"title": "S", "content": "C", "keyPoints": ["k1"], "sourceDocs": ["m.pdf"]}],
    "safetyNotes": ["wear PPE"],
    "bestPractices": ["check twice"],
    "commonMistakes": ["skipping steps"]
  },
  "quiz": [
    {"question": "Q1?", "options": ["A","B","C","D"], "correct": 1,
     "explanation": "E1", "type": "policy", "source": "m.pdf"},
    {"question": "Q2?", "options": ["A","B","C","D"], "correct": 3,
     "explanation": "E2", "type": "recall"}
  ]
}
```

Let me know if you need changes."#;

    #[test]
    fn parses_fenced_reply() {
        let parsed = parse_generation_reply(FULL_REPLY).unwrap();
        assert_eq!(parsed.training.introduction, "Welcome to the module");
        assert_eq!(parsed.quiz.len(), 2);
        assert_eq!(parsed.quiz[1].correct, 3);
    }

    #[test]
    fn parses_bare_json() {
        let reply = r#"{"training": {"introduction": "hi"}, "quiz": []}"#;
        let parsed = parse_generation_reply(reply).unwrap();
        assert_eq!(parsed.training.introduction, "hi");
        assert!(parsed.quiz.is_empty());
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let reply = r#"Sure! {"training": {"introduction": "hi"}, "quiz": []} Hope that helps."#;
        let parsed = parse_generation_reply(reply).unwrap();
        assert_eq!(parsed.training.introduction, "hi");
    }

    #[test]
    fn unparseable_reply_is_an_error() {
        assert!(matches!(
            parse_generation_reply("I could not produce JSON, sorry."),
            Err(ValidationError::NoJson)
        ));
        assert!(matches!(
            parse_generation_reply("{not json at all]"),
            Err(ValidationError::Json(_))
        ));
    }

    #[test]
    fn reply_without_either_shape_is_an_error() {
        let reply = r#"{"message": "here you go", "data": []}"#;
        assert!(matches!(
            parse_generation_reply(reply),
            Err(ValidationError::Shape)
        ));
    }

    #[test]
    fn training_only_reply_yields_empty_quiz() {
        let reply = r#"{"training": {"introduction": "hi"}}"#;
        let parsed = parse_generation_reply(reply).unwrap();
        assert!(parsed.quiz.is_empty());
    }

    #[test]
    fn questions_with_bad_answer_index_are_dropped() {
        let reply = r#"{"training": {"introduction": "hi"}, "quiz": [
            {"question": "ok?", "options": ["A","B","C","D"], "correct": 2,
             "explanation": "E", "type": "t"},
            {"question": "bad index?", "options": ["A","B","C","D"], "correct": 7,
             "explanation": "E", "type": "t"},
            {"question": "bad options?", "options": ["A","B"], "correct": 0,
             "explanation": "E", "type": "t"}
        ]}"#;
        let parsed = parse_generation_reply(reply).unwrap();
        assert_eq!(parsed.quiz.len(), 1);
        assert_eq!(parsed.quiz[0].question, "ok?");
        assert!(parsed.quiz.iter().all(|q| q.correct < 4));
    }

    #[test]
    fn clamp_truncates_excess() {
        let quiz = vec![question("1"), question("2"), question("3"), question("4")];
        let clamped = clamp_question_count(quiz, 3, &[]);
        assert_eq!(clamped.len(), 3);
    }

    #[test]
    fn clamp_pads_shortfall_from_filler() {
        let quiz = vec![question("real")];
        let filler = vec![question("fill-a"), question("fill-b")];
        let clamped = clamp_question_count(quiz, 4, &filler);
        assert_eq!(clamped.len(), 4);
        assert_eq!(clamped[0].question, "real");
        assert_eq!(clamped[1].question, "fill-a");
        assert_eq!(clamped[2].question, "fill-b");
        assert_eq!(clamped[3].question, "fill-a");
    }

    #[test]
    fn clamp_exact_count_is_untouched() {
        let quiz = vec![question("1"), question("2")];
        let clamped = clamp_question_count(quiz.clone(), 2, &[question("fill")]);
        assert_eq!(clamped.len(), 2);
        assert_eq!(clamped[0].question, "1");
    }
}
