//! Generation prompt assembly.
//!
//! The prompt is a pure function of its inputs: identical draft, config and
//! document text produce a byte-identical string. That property is load
//! bearing for request dedup and for the tests below.

use crate::config::{language_name, MAX_DOCUMENT_CHARS, TRUNCATION_MARKER};
use crate::models::{Employee, SetupConfig, TrainingDraft, TrainingScope};

/// The exact reply shape requested from the model. Kept as one literal so
/// the instruction block never drifts from the parser's expectations.
const RESPONSE_SCHEMA: &str = r#"{
  "training": {
    "introduction": "Welcome message and overview",
    "sections": [
      {
        "title": "Section title",
        "content": "Section content",
        "keyPoints": ["Point 1", "Point 2", "Point 3"],
        "sourceDocs": ["doc1.pdf", "doc2.pdf"]
      }
    ],
    "safetyNotes": ["Safety point 1", "Safety point 2"],
    "bestPractices": ["Practice 1", "Practice 2"],
    "commonMistakes": ["Mistake 1", "Mistake 2"]
  },
  "quiz": [
    {
      "question": "Question text?",
      "options": ["A) Option 1", "B) Option 2", "C) Option 3", "D) Option 4"],
      "correct": 1,
      "explanation": "Explanation of the correct answer",
      "type": "Question type",
      "source": "source_document.pdf"
    }
  ]
}"#;

/// Cap `text` to `budget` characters. When cut, the continuation marker is
/// included inside the budget so the returned string never exceeds it.
pub fn truncate_to_budget(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    let keep = budget.saturating_sub(marker_len);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Audience line for the prompt, resolved from the draft's scope.
fn audience_line(draft: &TrainingDraft, roster: &[Employee]) -> String {
    match draft.scope {
        TrainingScope::Individual => {
            let names: Vec<&str> = draft
                .assigned_employees
                .iter()
                .filter_map(|id| roster.iter().find(|e| &e.id == id))
                .map(|e| e.name.as_str())
                .collect();
            names.join(", ")
        }
        TrainingScope::Department => {
            format!("All {} department employees", draft.department)
        }
        TrainingScope::Company => "All company employees".to_string(),
    }
}

/// Assemble the full generation prompt.
///
/// `focus_notes` are optional grounding hints (document relevance summary);
/// an empty slice omits the block entirely.
pub fn build_training_prompt(
    draft: &TrainingDraft,
    config: &SetupConfig,
    roster: &[Employee],
    focus_notes: &[String],
) -> String {
    let language = language_name(&draft.language);
    let audience = audience_line(draft, roster);
    let question_count = draft.quiz.question_count;

    let mut prompt = format!(
        "Create a comprehensive training module in {language} for:\n\
         - Training Title: {title}\n\
         - Company: {company}\n\
         - Department: {department}\n\
         - Audience: {audience}\n\
         - Training Type: {training_type}\n\
         - Language: {language}\n",
        title = draft.title,
        company = config.company.name,
        department = draft.department,
        training_type = draft.training_type,
    );

    let document_text = draft.combined_document_text();
    if !document_text.is_empty() {
        let bounded = truncate_to_budget(&document_text, MAX_DOCUMENT_CHARS);
        prompt.push_str("\nCompany documents provided for grounding:\n<documents>\n");
        prompt.push_str(&bounded);
        prompt.push_str("\n</documents>\n");
    }

    if !focus_notes.is_empty() {
        prompt.push_str("\nKey points from the company documents:\n");
        for note in focus_notes {
            prompt.push_str("- ");
            prompt.push_str(note);
            prompt.push('\n');
        }
    }

    prompt.push_str(&format!(
        "\nAll generated prose must be written in {language}.\n\
         Return ONLY a JSON object with this exact structure:\n{RESPONSE_SCHEMA}\n\n\
         The \"quiz\" array must contain exactly {question_count} questions. \
         Every \"correct\" value is the zero-based index of the right option (0-3).\n"
    ));

    prompt
}
