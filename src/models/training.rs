use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{DEFAULT_PASSING_SCORE, DEFAULT_QUESTION_COUNT};

/// Who a training targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingScope {
    Individual,
    Department,
    Company,
}

/// Quiz parameters chosen by the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSettings {
    pub question_count: usize,
    pub passing_score: u8,
    pub style: String,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            passing_score: DEFAULT_PASSING_SCORE,
            style: "mixed".into(),
        }
    }
}

/// One uploaded source document on a draft. `extracted_text` is `None` when
/// extraction failed for this file; the file stays listed either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

/// In-progress authoring state for one training. Created empty, edited
/// field by field, then consumed by the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDraft {
    pub title: String,
    pub department: String,
    pub training_type: String,
    pub description: String,
    pub objectives: String,
    pub language: String,
    pub scope: TrainingScope,
    #[serde(default)]
    pub assigned_employees: BTreeSet<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub documents: Vec<DocumentAttachment>,
    #[serde(rename = "quizConfig")]
    pub quiz: QuizSettings,
}

impl Default for TrainingDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            department: String::new(),
            training_type: String::new(),
            description: String::new(),
            objectives: String::new(),
            language: "en".into(),
            scope: TrainingScope::Individual,
            assigned_employees: BTreeSet::new(),
            due_date: None,
            documents: vec![],
            quiz: QuizSettings::default(),
        }
    }
}

impl TrainingDraft {
    /// All successfully extracted document text, in upload order, separated
    /// by blank lines. Failed extractions contribute nothing.
    pub fn combined_document_text(&self) -> String {
        self.documents
            .iter()
            .filter_map(|d| d.extracted_text.as_deref())
            .filter(|t| !t.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// An individual-scope draft needs at least one assignee.
    pub fn assignment_is_valid(&self) -> bool {
        self.scope != TrainingScope::Individual || !self.assigned_employees.is_empty()
    }
}

/// One section of generated training material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSection {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub source_docs: Vec<String>,
}

/// Generated prose portion of a training module. Every field is optional
/// on the wire; renderers treat absence as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingContent {
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub sections: Vec<TrainingSection>,
    #[serde(default)]
    pub safety_notes: Vec<String>,
    #[serde(default)]
    pub best_practices: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
}

/// One multiple-choice quiz question. `correct` is a zero-based index into
/// the four `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Output of the generation pipeline: training material plus its quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTraining {
    pub training: TrainingContent,
    pub quiz: Vec<QuizQuestion>,
}

/// Persisted record of one quiz submission, passed or failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub training_title: String,
    pub score: usize,
    pub total: usize,
    pub percentage: u8,
    pub passed: bool,
    pub language: String,
    pub submitted_on: NaiveDate,
}
