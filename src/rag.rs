//! Document relevance scoring for prompt grounding.
//!
//! This is a keyword-overlap heuristic, kept from the product's "RAG"
//! feature name for continuity. It is NOT semantic retrieval: no
//! embeddings, no vector store, just term matching over extracted text.
//! Treat scores as rough ordering hints only.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{DocumentAttachment, TrainingDraft};

/// One document's match against a query.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMatch {
    pub name: String,
    /// Fraction of query terms found in the document, 0.0-1.0.
    pub relevance: f64,
    /// Total occurrences of query terms in the document.
    pub hits: usize,
}

fn term_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\p{L}\p{N}]{3,}").expect("term pattern"))
}

/// Lowercased unique query terms, first-seen order.
fn query_terms(query: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in term_pattern().find_iter(&query.to_lowercase()) {
        let term = m.as_str().to_string();
        if !seen.contains(&term) {
            seen.push(term);
        }
    }
    seen
}

/// Rank a draft's extracted documents against a query by term overlap.
/// Documents without extracted text or without any match are omitted.
/// Ordering is deterministic: relevance descending, then name.
pub fn rank_documents(query: &str, docs: &[DocumentAttachment]) -> Vec<DocumentMatch> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return vec![];
    }

    let mut matches: Vec<DocumentMatch> = docs
        .iter()
        .filter_map(|doc| {
            let text = doc.extracted_text.as_deref()?.to_lowercase();
            let matched = terms.iter().filter(|t| text.contains(t.as_str())).count();
            if matched == 0 {
                return None;
            }
            let hits = terms.iter().map(|t| text.matches(t.as_str()).count()).sum();
            Some(DocumentMatch {
                name: doc.name.clone(),
                relevance: matched as f64 / terms.len() as f64,
                hits,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    matches
}

/// Short grounding notes for the prompt: for each of the top matching
/// documents, the first sentence that mentions a query term.
pub fn focus_notes(draft: &TrainingDraft) -> Vec<String> {
    let query = format!(
        "{} {} {}",
        draft.title, draft.training_type, draft.description
    );
    let terms = query_terms(&query);
    let ranked = rank_documents(&query, &draft.documents);

    ranked
        .iter()
        .take(3)
        .filter_map(|m| {
            let doc = draft.documents.iter().find(|d| d.name == m.name)?;
            let text = doc.extracted_text.as_deref()?;
            let sentence = first_matching_sentence(text, &terms)?;
            Some(format!("{}: {}", m.name, sentence))
        })
        .collect()
}

/// First sentence containing any query term, trimmed to 160 characters.
fn first_matching_sentence(text: &str, terms: &[String]) -> Option<String> {
    for raw in text.split_terminator(['.', '\n']) {
        let sentence = raw.trim();
        if sentence.is_empty() {
            continue;
        }
        let lower = sentence.to_lowercase();
        if terms.iter().any(|t| lower.contains(t.as_str())) {
            let clipped: String = sentence.chars().take(160).collect();
            return Some(clipped);
        }
    }
    None
}
