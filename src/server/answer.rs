use crate::model::{Function, Module};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("no functions have been indexed")]
    EmptyIndex,
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model endpoint responded with {0}")]
    Status(StatusCode),
    #[error("malformed model response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("model response had no message")]
    EmptyReply,
}

/// Produces the text for a `/chat` answer.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, AnswerError>;
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "can", "do", "does", "for", "how", "in", "is", "it", "of", "on",
    "or", "the", "this", "that", "to", "what", "when", "where", "which", "who", "why", "with",
];

/// Keyword index over every parsed function.
///
/// Terms from the name and qualified name count double; params and the
/// docstring count once. Ties keep dataset order.
pub struct FunctionIndex {
    entries: Vec<(Function, HashMap<String, usize>)>,
    top_k: usize,
}

impl FunctionIndex {
    pub fn new(modules: &[Module], top_k: usize) -> Self {
        let entries = modules
            .iter()
            .flat_map(|m| m.functions.iter())
            .map(|f| (f.clone(), weights(f)))
            .collect();
        Self {
            entries,
            top_k: top_k.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Functions matching `question`, best first, at most `top_k`.
    pub fn search(&self, question: &str) -> Vec<&Function> {
        let terms = tokenize(question);
        let mut scored: Vec<(usize, &Function)> = self
            .entries
            .iter()
            .map(|(f, w)| (terms.iter().filter_map(|t| w.get(t)).sum(), f))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(self.top_k)
            .map(|(_, f)| f)
            .collect()
    }
}

#[async_trait]
impl Answerer for FunctionIndex {
    async fn answer(&self, question: &str) -> Result<String, AnswerError> {
        self.summarize(question)
    }
}

impl FunctionIndex {
    /// Offline answer: the matching functions as a markdown list.
    pub fn summarize(&self, question: &str) -> Result<String, AnswerError> {
        if self.is_empty() {
            return Err(AnswerError::EmptyIndex);
        }

        let hits = self.search(question);
        if hits.is_empty() {
            return Ok("I couldn't find any functions related to that question.".to_string());
        }

        let mut out = format!("Most relevant functions ({}):\n", hits.len());
        for (rank, f) in hits.iter().enumerate() {
            out.push_str(&format!(
                "\n{}. **`{}`** ({}, line {})\n",
                rank + 1,
                f.qualified_name,
                f.module,
                f.line_number
            ));
            if let Some(doc) = &f.docstring {
                out.push_str(&format!("   {}\n", doc.lines().next().unwrap_or("")));
            }
            if !f.params.is_empty() {
                out.push_str(&format!("   Parameters: {}\n", f.params.join(", ")));
            }
            if !f.calls.is_empty() {
                out.push_str(&format!("   Calls: {}\n", f.calls.join(", ")));
            }
        }
        Ok(out)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

fn weights(f: &Function) -> HashMap<String, usize> {
    let mut weights = HashMap::new();
    for term in tokenize(&f.qualified_name) {
        weights.insert(term, 2);
    }
    let params = f.params.join(" ");
    let doc = f.docstring.as_deref().unwrap_or("");
    for term in tokenize(&params).into_iter().chain(tokenize(doc)) {
        weights.entry(term).or_insert(1);
    }
    weights
}
