use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use rand::seq::SliceRandom;
use serde::Deserialize;
use trivia_types::TriviaQuestion;
use uuid::Uuid;

const BUILTIN_CATALOG: &str = include_str!("../data/questions.json");

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    prompt: String,
    answer: String,
    options: Vec<String>,
}

/// The fixed catalogue of trivia items, loaded once at process start.
///
/// Read-only reference data: nothing is created or mutated at runtime.
pub struct QuestionBank {
    questions: Vec<TriviaQuestion>,
    by_id: HashMap<String, usize>,
}

impl QuestionBank {
    /// Load the embedded catalogue shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Build a bank from a JSON catalogue of `{prompt, answer, options}`.
    ///
    /// Ids are derived from the prompt (UUID v5) so they stay stable across
    /// processes; Match documents persist them between launches.
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(raw).context("question catalogue is not valid JSON")?;
        if entries.is_empty() {
            return Err(anyhow!("question catalogue is empty"));
        }

        let questions: Vec<TriviaQuestion> = entries
            .into_iter()
            .map(|entry| TriviaQuestion {
                id: Uuid::new_v5(&Uuid::NAMESPACE_OID, entry.prompt.as_bytes()),
                prompt: entry.prompt,
                answer: entry.answer,
                options: entry.options,
            })
            .collect();

        let by_id = questions
            .iter()
            .enumerate()
            .map(|(index, question)| (question.record_id(), index))
            .collect();

        Ok(Self { questions, by_id })
    }

    pub fn all(&self) -> &[TriviaQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&TriviaQuestion> {
        self.by_id.get(id).map(|&index| &self.questions[index])
    }

    /// Uniform random pick among questions whose id is not in `exclude`.
    ///
    /// When every catalogue entry has been used, selection wraps around:
    /// everything except the most recent exclusion becomes eligible again,
    /// so a fresh round never repeats the question just played. Returns
    /// `None` only when no distinct question exists at all.
    pub fn random_question(&self, exclude: &[String]) -> Option<&TriviaQuestion> {
        let mut rng = rand::thread_rng();

        let fresh: Vec<&TriviaQuestion> = self
            .questions
            .iter()
            .filter(|question| !exclude.contains(&question.record_id()))
            .collect();
        if !fresh.is_empty() {
            return fresh.choose(&mut rng).copied();
        }

        let current = exclude.last().map(String::as_str).unwrap_or("");
        let recycled: Vec<&TriviaQuestion> = self
            .questions
            .iter()
            .filter(|question| question.record_id() != current)
            .collect();
        recycled.choose(&mut rng).copied()
    }
}
