use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::catalog::AnswerCatalog;
use super::domain::AnswerId;

/// Errors returned by score mutations. State is left untouched whenever one is raised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("answer {0} is not part of this review")]
    AnswerNotFound(AnswerId),
    #[error("answer group '{0}' is not part of this review")]
    GroupNotFound(String),
    #[error("score {score} for answer {answer} is outside 0..={max}")]
    InvalidScore { answer: AnswerId, score: u8, max: u8 },
    #[error("answer {0} has no AI suggestion that can be adopted")]
    SuggestionUnavailable(AnswerId),
}

/// What a single `set_score` call did to the stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreChange {
    Assigned { score: u8 },
    Replaced { previous: u8, score: u8 },
    Cleared { previous: u8 },
}

impl ScoreChange {
    pub fn stored(self) -> Option<u8> {
        match self {
            ScoreChange::Assigned { score } | ScoreChange::Replaced { score, .. } => Some(score),
            ScoreChange::Cleared { .. } => None,
        }
    }
}

/// Grading progress across the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub scored: usize,
    pub total: usize,
    pub percent: f64,
}

/// Grader-assigned scores keyed by answer. Absence of an entry means "unscored".
#[derive(Debug, Default, Clone)]
pub struct ScoreStore {
    entries: BTreeMap<AnswerId, u8>,
    seeded: bool,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives every answer matching the model answer its maximum score.
    ///
    /// Only the first call seeds; existing entries are never overwritten. Returns the number of
    /// answers seeded.
    pub fn initialize(&mut self, catalog: &AnswerCatalog) -> usize {
        if self.seeded {
            return 0;
        }
        self.seeded = true;

        let mut seeded = 0;
        for answer in catalog.answers() {
            if catalog.matches_model_answer(answer) && !self.entries.contains_key(&answer.id) {
                self.entries.insert(answer.id, answer.max_score);
                seeded += 1;
            }
        }

        debug!(seeded, "seeded model-answer matches");
        seeded
    }

    pub fn get(&self, id: AnswerId) -> Option<u8> {
        self.entries.get(&id).copied()
    }

    pub fn is_scored(&self, id: AnswerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn entries(&self) -> &BTreeMap<AnswerId, u8> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `score`, or removes the entry when it already holds exactly `score`.
    pub fn set_score(
        &mut self,
        catalog: &AnswerCatalog,
        id: AnswerId,
        score: u8,
    ) -> Result<ScoreChange, ReviewError> {
        let answer = catalog.answer(id).ok_or(ReviewError::AnswerNotFound(id))?;
        if !answer.accepts(score) {
            return Err(ReviewError::InvalidScore {
                answer: id,
                score,
                max: answer.max_score,
            });
        }

        let change = match self.entries.get(&id).copied() {
            Some(previous) if previous == score => {
                self.entries.remove(&id);
                ScoreChange::Cleared { previous }
            }
            Some(previous) => {
                self.entries.insert(id, score);
                ScoreChange::Replaced { previous, score }
            }
            None => {
                self.entries.insert(id, score);
                ScoreChange::Assigned { score }
            }
        };

        debug!(answer = %id, ?change, "score updated");
        Ok(change)
    }

    pub fn clear_score(&mut self, id: AnswerId) -> Option<u8> {
        self.entries.remove(&id)
    }

    /// Overwrites the score of every answer in the group. Never toggles.
    ///
    /// The whole group is checked against `score` before anything is written.
    pub fn apply_group_score(
        &mut self,
        catalog: &AnswerCatalog,
        label: &str,
        score: u8,
    ) -> Result<Vec<AnswerId>, ReviewError> {
        let group = catalog
            .group(label)
            .ok_or_else(|| ReviewError::GroupNotFound(label.to_string()))?;

        if let Some(answer) = group.answers.iter().find(|answer| !answer.accepts(score)) {
            return Err(ReviewError::InvalidScore {
                answer: answer.id,
                score,
                max: answer.max_score,
            });
        }

        let ids: Vec<AnswerId> = group.answers.iter().map(|answer| answer.id).collect();
        for id in &ids {
            self.entries.insert(*id, score);
        }

        debug!(group = label, score, updated = ids.len(), "group scored");
        Ok(ids)
    }

    /// Stores every defined AI score, overwriting manual scores.
    ///
    /// Confidence is not consulted here; it only governs what the gate offers per answer.
    pub fn apply_all_ai_suggestions(&mut self, catalog: &AnswerCatalog) -> Vec<AnswerId> {
        let mut adopted = Vec::new();
        for answer in catalog.answers() {
            if let Some(suggestion) = answer.ai_score {
                self.entries.insert(answer.id, suggestion);
                adopted.push(answer.id);
            }
        }

        debug!(adopted = adopted.len(), "applied all AI suggestions");
        adopted
    }

    pub fn progress(&self, catalog: &AnswerCatalog) -> Progress {
        let total = catalog.len();
        let scored = self
            .entries
            .keys()
            .filter(|id| catalog.contains(**id))
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            scored as f64 / total as f64 * 100.0
        };

        Progress {
            scored,
            total,
            percent,
        }
    }

    /// Forgets every score and allows `initialize` to seed again.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.seeded = false;
    }
}
