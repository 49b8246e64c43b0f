use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::AnswerCatalog;
use super::domain::{Answer, AnswerGroup, AnswerId};
use super::scores::ScoreStore;

/// Handle for one scheduled exit transition. Completing a stale ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitTicket {
    pub answer_id: AnswerId,
    pub sequence: u64,
}

/// Answers that are scored but still shown, faded, until their exit transition ends.
#[derive(Debug, Default, Clone)]
pub struct PendingRemovals {
    entries: BTreeMap<AnswerId, u64>,
    next_sequence: u64,
}

impl PendingRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags the answer as leaving. A newer mark supersedes any earlier ticket.
    pub fn mark(&mut self, answer_id: AnswerId) -> ExitTicket {
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.entries.insert(answer_id, sequence);
        ExitTicket {
            answer_id,
            sequence,
        }
    }

    pub fn cancel(&mut self, answer_id: AnswerId) -> bool {
        self.entries.remove(&answer_id).is_some()
    }

    /// Ends the transition if `ticket` is still the current mark for its answer.
    pub fn complete(&mut self, ticket: ExitTicket) -> bool {
        match self.entries.get(&ticket.answer_id) {
            Some(&sequence) if sequence == ticket.sequence => {
                self.entries.remove(&ticket.answer_id);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, answer_id: AnswerId) -> bool {
        self.entries.contains_key(&answer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The answers of `group` to render, in catalog order.
pub fn visible_answers<'a>(
    group: &'a AnswerGroup,
    hide_scored: bool,
    scores: &ScoreStore,
    pending: &PendingRemovals,
) -> Vec<&'a Answer> {
    if !hide_scored {
        return group.answers.iter().collect();
    }

    group
        .answers
        .iter()
        .filter(|answer| !scores.is_scored(answer.id) || pending.contains(answer.id))
        .collect()
}

/// Every group with at least one visible answer, paired with those answers.
pub fn visible_groups<'a>(
    catalog: &'a AnswerCatalog,
    hide_scored: bool,
    scores: &ScoreStore,
    pending: &PendingRemovals,
) -> Vec<(&'a AnswerGroup, Vec<&'a Answer>)> {
    catalog
        .groups()
        .iter()
        .filter_map(|group| {
            let answers = visible_answers(group, hide_scored, scores, pending);
            (!answers.is_empty()).then_some((group, answers))
        })
        .collect()
}
