use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::bulk::BulkScoreOperator;
use super::catalog::AnswerCatalog;
use super::domain::{Answer, AnswerId};
use super::filter::{visible_groups, ExitTicket, PendingRemovals};
use super::gate::{AiSuggestionGate, SuggestionState};
use super::prompt::GradingPrompt;
use super::scores::{ReviewError, ScoreChange, ScoreStore};
use super::views::{AnswerRowView, GroupView, QuestionView, ReviewView};

/// The two grid toggles a grader controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSettings {
    pub hide_scored: bool,
    pub reveal_all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    pub answer_id: AnswerId,
    pub change: ScoreChange,
    /// Present when the answer must fade out before a hide-scored view drops it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit: Option<ExitTicket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub updated: Vec<AnswerId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exits: Vec<ExitTicket>,
}

/// One grader's pass over one question: scores, reveal state and the pending exit set.
///
/// Reveals are monotonic for the lifetime of the session. Whenever an answer's suggestion is
/// effectively revealed (globally, on request, or through agreement) it is recorded in the
/// gate, so later toggles or score changes cannot hide it again; only [`ReviewSession::reset`]
/// does.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    catalog: Arc<AnswerCatalog>,
    scores: ScoreStore,
    gate: AiSuggestionGate,
    pending: PendingRemovals,
    hide_scored: bool,
}

impl ReviewSession {
    pub fn new(catalog: Arc<AnswerCatalog>) -> Self {
        Self::with_settings(catalog, ReviewSettings::default())
    }

    pub fn with_settings(catalog: Arc<AnswerCatalog>, settings: ReviewSettings) -> Self {
        let mut gate = AiSuggestionGate::new();
        gate.reveal_globally(settings.reveal_all);

        let mut session = Self {
            catalog,
            scores: ScoreStore::new(),
            gate,
            pending: PendingRemovals::new(),
            hide_scored: settings.hide_scored,
        };
        session.seed();
        session
    }

    fn seed(&mut self) {
        let seeded = self.scores.initialize(&self.catalog);
        let catalog = Arc::clone(&self.catalog);
        self.latch_reveals(catalog.answers().map(|answer| answer.id));
        info!(
            seeded,
            answers = self.catalog.len(),
            groups = self.catalog.groups().len(),
            "review session ready"
        );
    }

    pub fn catalog(&self) -> &AnswerCatalog {
        &self.catalog
    }

    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub fn gate(&self) -> &AiSuggestionGate {
        &self.gate
    }

    pub fn pending(&self) -> &PendingRemovals {
        &self.pending
    }

    pub fn settings(&self) -> ReviewSettings {
        ReviewSettings {
            hide_scored: self.hide_scored,
            reveal_all: self.gate.reveals_globally(),
        }
    }

    pub fn set_score(&mut self, id: AnswerId, score: u8) -> Result<ScoreOutcome, ReviewError> {
        let was_visible = self.is_listed(id);
        let change = self.scores.set_score(&self.catalog, id, score)?;

        // Any re-score cancels an in-flight exit; a still-scored answer gets a fresh one.
        self.pending.cancel(id);
        let exit = match change.stored() {
            Some(_) if self.hide_scored && was_visible => Some(self.pending.mark(id)),
            _ => None,
        };
        self.latch_reveals([id]);

        Ok(ScoreOutcome {
            answer_id: id,
            change,
            exit,
        })
    }

    pub fn clear_score(&mut self, id: AnswerId) -> Result<Option<u8>, ReviewError> {
        if !self.catalog.contains(id) {
            return Err(ReviewError::AnswerNotFound(id));
        }

        self.pending.cancel(id);
        let previous = self.scores.clear_score(id);
        debug!(answer = %id, ?previous, "score cleared");
        Ok(previous)
    }

    /// Takes over the revealed AI score, as the adopt arrow next to a row does.
    pub fn adopt_suggestion(&mut self, id: AnswerId) -> Result<ScoreOutcome, ReviewError> {
        let answer = self
            .catalog
            .answer(id)
            .ok_or(ReviewError::AnswerNotFound(id))?;
        let state = self.gate.suggestion(answer, self.scores.get(id));

        match (state, answer.usable_suggestion()) {
            (state, Some(score)) if state.adoptable() => self.set_score(id, score),
            _ => Err(ReviewError::SuggestionUnavailable(id)),
        }
    }

    pub fn reveal_one(&mut self, id: AnswerId) -> Result<bool, ReviewError> {
        if !self.catalog.contains(id) {
            return Err(ReviewError::AnswerNotFound(id));
        }

        let newly = self.gate.reveal_one(id);
        debug!(answer = %id, newly, "suggestion revealed");
        Ok(newly)
    }

    pub fn reveal_globally(&mut self, reveal: bool) {
        if !reveal && self.gate.reveals_globally() {
            let catalog = Arc::clone(&self.catalog);
            for answer in catalog.answers() {
                self.gate.reveal_one(answer.id);
            }
        }

        self.gate.reveal_globally(reveal);
        debug!(reveal, "global suggestion reveal toggled");
    }

    pub fn is_revealed(&self, id: AnswerId) -> bool {
        self.catalog
            .answer(id)
            .map(|answer| self.gate.is_revealed(id, self.scores.get(id), answer.ai_score))
            .unwrap_or(false)
    }

    pub fn suggestion(&self, id: AnswerId) -> Result<SuggestionState, ReviewError> {
        let answer = self
            .catalog
            .answer(id)
            .ok_or(ReviewError::AnswerNotFound(id))?;
        Ok(self.gate.suggestion(answer, self.scores.get(id)))
    }

    /// Switches the hide-scored filter.
    ///
    /// Turning it on lets every scored answer fade out first; the returned tickets must be
    /// completed once the presentation delay has elapsed.
    pub fn set_hide_scored(&mut self, hide: bool) -> Vec<ExitTicket> {
        let mut exits = Vec::new();

        if hide && !self.hide_scored {
            let scored: Vec<AnswerId> = self.scores.entries().keys().copied().collect();
            exits = scored.into_iter().map(|id| self.pending.mark(id)).collect();
        } else if !hide {
            self.pending.clear();
        }

        self.hide_scored = hide;
        debug!(hide, fading = exits.len(), "hide-scored toggled");
        exits
    }

    pub fn complete_exit(&mut self, ticket: ExitTicket) -> bool {
        self.pending.complete(ticket)
    }

    pub fn apply_group_score(
        &mut self,
        label: &str,
        score: u8,
    ) -> Result<BulkOutcome, ReviewError> {
        let visible_before = self.listed_ids();
        let updated =
            BulkScoreOperator::new(&self.catalog, &mut self.scores).score_group(label, score)?;
        Ok(self.finish_bulk(updated, &visible_before))
    }

    pub fn apply_all_ai_suggestions(&mut self) -> BulkOutcome {
        let visible_before = self.listed_ids();
        let updated = BulkScoreOperator::new(&self.catalog, &mut self.scores).adopt_all_suggestions();
        self.finish_bulk(updated, &visible_before)
    }

    fn finish_bulk(&mut self, updated: Vec<AnswerId>, visible_before: &[AnswerId]) -> BulkOutcome {
        let mut exits = Vec::new();
        for id in &updated {
            self.pending.cancel(*id);
            if self.hide_scored && visible_before.contains(id) {
                exits.push(self.pending.mark(*id));
            }
        }
        self.latch_reveals(updated.iter().copied());

        BulkOutcome { updated, exits }
    }

    pub fn grading_prompt(&self, id: AnswerId) -> Result<GradingPrompt, ReviewError> {
        let answer = self
            .catalog
            .answer(id)
            .ok_or(ReviewError::AnswerNotFound(id))?;
        Ok(GradingPrompt::new(
            self.catalog.question(),
            &answer.text,
            answer.max_score,
        ))
    }

    pub fn view(&self) -> ReviewView {
        let groups = visible_groups(&self.catalog, self.hide_scored, &self.scores, &self.pending)
            .into_iter()
            .map(|(group, answers)| GroupView {
                label: group.label.clone(),
                answers: answers.into_iter().map(|answer| self.row(answer)).collect(),
            })
            .collect();

        ReviewView {
            question: QuestionView::from(self.catalog.question()),
            progress: self.scores.progress(&self.catalog),
            hide_scored: self.hide_scored,
            reveal_all: self.gate.reveals_globally(),
            groups,
        }
    }

    /// Drops all scores and reveals, then seeds model-answer matches again.
    pub fn reset(&mut self) {
        self.scores.reset();
        self.gate.reset();
        self.pending.clear();
        self.seed();
    }

    fn row(&self, answer: &Answer) -> AnswerRowView {
        let score = self.scores.get(answer.id);
        let suggestion = self.gate.suggestion(answer, score);
        let revealed = matches!(suggestion, SuggestionState::Revealed { .. });

        AnswerRowView {
            id: answer.id,
            text: answer.text.clone(),
            max_score: answer.max_score,
            score,
            frequency: answer.frequency,
            names: answer.names.clone(),
            fading: self.pending.contains(answer.id),
            suggestion,
            adoptable: suggestion.adoptable(),
            explanation: answer.explanation.clone().filter(|_| revealed),
            similar_answers: if revealed {
                answer.similar_answers.clone()
            } else {
                Vec::new()
            },
        }
    }

    fn is_listed(&self, id: AnswerId) -> bool {
        !self.hide_scored || !self.scores.is_scored(id) || self.pending.contains(id)
    }

    fn listed_ids(&self) -> Vec<AnswerId> {
        self.catalog
            .answers()
            .map(|answer| answer.id)
            .filter(|id| self.is_listed(*id))
            .collect()
    }

    fn latch_reveals<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = AnswerId>,
    {
        for id in ids {
            if self.is_revealed(id) {
                self.gate.reveal_one(id);
            }
        }
    }
}
