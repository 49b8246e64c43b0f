use super::catalog::AnswerCatalog;
use super::domain::AnswerId;
use super::scores::{ReviewError, ScoreStore};

/// Override-style mutators behind the group header buttons and "apply all AI suggestions".
///
/// Unlike [`ScoreStore::set_score`], nothing here toggles: scores are always written.
pub struct BulkScoreOperator<'a> {
    catalog: &'a AnswerCatalog,
    scores: &'a mut ScoreStore,
}

impl<'a> BulkScoreOperator<'a> {
    pub fn new(catalog: &'a AnswerCatalog, scores: &'a mut ScoreStore) -> Self {
        Self { catalog, scores }
    }

    pub fn score_group(&mut self, label: &str, score: u8) -> Result<Vec<AnswerId>, ReviewError> {
        self.scores.apply_group_score(self.catalog, label, score)
    }

    pub fn adopt_all_suggestions(&mut self) -> Vec<AnswerId> {
        self.scores.apply_all_ai_suggestions(self.catalog)
    }
}
