//! Grading of one open question's answer catalog.
//!
//! Scores live in [`ScoreStore`]; AI suggestions stay hidden behind [`AiSuggestionGate`] until
//! the grader reveals them, and [`ReviewSession`] ties both to the hide-scored filter.

mod bulk;
pub mod catalog;
pub mod domain;
mod filter;
mod gate;
mod prompt;
pub mod router;
mod scores;
mod session;
pub mod views;

#[cfg(test)]
mod tests;

pub use bulk::BulkScoreOperator;
pub use catalog::{AnswerCatalog, CatalogError, SAMPLE_CATALOG_JSON};
pub use domain::{
    normalize_answer_text, Answer, AnswerGroup, AnswerId, Question, SimilarAnswer,
    DEFAULT_MAX_SCORE, MIN_SUGGESTION_CONFIDENCE,
};
pub use filter::{visible_answers, visible_groups, ExitTicket, PendingRemovals};
pub use gate::{AiSuggestionGate, SuggestionState};
pub use prompt::{chat_link, grading_prompt, GradingPrompt};
pub use router::{review_router, ReviewState, SharedSession};
pub use scores::{Progress, ReviewError, ScoreChange, ScoreStore};
pub use session::{BulkOutcome, ReviewSession, ReviewSettings, ScoreOutcome};
pub use views::{AnswerRowView, GroupView, QuestionView, ReviewView};
