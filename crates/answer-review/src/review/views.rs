use serde::Serialize;

use super::domain::{AnswerId, Question, SimilarAnswer};
use super::gate::SuggestionState;
use super::scores::Progress;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub title: String,
    pub text: String,
    pub instruction: String,
    pub model_answer: String,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            title: question.title.clone(),
            text: question.text.clone(),
            instruction: question.instruction.clone(),
            model_answer: question.model_answer.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerRowView {
    pub id: AnswerId,
    pub text: String,
    pub max_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,
    /// Scored and on its way out of a hide-scored view.
    pub fading: bool,
    pub suggestion: SuggestionState,
    pub adoptable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_answers: Vec<SimilarAnswer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub label: String,
    pub answers: Vec<AnswerRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub question: QuestionView,
    pub progress: Progress,
    pub hide_scored: bool,
    pub reveal_all: bool,
    pub groups: Vec<GroupView>,
}
