use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::review::domain::{Answer, AnswerId, Question};
use crate::review::{AnswerCatalog, ReviewSession, ReviewSettings};

pub(super) fn question() -> Question {
    Question {
        title: "Salamander".to_string(),
        text: "De voortplanting vindt plaats in water.".to_string(),
        instruction: "Noteer de abiotische factor.".to_string(),
        model_answer: "water".to_string(),
    }
}

pub(super) fn answer(id: u32, text: &str, group: &str) -> Answer {
    Answer {
        id: AnswerId(id),
        text: text.to_string(),
        group: group.to_string(),
        ai_score: None,
        confidence: None,
        max_score: 2,
        similar_answers: Vec::new(),
        frequency: None,
        names: Vec::new(),
        explanation: None,
    }
}

pub(super) fn suggested(mut answer: Answer, ai_score: u8, confidence: u8) -> Answer {
    answer.ai_score = Some(ai_score);
    answer.confidence = Some(confidence);
    answer
}

/// Group "Correct" holds 1 and 2 (both model-answer matches), group "G" holds 3, 4 and 5.
///
/// Answer 3 carries a confident suggestion of 1, answer 4 an uncertain one, answer 5 none.
pub(super) fn catalog() -> Arc<AnswerCatalog> {
    let answers = vec![
        suggested(answer(1, "water", "Correct"), 2, 98),
        answer(2, "Water.", "Correct"),
        suggested(answer(3, "bossen", "G"), 1, 80),
        suggested(answer(4, "eieren", "G"), 1, 5),
        answer(5, "watervlooien", "G"),
    ];
    Arc::new(AnswerCatalog::new(question(), answers).expect("valid catalog"))
}

/// Answers whose text never matches the model answer, so nothing seeds.
pub(super) fn unseeded_catalog() -> Arc<AnswerCatalog> {
    let answers = vec![
        answer(3, "bossen", "G"),
        answer(4, "heggen", "G"),
        answer(5, "eieren", "G"),
    ];
    Arc::new(AnswerCatalog::new(question(), answers).expect("valid catalog"))
}

pub(super) fn session() -> ReviewSession {
    ReviewSession::new(catalog())
}

pub(super) fn hiding_session() -> ReviewSession {
    ReviewSession::with_settings(
        catalog(),
        ReviewSettings {
            hide_scored: true,
            reveal_all: false,
        },
    )
}

pub(super) fn visible_ids(session: &ReviewSession) -> Vec<u32> {
    session
        .view()
        .groups
        .iter()
        .flat_map(|group| group.answers.iter().map(|row| row.id.0))
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}
