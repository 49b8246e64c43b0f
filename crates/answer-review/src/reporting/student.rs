use serde::Serialize;

use super::domain::{ClassResults, RttiCategory};
use super::stats::StudentRow;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("student '{0}' is not part of these results")]
pub struct StudentNotFound(pub String);

/// One question as a single student answered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentQuestionRow {
    pub question_id: String,
    pub title: String,
    pub category: RttiCategory,
    pub score: u32,
    pub max_score: u32,
    pub answer: String,
    /// Score relative to the question maximum, as a whole percent.
    pub score_percentage: u32,
    pub correct: bool,
}

/// Drill-down for one student: the table row plus every exam question in exam order.
///
/// A question the student has no result for shows as unanswered with a zero score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetail {
    pub student: StudentRow,
    pub questions: Vec<StudentQuestionRow>,
}

impl StudentDetail {
    pub fn build(results: &ClassResults, student_id: &str) -> Result<Self, StudentNotFound> {
        let student = results
            .students
            .iter()
            .find(|student| student.id == student_id)
            .ok_or_else(|| StudentNotFound(student_id.to_string()))?;

        let questions = results
            .questions
            .iter()
            .map(|question| {
                let result = student.score_for(&question.id);
                let score = result.map_or(0, |result| result.score);
                let score_percentage = if question.max_score > 0 {
                    (f64::from(score) / f64::from(question.max_score) * 100.0).round() as u32
                } else {
                    0
                };

                StudentQuestionRow {
                    question_id: question.id.clone(),
                    title: question.title.clone(),
                    category: question.category,
                    score,
                    max_score: question.max_score,
                    answer: result.map(|result| result.answer.clone()).unwrap_or_default(),
                    score_percentage,
                    correct: result.is_some_and(|result| result.is_correct()),
                }
            })
            .collect();

        Ok(Self {
            student: StudentRow::new(student, results),
            questions,
        })
    }
}
