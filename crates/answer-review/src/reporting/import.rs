use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::domain::{
    ClassResults, ExamQuestion, QuestionScore, RttiCategory, StudentResult, UnknownCategory,
};

#[derive(Debug, thiserror::Error)]
pub enum ReportImportError {
    #[error("failed to read results export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid results CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {source}")]
    UnknownCategory {
        line: u64,
        #[source]
        source: UnknownCategory,
    },
    #[error("line {line}: score {score} for question '{question}' exceeds its maximum of {max}")]
    ScoreAboveMax {
        line: u64,
        question: String,
        score: u32,
        max: u32,
    },
    #[error("line {line}: question '{question}' does not match its earlier title, category or maximum")]
    InconsistentQuestion { line: u64, question: String },
    #[error("line {line}: student '{student}' already has a score for question '{question}'")]
    DuplicateScore {
        line: u64,
        student: String,
        question: String,
    },
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    student_id: String,
    student_name: String,
    question_id: String,
    question_title: String,
    category: String,
    max_score: u32,
    score: u32,
    #[serde(default)]
    answer: String,
}

/// Reads a results export with one row per student and question.
pub struct ResultsImporter;

impl ResultsImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ClassResults, ReportImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ClassResults, ReportImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut results = ClassResults::default();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|position| position.line()).unwrap_or_default();
            let row: ResultRow = record.deserialize(Some(&headers))?;
            apply_row(&mut results, row, line)?;
        }

        debug!(
            questions = results.questions.len(),
            students = results.students.len(),
            "imported class results"
        );
        Ok(results)
    }
}

fn apply_row(results: &mut ClassResults, row: ResultRow, line: u64) -> Result<(), ReportImportError> {
    let category = row
        .category
        .parse::<RttiCategory>()
        .map_err(|source| ReportImportError::UnknownCategory { line, source })?;

    if row.score > row.max_score {
        return Err(ReportImportError::ScoreAboveMax {
            line,
            question: row.question_id,
            score: row.score,
            max: row.max_score,
        });
    }

    match results.question(&row.question_id) {
        Some(known) => {
            if known.title != row.question_title
                || known.category != category
                || known.max_score != row.max_score
            {
                return Err(ReportImportError::InconsistentQuestion {
                    line,
                    question: row.question_id,
                });
            }
        }
        None => results.questions.push(ExamQuestion {
            id: row.question_id.clone(),
            title: row.question_title,
            category,
            max_score: row.max_score,
            most_given_answer: None,
        }),
    }

    let position = match results
        .students
        .iter()
        .position(|student| student.id == row.student_id)
    {
        Some(position) => position,
        None => {
            results.students.push(StudentResult {
                id: row.student_id.clone(),
                name: row.student_name,
                scores: Vec::new(),
            });
            results.students.len() - 1
        }
    };

    let student = &mut results.students[position];
    if student.score_for(&row.question_id).is_some() {
        return Err(ReportImportError::DuplicateScore {
            line,
            student: row.student_id,
            question: row.question_id,
        });
    }

    student.scores.push(QuestionScore {
        question_id: row.question_id,
        score: row.score,
        max_score: row.max_score,
        answer: row.answer,
    });
    Ok(())
}
