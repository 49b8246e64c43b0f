use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// RTTI taxonomy level of an exam question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RttiCategory {
    R,
    T1,
    T2,
    I,
}

impl RttiCategory {
    pub const fn ordered() -> [Self; 4] {
        [Self::R, Self::T1, Self::T2, Self::I]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::T1 => "T1",
            Self::T2 => "T2",
            Self::I => "I",
        }
    }

    pub const fn full_name(self) -> &'static str {
        match self {
            Self::R => "Reproductie",
            Self::T1 => "Toepassingsniveau 1",
            Self::T2 => "Toepassingsniveau 2",
            Self::I => "Inzicht",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown RTTI category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for RttiCategory {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    pub id: String,
    pub title: String,
    pub category: RttiCategory,
    pub max_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_given_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question_id: String,
    pub score: u32,
    pub max_score: u32,
    #[serde(default)]
    pub answer: String,
}

impl QuestionScore {
    /// Only a full score counts as a correct answer.
    pub fn is_correct(&self) -> bool {
        self.score == self.max_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResult {
    pub id: String,
    pub name: String,
    pub scores: Vec<QuestionScore>,
}

impl StudentResult {
    pub fn total_score(&self) -> u32 {
        self.scores.iter().map(|score| score.score).sum()
    }

    pub fn max_possible_score(&self) -> u32 {
        self.scores.iter().map(|score| score.max_score).sum()
    }

    pub fn percentage(&self) -> f64 {
        match self.max_possible_score() {
            0 => 0.0,
            max => f64::from(self.total_score()) / f64::from(max) * 100.0,
        }
    }

    pub fn score_for(&self, question_id: &str) -> Option<&QuestionScore> {
        self.scores
            .iter()
            .find(|score| score.question_id == question_id)
    }
}

/// One exam: its questions and every student's per-question results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassResults {
    pub questions: Vec<ExamQuestion>,
    pub students: Vec<StudentResult>,
}

impl ClassResults {
    pub fn question(&self, id: &str) -> Option<&ExamQuestion> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn questions_in(&self, category: RttiCategory) -> impl Iterator<Item = &ExamQuestion> {
        self.questions
            .iter()
            .filter(move |question| question.category == category)
    }
}
