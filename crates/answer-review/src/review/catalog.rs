use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{normalize_answer_text, Answer, AnswerGroup, AnswerId, Question};

/// Source document behind [`AnswerCatalog::sample`].
pub const SAMPLE_CATALOG_JSON: &str = include_str!("../../fixtures/kamsalamander.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read answer catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("answer {0} appears more than once in the catalog")]
    DuplicateAnswer(AnswerId),
    #[error("answer {answer} has AI score {score} above its maximum of {max}")]
    SuggestionOutOfRange { answer: AnswerId, score: u8, max: u8 },
    #[error("answer {answer} has confidence {confidence}, expected 0-100")]
    ConfidenceOutOfRange { answer: AnswerId, confidence: u8 },
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    question: Question,
    answers: Vec<Answer>,
}

/// Immutable question plus grouped answers for one review session.
#[derive(Debug, Clone)]
pub struct AnswerCatalog {
    question: Question,
    groups: Vec<AnswerGroup>,
    index: HashMap<AnswerId, (usize, usize)>,
}

impl AnswerCatalog {
    /// Validates the answers and groups them by label, keeping first-seen group order.
    pub fn new(question: Question, answers: Vec<Answer>) -> Result<Self, CatalogError> {
        let mut groups: Vec<AnswerGroup> = Vec::new();
        let mut index = HashMap::with_capacity(answers.len());

        for answer in answers {
            validate(&answer)?;

            let group_position = match groups.iter().position(|group| group.label == answer.group)
            {
                Some(position) => position,
                None => {
                    groups.push(AnswerGroup {
                        label: answer.group.clone(),
                        answers: Vec::new(),
                    });
                    groups.len() - 1
                }
            };

            let slot = groups[group_position].answers.len();
            if index.insert(answer.id, (group_position, slot)).is_some() {
                return Err(CatalogError::DuplicateAnswer(answer.id));
            }
            groups[group_position].answers.push(answer);
        }

        Ok(Self {
            question,
            groups,
            index,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::new(document.question, document.answers)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::new(document.question, document.answers)
    }

    /// The bundled "kamsalamander" question used for demos.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_CATALOG_JSON)
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn groups(&self) -> &[AnswerGroup] {
        &self.groups
    }

    pub fn group(&self, label: &str) -> Option<&AnswerGroup> {
        self.groups.iter().find(|group| group.label == label)
    }

    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.index
            .get(&id)
            .map(|&(group, slot)| &self.groups[group].answers[slot])
    }

    pub fn contains(&self, id: AnswerId) -> bool {
        self.index.contains_key(&id)
    }

    /// All answers, group by group, in catalog order.
    pub fn answers(&self) -> impl Iterator<Item = &Answer> {
        self.groups.iter().flat_map(|group| group.answers.iter())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn matches_model_answer(&self, answer: &Answer) -> bool {
        normalize_answer_text(&answer.text) == normalize_answer_text(&self.question.model_answer)
    }
}

fn validate(answer: &Answer) -> Result<(), CatalogError> {
    if let Some(score) = answer.ai_score {
        if !answer.accepts(score) {
            return Err(CatalogError::SuggestionOutOfRange {
                answer: answer.id,
                score,
                max: answer.max_score,
            });
        }
    }

    if let Some(confidence) = answer.confidence {
        if confidence > 100 {
            return Err(CatalogError::ConfidenceOutOfRange {
                answer: answer.id,
                confidence,
            });
        }
    }

    Ok(())
}
