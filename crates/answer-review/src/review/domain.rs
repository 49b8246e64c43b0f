use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score ceiling used when a catalog entry does not declare its own.
pub const DEFAULT_MAX_SCORE: u8 = 2;

/// Suggestions at or below this confidence are treated as if none was given.
pub const MIN_SUGGESTION_CONFIDENCE: u8 = 10;

/// Stable identifier of a student answer for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerId(pub u32);

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The exam question under review together with its model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    pub text: String,
    pub instruction: String,
    #[serde(rename = "correctAnswer")]
    pub model_answer: String,
}

/// Previously graded answer shown as rationale next to an AI suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarAnswer {
    pub text: String,
    pub score: u8,
    #[serde(with = "dutch_date")]
    pub date: NaiveDate,
}

/// A single free-text answer as read from the catalog. Never mutated during review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: AnswerId,
    pub text: String,
    pub group: String,
    #[serde(default)]
    pub ai_score: Option<u8>,
    #[serde(default)]
    pub confidence: Option<u8>,
    #[serde(default = "default_max_score")]
    pub max_score: u8,
    #[serde(default)]
    pub similar_answers: Vec<SimilarAnswer>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

fn default_max_score() -> u8 {
    DEFAULT_MAX_SCORE
}

impl Answer {
    pub fn accepts(&self, score: u8) -> bool {
        score <= self.max_score
    }

    /// The AI score when its confidence clears the suggestion threshold.
    pub fn usable_suggestion(&self) -> Option<u8> {
        match (self.ai_score, self.confidence) {
            (Some(score), Some(confidence)) if confidence > MIN_SUGGESTION_CONFIDENCE => {
                Some(score)
            }
            _ => None,
        }
    }
}

/// Answers sharing one group label, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerGroup {
    pub label: String,
    pub answers: Vec<Answer>,
}

/// Lowercases, trims and drops trailing periods so "Water." compares equal to "water".
pub fn normalize_answer_text(text: &str) -> String {
    text.trim()
        .trim_end_matches('.')
        .trim_end()
        .to_lowercase()
}

mod dutch_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d-%m-%Y";

    pub(super) fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT)
            .map_err(|err| serde::de::Error::custom(format!("invalid date '{raw}': {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_and_trailing_period() {
        assert_eq!(normalize_answer_text("Water."), "water");
        assert_eq!(normalize_answer_text("  WATER  "), "water");
        assert_eq!(normalize_answer_text("water..."), "water");
        assert_ne!(normalize_answer_text("het water"), "water");
    }

    #[test]
    fn low_confidence_suggestions_are_unusable() {
        let mut answer: Answer = serde_json::from_str(
            r#"{ "id": 4, "text": "kleuren", "group": "Overig", "aiScore": 0, "confidence": 10 }"#,
        )
        .expect("answer parses");
        assert_eq!(answer.max_score, DEFAULT_MAX_SCORE);
        assert_eq!(answer.usable_suggestion(), None);

        answer.confidence = Some(11);
        assert_eq!(answer.usable_suggestion(), Some(0));

        answer.confidence = None;
        assert_eq!(answer.usable_suggestion(), None);
    }

    #[test]
    fn similar_answer_dates_use_day_month_year() {
        let similar: SimilarAnswer =
            serde_json::from_str(r#"{ "text": "water", "score": 2, "date": "12-04-2025" }"#)
                .expect("similar answer parses");
        assert_eq!(
            similar.date,
            NaiveDate::from_ymd_opt(2025, 4, 12).expect("valid date")
        );

        let json = serde_json::to_value(&similar).expect("serializes");
        assert_eq!(json["date"], "12-04-2025");
    }
}
