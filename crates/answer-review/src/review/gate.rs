use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Answer, AnswerId};

/// How an answer's AI suggestion may be presented right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SuggestionState {
    /// No suggestion, or one too uncertain to show. No adopt action is offered.
    Unavailable,
    /// A suggestion exists but its value must stay obscured.
    Masked,
    Revealed {
        score: u8,
        confidence: u8,
        adopted: bool,
    },
}

impl SuggestionState {
    pub fn is_available(&self) -> bool {
        !matches!(self, SuggestionState::Unavailable)
    }

    /// True when the grader may take over the suggested score with one action.
    pub fn adoptable(&self) -> bool {
        matches!(self, SuggestionState::Revealed { adopted: false, .. })
    }
}

/// Reveal policy for AI suggestions, kept separate from scoring to avoid anchoring.
#[derive(Debug, Default, Clone)]
pub struct AiSuggestionGate {
    reveal_all: bool,
    revealed: BTreeSet<AnswerId>,
}

impl AiSuggestionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal_globally(&mut self, reveal: bool) {
        self.reveal_all = reveal;
    }

    pub fn reveals_globally(&self) -> bool {
        self.reveal_all
    }

    /// Marks one answer revealed for the rest of the session. Returns false if it already was.
    pub fn reveal_one(&mut self, id: AnswerId) -> bool {
        self.revealed.insert(id)
    }

    pub fn is_individually_revealed(&self, id: AnswerId) -> bool {
        self.revealed.contains(&id)
    }

    pub fn is_revealed(&self, id: AnswerId, current: Option<u8>, ai_score: Option<u8>) -> bool {
        if self.reveal_all || self.revealed.contains(&id) {
            return true;
        }

        matches!((current, ai_score), (Some(current), Some(ai)) if current == ai)
    }

    pub fn suggestion(&self, answer: &Answer, current: Option<u8>) -> SuggestionState {
        let (Some(score), Some(confidence)) = (answer.usable_suggestion(), answer.confidence)
        else {
            return SuggestionState::Unavailable;
        };

        if self.is_revealed(answer.id, current, Some(score)) {
            SuggestionState::Revealed {
                score,
                confidence,
                adopted: current == Some(score),
            }
        } else {
            SuggestionState::Masked
        }
    }

    pub fn reset(&mut self) {
        self.revealed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: u32, ai_score: Option<u8>, confidence: Option<u8>) -> Answer {
        Answer {
            id: AnswerId(id),
            text: "water".to_string(),
            group: "Correct".to_string(),
            ai_score,
            confidence,
            max_score: 2,
            similar_answers: Vec::new(),
            frequency: None,
            names: Vec::new(),
            explanation: None,
        }
    }

    #[test]
    fn hidden_until_revealed_or_agreed() {
        let mut gate = AiSuggestionGate::new();
        let id = AnswerId(3);

        assert!(!gate.is_revealed(id, None, Some(1)));
        assert!(!gate.is_revealed(id, Some(2), Some(1)));
        assert!(gate.is_revealed(id, Some(1), Some(1)));
        assert!(!gate.is_revealed(id, None, None));

        assert!(gate.reveal_one(id));
        assert!(!gate.reveal_one(id));
        assert!(gate.is_revealed(id, Some(2), Some(1)));
    }

    #[test]
    fn global_reveal_covers_every_answer() {
        let mut gate = AiSuggestionGate::new();
        gate.reveal_globally(true);
        assert!(gate.is_revealed(AnswerId(1), None, Some(0)));
        assert!(gate.is_revealed(AnswerId(99), None, None));
    }

    #[test]
    fn low_confidence_is_unavailable_even_when_revealed() {
        let mut gate = AiSuggestionGate::new();
        gate.reveal_globally(true);
        let uncertain = answer(5, Some(1), Some(5));
        gate.reveal_one(uncertain.id);

        let state = gate.suggestion(&uncertain, None);
        assert_eq!(state, SuggestionState::Unavailable);
        assert!(!state.adoptable());
    }

    #[test]
    fn adoptable_only_when_revealed_and_different() {
        let mut gate = AiSuggestionGate::new();
        let confident = answer(8, Some(1), Some(82));

        assert_eq!(gate.suggestion(&confident, None), SuggestionState::Masked);

        gate.reveal_one(confident.id);
        let state = gate.suggestion(&confident, Some(2));
        assert!(state.adoptable());

        let state = gate.suggestion(&confident, Some(1));
        assert_eq!(
            state,
            SuggestionState::Revealed {
                score: 1,
                confidence: 82,
                adopted: true
            }
        );
        assert!(!state.adoptable());
    }
}
