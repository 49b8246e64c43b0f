use serde::Serialize;

use super::domain::Question;

const CHAT_BASE_URL: &str = "https://chat.openai.com/?model=gpt-4&prompt=";

/// Prompt text plus a link that opens it in an external chat assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradingPrompt {
    pub prompt: String,
    pub chat_link: String,
}

impl GradingPrompt {
    pub fn new(question: &Question, answer_text: &str, max_score: u8) -> Self {
        let prompt = grading_prompt(question, answer_text, max_score);
        let chat_link = chat_link(&prompt);
        Self { prompt, chat_link }
    }
}

pub fn grading_prompt(question: &Question, answer_text: &str, max_score: u8) -> String {
    format!(
        "Vraag: {title} {text}\n\
         Antwoordmodel: {model}\n\
         Antwoord van leerling: {answer}\n\
         Maximale score: {max_score}\n\n\
         Welke score zou jij deze leerling geven op basis van de vraag, het antwoordmodel en de \
         maximale score? Noem eerst de score en houd de redenering kort.",
        title = question.title,
        text = question.text,
        model = question.model_answer,
        answer = answer_text,
    )
}

pub fn chat_link(prompt: &str) -> String {
    format!("{CHAT_BASE_URL}{}", urlencoding::encode(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            title: "Salamander".to_string(),
            text: "De voortplanting vindt plaats in water.".to_string(),
            instruction: "Noteer de abiotische factor.".to_string(),
            model_answer: "water".to_string(),
        }
    }

    #[test]
    fn prompt_names_every_ingredient() {
        let prompt = grading_prompt(&question(), "de temperatuur", 3);
        assert!(prompt.starts_with("Vraag: Salamander De voortplanting vindt plaats in water.\n"));
        assert!(prompt.contains("Antwoordmodel: water\n"));
        assert!(prompt.contains("Antwoord van leerling: de temperatuur\n"));
        assert!(prompt.contains("Maximale score: 3\n"));
    }

    #[test]
    fn chat_link_percent_encodes_prompt() {
        let link = chat_link("Vraag: a & b\nklaar?");
        assert_eq!(
            link,
            "https://chat.openai.com/?model=gpt-4&prompt=Vraag%3A%20a%20%26%20b%0Aklaar%3F"
        );
    }
}
