use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("message is empty")]
    EmptyMessage,
}

/// Markers and persona used to build a generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub context_marker: String,
    pub extra_id_marker: String,
    /// Persona text; `{user}` is replaced with the speaker's name
    pub persona: String,
    /// Label in front of the user's line; also where a reply is cut
    pub speaker_label: String,
    /// Label in front of the model's line
    pub reply_label: String,
    pub end_marker: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            context_marker: "<SC6>".to_string(),
            extra_id_marker: "<extra_id_0>".to_string(),
            persona: "Ты нейронный ассистент основанный на собственном движке, тебя зовут Петал, \
                      тебя создал Alone или Игрок, на данный момент с тобой разговаривает {user} \
                      и говорит тебе:"
                .to_string(),
            speaker_label: "Собеседник".to_string(),
            reply_label: "Ты".to_string(),
            end_marker: "</s>".to_string(),
        }
    }
}

impl PromptTemplate {
    /// Build the prompt for one message from `user`.
    ///
    /// The first character of the message is upper-cased; the rest of
    /// the message, leading whitespace included, is kept as written.
    pub fn build(&self, user: &str, message: &str) -> Result<String, PromptError> {
        if message.is_empty() {
            return Err(PromptError::EmptyMessage);
        }

        Ok(format!(
            "{}{}{}: {}\n{}: {}",
            self.context_marker,
            self.persona.replace("{user}", user),
            self.speaker_label,
            capitalize_first(message),
            self.reply_label,
            self.extra_id_marker,
        ))
    }

    /// Strip generation artefacts from a decoded model output.
    ///
    ///   1. cut at the first end marker
    ///   2. drop every extra-id marker
    ///   3. keep only the text before the model starts a speaker line
    pub fn clean_reply(&self, decoded: &str) -> String {
        let text = match decoded.find(&self.end_marker) {
            Some(end) => &decoded[..end],
            None => decoded,
        };

        let text = text.replace(&self.extra_id_marker, "");
        let text = text.trim();

        match text.find(&self.speaker_label) {
            Some(cut) => text[..cut].trim().to_string(),
            None => text.to_string(),
        }
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> PromptTemplate {
        PromptTemplate {
            persona: "You talk to {user}. ".to_string(),
            ..PromptTemplate::default()
        }
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = template().build("alice", "how are you?").unwrap();
        assert_eq!(
            prompt,
            "<SC6>You talk to alice. Собеседник: How are you?\nТы: <extra_id_0>"
        );
    }

    #[test]
    fn test_capitalises_non_ascii_first_letter() {
        let prompt = template().build("bob", "привет").unwrap();
        assert!(prompt.contains("Собеседник: Привет\n"));
    }

    #[test]
    fn test_empty_message_is_rejected() {
        assert_eq!(template().build("bob", ""), Err(PromptError::EmptyMessage));
    }

    #[test]
    fn test_message_whitespace_is_kept() {
        let prompt = template().build("bob", " hi ").unwrap();
        assert!(prompt.contains("Собеседник:  hi \n"));
    }

    #[test]
    fn test_default_prompt_is_complete() {
        let prompt = PromptTemplate::default().build("Alice", "как дела?").unwrap();
        assert_eq!(
            prompt,
            "<SC6>Ты нейронный ассистент основанный на собственном движке, тебя зовут Петал, \
             тебя создал Alone или Игрок, на данный момент с тобой разговаривает Alice \
             и говорит тебе:Собеседник: Как дела?\nТы: <extra_id_0>"
        );
    }

    #[test]
    fn test_default_persona_names_the_user() {
        let prompt = PromptTemplate::default().build("carol", "hi").unwrap();
        assert!(prompt.starts_with("<SC6>"));
        assert!(prompt.contains("carol"));
        assert!(prompt.ends_with("Ты: <extra_id_0>"));
    }

    #[test]
    fn test_clean_reply_cuts_at_end_marker() {
        let t = template();
        assert_eq!(t.clean_reply("<extra_id_0> Hello there </s> junk"), "Hello there");
    }

    #[test]
    fn test_clean_reply_drops_next_speaker_turn() {
        let t = template();
        assert_eq!(
            t.clean_reply("<extra_id_0>Fine, thanks!\nСобеседник: and you?"),
            "Fine, thanks!"
        );
    }

    #[test]
    fn test_clean_reply_without_markers_is_trimmed() {
        assert_eq!(template().clean_reply("  plain  "), "plain");
    }
}
