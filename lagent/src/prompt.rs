//! Answer prompt composition.

use lmemory::TranscriptEntry;
use lprovider::{Message, Role};
use serde_json::Value;

pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Reply in natural language only. Be concise and accurate.";
pub const TOOL_RESULT_PREAMBLE: &str = "Tool result available as JSON. Use it to answer the user. JSON: ";

/// Fixed instruction, then history, then the current input, then the tool
/// payload as a trailing system turn when a tool ran.
pub fn compose_answer_messages(
    history: &[TranscriptEntry],
    user_input: &str,
    tool_payload: Option<&Value>,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(Message::system(ANSWER_SYSTEM_PROMPT));
    messages.extend(
        history
            .iter()
            .map(|entry| Message::new(Role::from_label(&entry.role), entry.content.clone())),
    );
    messages.push(Message::user(user_input));

    if let Some(payload) = tool_payload {
        messages.push(Message::system(format!("{TOOL_RESULT_PREAMBLE}{payload}")));
    }

    messages
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn history_roles_are_mapped_case_insensitively() {
        let history = vec![
            TranscriptEntry::new("USER", "hi"),
            TranscriptEntry::new("Assistant", "hello"),
            TranscriptEntry::new("system", "note"),
            TranscriptEntry::new("tool", "odd"),
        ];

        let messages = compose_answer_messages(&history, "next", None);

        assert_eq!(
            messages,
            vec![
                Message::system(ANSWER_SYSTEM_PROMPT),
                Message::user("hi"),
                Message::assistant("hello"),
                Message::system("note"),
                Message::user("odd"),
                Message::user("next"),
            ]
        );
    }

    #[test]
    fn tool_payload_is_appended_as_compact_json() {
        let payload = json!({"error": "calendar offline"});
        let messages = compose_answer_messages(&[], "what's on?", Some(&payload));

        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[2],
            Message::system(
                "Tool result available as JSON. Use it to answer the user. JSON: {\"error\":\"calendar offline\"}"
            )
        );
    }
}
