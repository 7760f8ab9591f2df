use hugchat_types::protocol::ChatMessage;

/// First line of every submitted prompt.
pub const PROMPT_PREAMBLE: &str = "Forget previous messages and focus on the current message!\n";

/// Flatten the whole inbound history into one synthetic turn.
///
/// Messages render as `role: content` back to back with no separator, and the
/// prompt ends with `\nassistant: ` so the remote model answers as assistant.
pub fn build_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::from(PROMPT_PREAMBLE);
    for message in messages {
        prompt.push_str(&message.role);
        prompt.push_str(": ");
        prompt.push_str(&message.text());
    }
    prompt.push_str("\nassistant: ");
    prompt
}
