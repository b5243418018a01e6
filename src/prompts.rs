use crate::events::ChatMessage;

/// How many trailing log messages travel in the outgoing prompt. Older
/// history stays visible in the UI but is not sent.
pub const HISTORY_WINDOW: usize = 5;

/// Fixed instructional preamble prepended to every request.
const PREAMBLE: &str = r#"You are a highly knowledgeable and professional AI teacher and doubt-solver.

If the user's question relates to the current document context, use the content provided below to generate a helpful and relevant response. Otherwise, answer the question to the best of your knowledge as a general AI expert.

Please follow this formatting style using markdown-like syntax:
- Use **bold** for important terms
- Use *italics* for emphasis
- Use '#' for main headings and '##' for subheadings
- Use '*' for bullet points
- Use '>' for quotes
- Use ``` for code blocks (where appropriate)
- Ensure proper spacing, line breaks, and clarity throughout"#;

/// Assemble the full prompt for one question.
///
/// `history` is the log as it stood before the question was appended; only
/// its last [`HISTORY_WINDOW`] entries are included, oldest first, each as
/// a `"<sender>: <raw text>"` line.
pub fn build_prompt(notes: &str, history: &[ChatMessage], question: &str) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let history_lines = history[start..]
        .iter()
        .map(|msg| format!("{}: {}", msg.role.as_ref(), msg.raw_text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{PREAMBLE}\n\n---\n\n### Context (from the uploaded document):\n{notes}\n\n---\n\n### Conversation history:\n{history_lines}\n\n---\n\n### User's question:\n\"{question}\"\n\nRespond in a clear, well-structured, and professional manner using the above style."
    )
}
