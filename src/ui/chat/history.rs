//! Conversation log display component

use crate::events::{ChatMessage, ChatRole};
use crate::markup;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// The ordered conversation log for one overlay session.
///
/// Append-only while a session lives; the whole log is discarded when the
/// overlay closes. The log itself is unbounded; only the outgoing prompt
/// window is capped, over in `prompts`.
#[derive(Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
    /// Lines scrolled up from the bottom anchor.
    scroll: u16,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::new(ChatRole::User, text));
    }

    pub fn add_assistant_message(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::new(ChatRole::Assistant, text));
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        // New message snaps the view back to the latest exchange.
        self.scroll = 0;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.scroll = 0;
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

impl Widget for ConversationHistory {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut all_lines: Vec<Line> = Vec::new();
        for message in &self.messages {
            all_lines.extend(render_message(message, area.width));
            all_lines.push(Line::default());
        }

        let height = area.height as usize;
        let total = all_lines.len();
        let max_scroll = total.saturating_sub(height);
        let scroll = (self.scroll as usize).min(max_scroll);
        let start = total.saturating_sub(height + scroll);
        let visible = &all_lines[start..total.saturating_sub(scroll)];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }
    }
}

fn render_message(message: &ChatMessage, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (name, accent) = match message.role {
        ChatRole::User => ("You", Color::Blue),
        ChatRole::Assistant => ("Gurudev", Color::Green),
    };
    let timestamp = message.timestamp.format("%H:%M").to_string();
    lines.push(Line::from(vec![
        Span::styled(format!("{name} "), Style::default().fg(accent)),
        Span::styled(
            format!("{timestamp} {}", "─".repeat(16)),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    match message.role {
        ChatRole::Assistant => {
            for line in markup::format_markdown(&message.text) {
                lines.push(indent(line));
            }
        }
        ChatRole::User => {
            for wrapped in wrap_text(&message.text, width.saturating_sub(2) as usize) {
                lines.push(indent(Line::from(Span::styled(
                    wrapped,
                    Style::default().fg(Color::White),
                ))));
            }
        }
    }

    lines
}

fn indent(line: Line<'static>) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    spans.extend(line.spans);
    Line::from(spans)
}

/// Wrap text to fit within the given width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(current);
                current = String::new();
            }
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
