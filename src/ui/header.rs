//! Static page header. No state, no logic.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct Header {
    notes_name: Option<String>,
    chat_open: bool,
}

impl Header {
    pub fn new(notes_name: Option<String>, chat_open: bool) -> Self {
        Self { notes_name, chat_open }
    }
}

impl Widget for Header {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let notes = match &self.notes_name {
            Some(name) => format!("notes: {name}"),
            None => "no notes loaded".to_string(),
        };
        let hints = if self.chat_open {
            "Esc close chat · Enter send"
        } else {
            "c chat · q quit"
        };

        let lines = vec![
            Line::from(Span::styled(
                "Pen2PDF",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                "Handwritten Note Converter",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Convert your notes to PDF effortlessly",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )),
            Line::from(vec![
                Span::styled(notes, Style::default().fg(Color::DarkGray)),
                Span::styled("  ·  ", Style::default().fg(Color::DarkGray)),
                Span::styled(hints, Style::default().fg(Color::DarkGray)),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
