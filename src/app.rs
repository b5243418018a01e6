use crate::document::NotesContext;
use crate::gemini::GeminiClient;
use crate::ui::chat::ChatManager;
use crate::ui::header::Header;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::time::Duration;

pub struct App {
    pub chat: ChatManager,
    notes_name: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(client: GeminiClient, notes: NotesContext) -> Self {
        let notes_name = (!notes.name().is_empty()).then(|| notes.name().to_string());
        Self {
            chat: ChatManager::new(client, notes),
            notes_name,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Route one key press. While the overlay is open it owns the
    /// keyboard; otherwise only the top-level bindings apply.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.chat.is_open() {
            self.chat.handle_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') => self.chat.open(),
            _ => {}
        }
    }
}

/// Main event loop: draw, drain finished requests, poll input.
///
/// The 50 ms poll keeps the spinner moving and reply pickup prompt while
/// request tasks run on the runtime; the loop itself never awaits them.
pub fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        app.chat.drain_replies();
        app.chat.tick();
        terminal.draw(|f| draw(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(f.size());

    f.render_widget(
        Header::new(app.notes_name.clone(), app.chat.is_open()),
        chunks[0],
    );

    let body = chunks[1];
    if app.chat.is_open() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Percentage(60)])
            .split(body);
        app.chat.render(cols[1], f.buffer_mut());
    } else {
        let welcome = vec![
            Line::default(),
            Line::from(Span::styled(
                "Upload a handwritten note, convert it, and ask away.",
                Style::default().fg(Color::Gray),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Press c to chat with Gurudev about your notes.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(
            Paragraph::new(welcome).alignment(Alignment::Center),
            body,
        );
    }
}
