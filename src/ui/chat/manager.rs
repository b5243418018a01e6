use crate::document::NotesContext;
use crate::events::ChatReply;
use crate::gemini::GeminiClient;
use crate::prompts;
use crate::ui::chat::{Composer, ComposerResult, ConversationHistory};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use tokio::sync::mpsc;
use tracing::{debug, error};
use uuid::Uuid;

/// Seeded as the first message of every fresh session.
pub const GREETING: &str =
    "Hi there! I'm Gurudev, your AI assistant. How can I help you with your questions today?";

/// Shown when the exchange succeeded but the response carried no reply text.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

/// Shown when the request itself failed. The detail goes to the diagnostic
/// log only; the user never sees more than this.
pub const REQUEST_FAILED_FALLBACK: &str =
    "Sorry, I couldn't process your request at the moment. Please try again later.";

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// The conversation manager: owns the log, the input buffer, the composing
/// flag, and the in-flight request plumbing for the chat overlay.
pub struct ChatManager {
    history: ConversationHistory,
    composer: Composer,
    client: GeminiClient,
    notes: NotesContext,
    is_open: bool,
    is_typing: bool,
    /// Identity of the live conversation session. Rotated on close so
    /// replies belonging to a discarded conversation can be recognized
    /// and dropped instead of leaking into the next one.
    session: Uuid,
    spinner_frame: usize,
    reply_tx: mpsc::UnboundedSender<ChatReply>,
    reply_rx: mpsc::UnboundedReceiver<ChatReply>,
}

impl ChatManager {
    pub fn new(client: GeminiClient, notes: NotesContext) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            history: ConversationHistory::new(),
            composer: Composer::new(),
            client,
            notes,
            is_open: false,
            is_typing: false,
            session: Uuid::new_v4(),
            spinner_frame: 0,
            reply_tx,
            reply_rx,
        }
    }

    /// Open the overlay, seeding the greeting when the log is still empty.
    pub fn open(&mut self) {
        self.is_open = true;
        self.composer.set_focus(true);
        if self.history.is_empty() {
            self.history.add_assistant_message(GREETING);
        }
    }

    /// Close the overlay and discard the conversation. Rotating the
    /// session id orphans any reply still in flight.
    pub fn close(&mut self) {
        self.is_open = false;
        self.is_typing = false;
        self.composer.set_focus(false);
        self.composer.clear();
        self.history.clear();
        self.session = Uuid::new_v4();
        debug!("chat closed, conversation discarded");
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Submit one question: append it to the log, fire the request task.
    ///
    /// Whitespace-only input is a no-op. The prompt's history window is
    /// snapshotted before the question is appended; the question travels
    /// in its own prompt section. Submits are not serialized: a second
    /// submit while one is in flight starts an independent request.
    pub fn submit(&mut self, input: String) {
        if input.trim().is_empty() {
            return;
        }

        let prompt = prompts::build_prompt(self.notes.text(), self.history.messages(), &input);
        self.history.add_user_message(input);
        self.is_typing = true;

        let client = self.client.clone();
        let tx = self.reply_tx.clone();
        let session = self.session;
        debug!(%session, log_len = self.history.len(), "dispatching completion request");

        tokio::spawn(async move {
            let result = client.generate(&prompt).await;
            let _ = tx.send(ChatReply { session, result });
        });
    }

    /// Drain finished requests; called from the event loop every tick.
    ///
    /// Exactly one assistant message is appended per live reply, success
    /// or not. Replies from a closed session are dropped.
    pub fn drain_replies(&mut self) {
        while let Ok(reply) = self.reply_rx.try_recv() {
            if reply.session != self.session {
                debug!(stale = %reply.session, "dropping reply from discarded session");
                continue;
            }

            self.is_typing = false;
            let text = match reply.result {
                Ok(Some(text)) => text,
                Ok(None) => EMPTY_REPLY_FALLBACK.to_string(),
                Err(err) => {
                    error!("completion request failed: {err:#}");
                    REQUEST_FAILED_FALLBACK.to_string()
                }
            };
            self.history.add_assistant_message(text);
        }
    }

    /// Advance the composing spinner; called once per draw.
    pub fn tick(&mut self) {
        if self.is_typing {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Up => self.history.scroll_up(),
            KeyCode::Down => self.history.scroll_down(),
            _ => {
                if let ComposerResult::Submitted(input) = self.composer.handle_key(key) {
                    self.submit(input);
                }
            }
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if !self.is_open {
            return;
        }

        Clear.render(area, buf);

        let status = if self.is_typing { "Typing…" } else { "Online" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(Line::from(vec![
                Span::styled(
                    " Gurudev AI Assistant ",
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("· {status} "), Style::default().fg(Color::DarkGray)),
            ]));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(inner);

        self.history.clone().render(chunks[0], buf);

        if self.is_typing {
            let frame = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
            let line = Line::from(vec![
                Span::styled(frame, Style::default().fg(Color::Gray)),
                Span::styled(" Typing…", Style::default().fg(Color::DarkGray)),
            ]);
            buf.set_line(chunks[1].x, chunks[1].y, &line, chunks[1].width);
        }

        self.composer.clone().render(chunks[2], buf);

        Paragraph::new(Line::from(Span::styled(
            "Gurudev AI may produce inaccurate information. Verify critical information.",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}
