use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pen2pdf::app::{self, App};
use pen2pdf::config::{self, Config};
use pen2pdf::document::NotesContext;
use pen2pdf::gemini::GeminiClient;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "pen2pdf")]
#[command(version)]
#[command(about = "Chat with your handwritten notes", long_about = None)]
struct Cli {
    /// Path to the extracted text of a converted notes document
    notes: Option<PathBuf>,

    /// Override the configured model identifier
    #[arg(long)]
    model: Option<String>,
}

/// Diagnostics go to a file; stderr belongs to the terminal UI.
fn init_logging() -> Result<()> {
    let path = config::log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if !config.has_api_key() {
        warn!("no API key configured; chat requests will fail with an apology message");
    }

    let notes = match &cli.notes {
        Some(path) => NotesContext::from_file(path)?,
        None => NotesContext::empty(),
    };

    let client = GeminiClient::new(&config)?;
    let app = App::new(client, notes);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = app::run(&mut terminal, app);

    // Restore the terminal even when the loop errored.
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}
