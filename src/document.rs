use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Text extracted from a converted notes document.
///
/// This is the grounding context handed to the assistant. The conversation
/// manager only ever reads it; the conversion pipeline that produced it
/// lives outside this binary.
#[derive(Debug, Clone, Default)]
pub struct NotesContext {
    name: String,
    text: String,
}

impl NotesContext {
    /// Read extracted notes text from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read notes file {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, text })
    }

    /// An ungrounded context: the assistant answers from general knowledge.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
