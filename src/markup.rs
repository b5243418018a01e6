//! Display formatting for assistant replies.
//!
//! Replies arrive as markdown-like text (the prompt asks for bold, italics,
//! headings, quotes, bullets and fenced code). Formatting happens at render
//! time only; the conversation log always keeps the raw text.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// One structural block of a reply, produced by the line-oriented pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `# ` / `## ` / `### ` lines; level is 1..=3, descending prominence.
    Heading { level: u8, text: String },
    /// `> ` line.
    Quote(String),
    /// Consecutive `* ` lines. A blank line or any other block ends the
    /// run, so blank-separated lists become separate blocks.
    List(Vec<String>),
    /// Triple-backtick fence, optionally language-tagged. An unterminated
    /// fence runs to end of input.
    Code { lang: Option<String>, lines: Vec<String> },
    /// A plain text line.
    Text(String),
    /// An empty line.
    Blank,
}

/// Split raw reply text into blocks.
///
/// Line-oriented state machine: inside a fence every line is code; outside,
/// bullet lines accumulate into the open list and anything else closes it.
pub fn parse_blocks(raw: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut list_items: Vec<String> = Vec::new();
    let mut fence: Option<(Option<String>, Vec<String>)> = None;

    for line in raw.lines() {
        if let Some((lang, mut lines)) = fence.take() {
            if line.trim_start().starts_with("```") {
                blocks.push(Block::Code { lang, lines });
            } else {
                lines.push(line.to_string());
                fence = Some((lang, lines));
            }
            continue;
        }

        if let Some(rest) = line.trim_start().strip_prefix("```") {
            flush_list(&mut list_items, &mut blocks);
            let lang = rest.trim();
            fence = Some(((!lang.is_empty()).then(|| lang.to_string()), Vec::new()));
            continue;
        }

        if let Some(item) = line.strip_prefix("* ") {
            list_items.push(item.to_string());
            continue;
        }

        flush_list(&mut list_items, &mut blocks);

        if let Some(text) = line.strip_prefix("### ") {
            blocks.push(Block::Heading { level: 3, text: text.to_string() });
        } else if let Some(text) = line.strip_prefix("## ") {
            blocks.push(Block::Heading { level: 2, text: text.to_string() });
        } else if let Some(text) = line.strip_prefix("# ") {
            blocks.push(Block::Heading { level: 1, text: text.to_string() });
        } else if let Some(text) = line.strip_prefix("> ") {
            blocks.push(Block::Quote(text.to_string()));
        } else if line.is_empty() {
            blocks.push(Block::Blank);
        } else {
            blocks.push(Block::Text(line.to_string()));
        }
    }

    flush_list(&mut list_items, &mut blocks);
    if let Some((lang, lines)) = fence {
        blocks.push(Block::Code { lang, lines });
    }

    blocks
}

fn flush_list(items: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !items.is_empty() {
        blocks.push(Block::List(std::mem::take(items)));
    }
}

/// Style inline emphasis within one line of text.
///
/// `**bold**` is resolved before `*italic*`; the ordering matters so a
/// single asterisk never matches inside a double-asterisk pair. Italics
/// still apply inside bold segments. Unmatched markers stay literal.
pub fn parse_inline(text: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (segment, bold) in split_pairs(text, "**") {
        let style = if bold {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        };
        for (inner, italic) in split_pairs(&segment, "*") {
            if inner.is_empty() {
                continue;
            }
            let style = if italic {
                style.add_modifier(Modifier::ITALIC)
            } else {
                style
            };
            spans.push(Span::styled(inner, style));
        }
    }
    if spans.is_empty() {
        spans.push(Span::styled(String::new(), base));
    }
    spans
}

/// Split `text` on paired occurrences of `delim` into `(segment, inside)`
/// pieces. A delimiter without a closing partner is kept as literal text.
fn split_pairs(text: &str, delim: &str) -> Vec<(String, bool)> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(delim) {
        let after = &rest[open + delim.len()..];
        let Some(close) = after.find(delim) else {
            break;
        };
        if open > 0 {
            out.push((rest[..open].to_string(), false));
        }
        out.push((after[..close].to_string(), true));
        rest = &after[close + delim.len()..];
    }

    if !rest.is_empty() {
        out.push((rest.to_string(), false));
    }
    out
}

/// Render raw reply text to styled terminal lines.
pub fn format_markdown(raw: &str) -> Vec<Line<'static>> {
    render_blocks(&parse_blocks(raw))
}

pub fn render_blocks(blocks: &[Block]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                lines.push(Line::from(parse_inline(text, heading_style(*level))));
            }
            Block::Quote(text) => {
                let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::DarkGray))];
                spans.extend(parse_inline(
                    text,
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                ));
                lines.push(Line::from(spans));
            }
            Block::List(items) => {
                for item in items {
                    let mut spans = vec![Span::styled("  • ", Style::default().fg(Color::Cyan))];
                    spans.extend(parse_inline(item, Style::default()));
                    lines.push(Line::from(spans));
                }
            }
            Block::Code { lang, lines: code } => {
                if let Some(lang) = lang {
                    lines.push(Line::from(Span::styled(
                        format!("  {lang}"),
                        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
                    )));
                }
                for code_line in code {
                    lines.push(Line::from(vec![
                        Span::styled("▎ ", Style::default().fg(Color::DarkGray)),
                        Span::styled(code_line.clone(), Style::default().fg(Color::Rgb(209, 154, 102))),
                    ]));
                }
            }
            Block::Text(text) => {
                lines.push(Line::from(parse_inline(text, Style::default())));
            }
            Block::Blank => lines.push(Line::default()),
        }
    }

    lines
}

fn heading_style(level: u8) -> Style {
    let base = Style::default().fg(Color::Cyan);
    match level {
        1 => base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => base.add_modifier(Modifier::BOLD),
        _ => base.add_modifier(Modifier::ITALIC),
    }
}
