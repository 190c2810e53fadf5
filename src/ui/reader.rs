//! Full-screen article reader: header, load states, markdown rendering.

use crate::app::{App, ContentState};
use crate::theme::StyleMap;
use crate::util::strip_control_chars;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::borrow::Cow;

/// Spinner frames for the loading state.
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Render the article reader view.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Guard against zero-sized areas during extreme terminal resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    // Update visible lines for scroll clamping (area height minus borders)
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;

    // Clamp BEFORE rendering so a resize never draws one frame with an
    // out-of-range offset.
    app.clamp_reader_scroll();

    let Some(article) = app.reader_article.as_ref() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title("Reader"));
        f.render_widget(paragraph, area);
        return;
    };

    // Header: title, then date and owning categories
    let mut meta = String::new();
    if let Some(date) = article.update_date() {
        meta.push_str(date);
    }
    for cat in &article.article_category_list {
        if !meta.is_empty() {
            meta.push_str(" · ");
        }
        meta.push_str(&strip_control_chars(&cat.category_name));
    }

    let header = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            app.style("reader_heading"),
        )),
        Line::from(Span::styled(meta, app.style("reader_metadata"))),
        Line::from(""),
    ];

    let content_lines: Cow<'_, [Line<'static>]> = match &app.content_state {
        ContentState::Idle => Cow::Owned(vec![Line::from("Loading content...")]),
        ContentState::Loading { .. } => Cow::Owned(vec![Line::from(format!(
            "{} Loading content...",
            SPINNER[app.spinner_frame % SPINNER.len()]
        ))]),
        ContentState::Loaded { rendered_lines, .. } => Cow::Borrowed(rendered_lines),
        ContentState::Failed {
            error, fallback, ..
        } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("Failed to load content: {}", error),
                    app.style("reader_error"),
                )),
                Line::from(""),
            ];
            if let Some(excerpt) = fallback {
                lines.push(Line::from(Span::styled(
                    "Showing excerpt:",
                    app.style("reader_fallback"),
                )));
                lines.push(Line::from(""));
                lines.extend(
                    strip_control_chars(excerpt)
                        .lines()
                        .map(|l| Line::from(l.to_string())),
                );
            }
            Cow::Owned(lines)
        }
    };

    let text = Text::from_iter(header.into_iter().chain(content_lines.iter().cloned()));

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Article"))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(crate::app::MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

/// Convert markdown to styled ratatui lines.
///
/// Returns owned lines so the result can be cached on the `App` and reused
/// across frames; scrolling never re-parses the document.
pub fn render_markdown(md: &str, theme: &StyleMap) -> Vec<Line<'static>> {
    let parser = Parser::new(md);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);

    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;
    // (ordered counter or None for bullets) per nesting level
    let mut list_stack: Vec<Option<u64>> = Vec::new();
    let mut link_dest: Option<String> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                lines.push(Line::from(""));
                in_heading = false;
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                // No blank line between tight list items
                if list_stack.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::List(start)) => {
                list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                list_stack.pop();
                if list_stack.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                let depth = list_stack.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                let marker = match list_stack.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}{}. ", indent, n);
                        *n += 1;
                        m
                    }
                    _ => format!("{}- ", indent),
                };
                current_spans.push(Span::raw(marker));
            }
            Event::End(TagEnd::Item) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Start(Tag::Emphasis) => {
                in_emphasis = true;
            }
            Event::End(TagEnd::Emphasis) => {
                in_emphasis = false;
            }
            Event::Start(Tag::Strong) => {
                in_strong = true;
            }
            Event::End(TagEnd::Strong) => {
                in_strong = false;
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                link_dest = Some(dest_url.into_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = link_dest.take() {
                    current_spans.push(Span::styled(
                        format!(" ({})", url),
                        theme.resolve("reader_link"),
                    ));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    theme.resolve("reader_image"),
                ));
            }
            Event::Text(text) => {
                let style = if in_code_block {
                    theme.resolve("reader_code_block")
                } else if in_heading {
                    theme.resolve("reader_heading")
                } else if in_strong {
                    theme.resolve("reader_strong")
                } else if in_emphasis {
                    theme.resolve("reader_emphasis")
                } else {
                    theme.resolve("reader_body")
                };
                if in_code_block {
                    // Code blocks keep their own line structure
                    for (i, code_line) in text.lines().enumerate() {
                        if i > 0 && !current_spans.is_empty() {
                            lines.push(Line::from(std::mem::take(&mut current_spans)));
                        }
                        current_spans.push(Span::styled(code_line.to_string(), style));
                    }
                } else {
                    current_spans.push(Span::styled(text.into_string(), style));
                }
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    theme.resolve("reader_inline_code"),
                ));
            }
            Event::SoftBreak => {
                current_spans.push(Span::raw(" "));
            }
            Event::HardBreak => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            Event::Rule => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                lines.push(Line::from("———"));
                lines.push(Line::from(""));
            }
            _ => {}
        }
    }

    // Flush remaining spans
    if !current_spans.is_empty() {
        lines.push(Line::from(current_spans));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeVariant;

    fn theme() -> StyleMap {
        StyleMap::from_palette(&ThemeVariant::Dark.palette())
    }

    fn rendered_text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_plain_text() {
        let lines = render_markdown("Hello world", &theme());
        assert!(rendered_text(&lines).contains("Hello world"));
    }

    #[test]
    fn test_render_heading() {
        let lines = render_markdown("# Heading 1\n\nbody", &theme());
        let text = rendered_text(&lines);
        assert!(text.contains("Heading 1"));
        assert!(text.contains("body"));
    }

    #[test]
    fn test_render_emphasis_and_strong() {
        let lines = render_markdown("This is **bold** and *italic*", &theme());
        assert!(rendered_text(&lines).contains("bold"));
    }

    #[test]
    fn test_render_code_block_keeps_lines() {
        let lines = render_markdown("```\nlet a = 1;\nlet b = 2;\n```", &theme());
        let text = rendered_text(&lines);
        assert!(text.contains("let a = 1;"));
        assert!(text.contains("let b = 2;"));
    }

    #[test]
    fn test_render_unordered_list_bullets() {
        let lines = render_markdown("- one\n- two", &theme());
        let text = rendered_text(&lines);
        assert!(text.contains("- one"));
        assert!(text.contains("- two"));
    }

    #[test]
    fn test_render_ordered_list_numbers() {
        let lines = render_markdown("1. first\n2. second", &theme());
        let text = rendered_text(&lines);
        assert!(text.contains("1. first"));
        assert!(text.contains("2. second"));
    }

    #[test]
    fn test_render_link_shows_url() {
        let lines = render_markdown("[here](https://example.com)", &theme());
        assert!(rendered_text(&lines).contains("(https://example.com)"));
    }

    #[test]
    fn test_render_empty() {
        let lines = render_markdown("", &theme());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_render_unicode() {
        let lines = render_markdown("你好 世界 🌍", &theme());
        assert!(!lines.is_empty());
    }
}
