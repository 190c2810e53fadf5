//! Home sidebar: author card, blog totals, tag cloud, recent publish dates.

use crate::app::App;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// How many recent publish dates to show.
const MAX_DATES: usize = 6;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let heading = app.style("sidebar_heading");
    let value = app.style("sidebar_value");
    let tag_style = app.style("sidebar_tag");

    let mut lines: Vec<Line> = Vec::new();

    // Author card
    if let Some(author) = &app.sidebar.author {
        lines.push(Line::from(Span::styled(
            strip_control_chars(&author.author_name).into_owned(),
            heading,
        )));
        if let Some(signature) = &author.signature {
            let width = area.width.saturating_sub(2) as usize;
            lines.push(Line::from(Span::styled(
                truncate_to_width(&strip_control_chars(signature), width).into_owned(),
                value,
            )));
        }
        if let Some(email) = &author.email {
            lines.push(Line::from(Span::styled(email.clone(), value)));
        }
        if let Some(website) = &author.website {
            lines.push(Line::from(Span::styled(website.clone(), value)));
        }
        lines.push(Line::from(""));
    } else if app.sidebar_loading {
        lines.push(Line::from("Loading..."));
        lines.push(Line::from(""));
    }

    // Blog totals
    if app.sidebar.article_total.is_some() || app.sidebar.category_total.is_some() {
        let articles = app.sidebar.article_total.unwrap_or(0);
        let categories = app.sidebar.category_total.unwrap_or(0);
        lines.push(Line::from(vec![
            Span::styled(format!("{}", articles), heading),
            Span::styled(" articles · ", value),
            Span::styled(format!("{}", categories), heading),
            Span::styled(" categories", value),
        ]));
        lines.push(Line::from(""));
    }

    // Tags
    if !app.sidebar.tags.is_empty() {
        lines.push(Line::from(Span::styled("Tags", heading)));
        let mut spans = Vec::new();
        for tag in &app.sidebar.tags {
            spans.push(Span::styled(
                format!("#{} ", strip_control_chars(&tag.tag_name)),
                tag_style,
            ));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    // Recent publish dates
    if !app.sidebar.publish_dates.is_empty() {
        lines.push(Line::from(Span::styled("Recently published", heading)));
        for date in app.sidebar.publish_dates.iter().take(MAX_DATES) {
            lines.push(Line::from(Span::styled(
                date.format("%Y-%m-%d").to_string(),
                value,
            )));
        }
    }

    if lines.is_empty() {
        lines.push(Line::from("No blog info available"));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title("Blog"),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
