//! Category tree panel and breadcrumb line.

use crate::app::{App, Focus};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the category tree panel.
pub(super) fn render_tree(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Tree;
    let rows = app.tree_rows_for_render();

    let style_selected = app.style("category_selected");
    let style_active = app.style("category_active");
    let style_normal = app.style("category_normal");
    let style_count = app.style("category_count");

    let items: Vec<ListItem> = if !app.categories_loaded {
        vec![ListItem::new("Loading categories...")]
    } else if rows.is_empty() {
        // Empty snapshot, not a failed fetch: the blog has no categories.
        vec![ListItem::new("No categories")]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let indent = "  ".repeat(row.depth);
                let marker = if row.has_children {
                    if row.is_collapsed {
                        "> "
                    } else {
                        "v "
                    }
                } else {
                    "  "
                };

                let style = if i == app.tree_cursor {
                    style_selected
                } else if app.selection.active() == Some(row.category_id) {
                    style_active
                } else {
                    style_normal
                };

                let name = strip_control_chars(&row.name);
                let max_name = (area.width as usize).saturating_sub(indent.len() + 8);
                let mut spans = Vec::with_capacity(3);
                spans.push(Span::styled(format!("{}{}", indent, marker), style));
                spans.push(Span::styled(
                    truncate_to_width(&name, max_name).into_owned(),
                    style,
                ));
                if row.article_total > 0 {
                    spans.push(Span::styled(
                        format!(" ({})", row.article_total),
                        if i == app.tree_cursor { style } else { style_count },
                    ));
                }

                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Categories"),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.tree_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

/// Render the breadcrumb of the active selection: "Tech / Frontend / React".
pub(super) fn render_breadcrumb(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let trail = app.selection.trail();
    let line = if trail.is_empty() {
        Line::from(Span::styled("All articles", app.style("breadcrumb")))
    } else {
        let mut spans = Vec::with_capacity(trail.len() * 2);
        for (i, segment) in trail.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" / ", app.style("breadcrumb")));
            }
            let style = if i == trail.len() - 1 {
                app.style("breadcrumb_leaf")
            } else {
                app.style("breadcrumb")
            };
            spans.push(Span::styled(
                strip_control_chars(segment).into_owned(),
                style,
            ));
        }
        Line::from(spans)
    };

    f.render_widget(ratatui::widgets::Paragraph::new(line), area);
}
