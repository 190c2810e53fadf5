//! Article list panel, shared by the home feed and the category view.

use crate::app::{App, Focus, View};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the article list panel.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.view == View::Home || app.focus == Focus::Articles;

    let style_title = app.style("article_title");
    let style_selected = app.style("article_selected");
    let style_date = app.style("article_date");
    let style_tag = app.style("article_category_tag");

    let items: Vec<ListItem> = if app.pager.is_empty() {
        let msg = if app.articles_loading {
            "Loading articles..."
        } else {
            // The web UI's empty-state card, reduced to a line.
            "No articles to show. Try another category."
        };
        vec![ListItem::new(msg)]
    } else {
        app.pager
            .articles()
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let selected = i == app.selected_article;

                let mut spans = Vec::with_capacity(4);

                let title_style = if selected { style_selected } else { style_title };
                let clean_title = strip_control_chars(&article.title);
                // Leave room for the date column
                let max_title = (area.width as usize).saturating_sub(16);
                spans.push(Span::styled(
                    truncate_to_width(&clean_title, max_title).into_owned(),
                    title_style,
                ));

                if let Some(date) = article.update_date() {
                    spans.push(Span::styled(format!("  {}", date), style_date));
                }

                for cat in &article.article_category_list {
                    spans.push(Span::styled(
                        format!(" #{}", strip_control_chars(&cat.category_name)),
                        style_tag,
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

    let title = list_title(app);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    let mut state = ListState::default().with_selected(Some(app.selected_article));
    f.render_stateful_widget(list, area, &mut state);
}

/// Panel title with the page position, e.g. "Articles - page 2/5 (18)".
fn list_title(app: &App) -> String {
    let base = match app.view {
        View::Home => "Latest articles",
        _ => "Articles",
    };
    if app.pager.total_pages() > 0 {
        format!(
            "{} - page {}/{} ({})",
            base,
            app.pager.current_page(),
            app.pager.total_pages(),
            app.pager.total_articles()
        )
    } else {
        base.to_string()
    }
}
