//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{about, articles, categories, reader, sidebar, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application
/// state. Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics during extreme
    // terminal resizes
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    match app.view {
        View::Home => render_home(f, app),
        View::Categories => render_categories(f, app),
        View::Reader => render_reader(f, app),
        View::About => render_about(f, app),
    }
}

/// Home: article feed on the left, author/tags/stats sidebar on the right.
fn render_home(f: &mut Frame, app: &App) {
    let rows = vertical_with_status(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows.0);

    articles::render(f, app, main[0]);
    sidebar::render(f, app, main[1]);
    status::render(f, app, rows.1);
}

/// Categories: tree panel on the left, breadcrumb + filtered list on the
/// right.
fn render_categories(f: &mut Frame, app: &App) {
    let rows = vertical_with_status(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(rows.0);

    categories::render_tree(f, app, main[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(main[1]);

    categories::render_breadcrumb(f, app, right[0]);
    articles::render(f, app, right[1]);

    status::render(f, app, rows.1);
}

fn render_reader(f: &mut Frame, app: &mut App) {
    let rows = vertical_with_status(f.area());
    reader::render(f, app, rows.0);
    status::render(f, app, rows.1);
}

fn render_about(f: &mut Frame, app: &App) {
    let rows = vertical_with_status(f.area());
    about::render(f, app, rows.0);
    status::render(f, app, rows.1);
}

/// Split an area into (content, 1-line status bar).
fn vertical_with_status(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}
