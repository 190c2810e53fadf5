//! Keyboard input handling.
//!
//! One dispatch per view, after the handful of global keys. Handlers only
//! mutate state and spawn background fetches; nothing here blocks.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, Focus, View};

use super::helpers;
use super::loop_runner::Action;

pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Global keys first
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(Action::Quit);
        }
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            return Ok(Action::Continue);
        }
        _ => {}
    }

    // View switching is disabled inside the reader; leave it first.
    if app.view != View::Reader {
        match code {
            KeyCode::Char('1') => {
                switch_to_home(app, event_tx);
                return Ok(Action::Continue);
            }
            KeyCode::Char('2') => {
                switch_to_categories(app, event_tx);
                return Ok(Action::Continue);
            }
            KeyCode::Char('3') => {
                switch_to_about(app, event_tx);
                return Ok(Action::Continue);
            }
            KeyCode::Char('r') => {
                refresh_current_view(app, event_tx);
                return Ok(Action::Continue);
            }
            _ => {}
        }
    }

    match app.view {
        View::Home => handle_home_input(app, code, event_tx),
        View::Categories => handle_categories_input(app, code, event_tx),
        View::Reader => handle_reader_input(app, code, modifiers, event_tx),
        View::About => handle_about_input(app, code),
    }

    Ok(Action::Continue)
}

// ============================================================================
// View switching
// ============================================================================

fn switch_to_home(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.view == View::Home {
        return;
    }
    app.view = View::Home;
    app.pager.reset();
    app.selected_article = 0;
    helpers::spawn_home_page(app, event_tx, 1, false);
    if app.sidebar.author.is_none() && app.sidebar.tags.is_empty() {
        helpers::spawn_sidebar_load(app, event_tx);
    }
}

fn switch_to_categories(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.view == View::Categories {
        return;
    }
    app.view = View::Categories;
    app.focus = Focus::Tree;
    app.pager.reset();
    app.selected_article = 0;

    if app.categories_loaded {
        // Tree snapshot is already in hand; refetch only the articles.
        if app.selection.active().is_some() {
            helpers::spawn_category_page(app, event_tx, 1, false);
        }
        app.align_tree_cursor_to_selection();
    } else {
        // First entry: the article fetch follows once the tree arrives and
        // the default selection's filter exists.
        helpers::spawn_category_tree_load(app, event_tx);
    }
}

fn switch_to_about(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.view == View::About {
        return;
    }
    app.view = View::About;
    app.about_scroll = 0;
    let empty = app.about.author.is_none()
        && app.about.mission.is_none()
        && app.about.experiences.is_empty();
    if empty {
        helpers::spawn_about_load(app, event_tx);
    }
}

fn refresh_current_view(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.view {
        View::Home => {
            helpers::spawn_home_page(app, event_tx, 1, false);
            app.sidebar_loading = false;
            helpers::spawn_sidebar_load(app, event_tx);
            app.set_status("Refreshing...");
        }
        View::Categories => {
            // Tree and articles both refetch; the selection is re-derived
            // against the new snapshot when it lands.
            helpers::spawn_category_tree_load(app, event_tx);
            app.set_status("Refreshing...");
        }
        View::About => {
            app.about_loading = false;
            helpers::spawn_about_load(app, event_tx);
            app.set_status("Refreshing...");
        }
        View::Reader => {}
    }
}

// ============================================================================
// Per-view handlers
// ============================================================================

fn handle_home_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.selected_article + 1 < app.pager.len() {
                app.selected_article += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected_article = app.selected_article.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(article) = app.selected_article().cloned() {
                app.enter_reader(article);
                helpers::start_content_load(app, event_tx);
            }
        }
        KeyCode::Char('n') | KeyCode::Right => {
            if app.pager.has_more() {
                let next = app.pager.current_page() + 1;
                helpers::spawn_home_page(app, event_tx, next, false);
            }
        }
        KeyCode::Char('p') | KeyCode::Left => {
            if app.pager.current_page() > 1 {
                let prev = app.pager.current_page() - 1;
                helpers::spawn_home_page(app, event_tx, prev, false);
            }
        }
        KeyCode::Char('m') => {
            // Load more: append the next page under the current list.
            if app.pager.has_more() {
                let next = app.pager.current_page() + 1;
                helpers::spawn_home_page(app, event_tx, next, true);
            }
        }
        KeyCode::Char('o') => {
            if let Some(website) = app
                .sidebar
                .author
                .as_ref()
                .and_then(|a| a.website.clone())
            {
                helpers::open_link(app, &website);
            } else {
                app.set_status("No author website to open");
            }
        }
        _ => {}
    }
}

fn handle_categories_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    if code == KeyCode::Tab {
        app.focus = match app.focus {
            Focus::Tree => Focus::Articles,
            Focus::Articles => Focus::Tree,
        };
        return;
    }

    match app.focus {
        Focus::Tree => handle_tree_input(app, code, event_tx),
        Focus::Articles => handle_article_pane_input(app, code, event_tx),
    }
}

fn handle_tree_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.tree_rows().len();
            if app.tree_cursor + 1 < len {
                app.tree_cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.tree_cursor = app.tree_cursor.saturating_sub(1);
        }
        KeyCode::Enter => {
            // Selecting recomputes breadcrumb + subtree filter, then starts
            // a fresh page-1 query for the new filter.
            let Some(id) = app.tree_cursor_category() else {
                return;
            };
            match app.selection.select(id, &app.catalog) {
                Ok(()) => {
                    tracing::debug!(
                        category_id = id,
                        filter = ?app.selection.filter_ids(),
                        "Category selected"
                    );
                    app.pager.reset();
                    app.selected_article = 0;
                    helpers::spawn_category_page(app, event_tx, 1, false);
                }
                Err(e) => {
                    tracing::error!(category_id = id, error = %e, "Selection rejected");
                    app.set_status(format!("Category data is inconsistent: {}", e));
                }
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.tree_cursor_category() {
                if app.catalog.has_children(id) {
                    app.selection.toggle_collapsed(id);
                    app.invalidate_tree_rows();
                    app.clamp_tree_cursor();
                }
            }
        }
        KeyCode::Char('E') => {
            app.selection.expand_all();
            app.invalidate_tree_rows();
            app.align_tree_cursor_to_selection();
        }
        KeyCode::Char('C') => {
            app.selection.collapse_all(&app.catalog);
            app.invalidate_tree_rows();
            app.clamp_tree_cursor();
        }
        _ => {}
    }
}

fn handle_article_pane_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.selected_article + 1 < app.pager.len() {
                app.selected_article += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected_article = app.selected_article.saturating_sub(1);
        }
        KeyCode::Enter => {
            if let Some(article) = app.selected_article().cloned() {
                app.enter_reader(article);
                helpers::start_content_load(app, event_tx);
            }
        }
        KeyCode::Char('n') | KeyCode::Right => {
            if app.pager.has_more() {
                let next = app.pager.current_page() + 1;
                helpers::spawn_category_page(app, event_tx, next, false);
            }
        }
        KeyCode::Char('p') | KeyCode::Left => {
            if app.pager.current_page() > 1 {
                let prev = app.pager.current_page() - 1;
                helpers::spawn_category_page(app, event_tx, prev, false);
            }
        }
        KeyCode::Char('m') => {
            if app.pager.has_more() {
                let next = app.pager.current_page() + 1;
                helpers::spawn_category_page(app, event_tx, next, true);
            }
        }
        _ => {}
    }
}

fn handle_reader_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Left => {
            app.exit_reader();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_offset = app.scroll_offset.saturating_add(1);
            app.clamp_reader_scroll();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_offset = app.scroll_offset.saturating_sub(1);
        }
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            let half = (app.reader_visible_lines / 2).max(1);
            app.scroll_offset = app.scroll_offset.saturating_add(half);
            app.clamp_reader_scroll();
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            let half = (app.reader_visible_lines / 2).max(1);
            app.scroll_offset = app.scroll_offset.saturating_sub(half);
        }
        KeyCode::Char('g') => {
            app.scroll_offset = 0;
        }
        KeyCode::Char('G') => {
            app.scroll_offset = usize::MAX;
            app.clamp_reader_scroll();
        }
        KeyCode::Char('r') => {
            // Refetch the body, bypassing the cache entry by overwriting it
            // on arrival.
            if let Some(id) = app.reader_article.as_ref().map(|a| a.article_id) {
                app.article_cache.pop(&id);
                helpers::start_content_load(app, event_tx);
            }
        }
        _ => {}
    }
}

fn handle_about_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.about_scroll = app.about_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.about_scroll = app.about_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => {
            app.about_scroll = 0;
        }
        KeyCode::Char('o') => {
            if let Some(website) = app.about.author.as_ref().and_then(|a| a.website.clone()) {
                helpers::open_link(app, &website);
            } else {
                app.set_status("No author website to open");
            }
        }
        _ => {}
    }
}
