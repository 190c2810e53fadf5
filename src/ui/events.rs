//! Application event handling.
//!
//! This module applies background task completions — category tree, article
//! pages, reader content, sidebar/about data — to the `App`. Results that
//! carry a generation number are checked against the current one first:
//! a mismatch means the user has already moved on and the result is stale.

use tokio::sync::mpsc;

use crate::api::{Article, Page};
use crate::app::{App, AppEvent, ContentState, View};
use crate::util::strip_control_chars;

use super::helpers;
use super::reader::render_markdown;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::CategoriesLoaded { result } => {
            handle_categories_loaded(app, result, event_tx);
        }
        AppEvent::ArticlesLoaded {
            generation,
            append,
            result,
        } => {
            handle_articles_loaded(app, generation, append, result);
        }
        AppEvent::ArticleLoaded {
            article_id,
            generation,
            cached,
            result,
        } => {
            handle_article_loaded(app, article_id, generation, cached, result);
        }
        AppEvent::SidebarLoaded(data) => {
            app.sidebar = *data;
            app.sidebar_loading = false;
        }
        AppEvent::AboutLoaded(data) => {
            app.about = *data;
            app.about_loading = false;
        }
    }
}

fn handle_categories_loaded(
    app: &mut App,
    result: Result<Vec<crate::api::CategoryNode>, String>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match result {
        Ok(tree) => {
            match app.apply_category_snapshot(&tree) {
                Ok(()) => {
                    tracing::info!(categories = app.catalog.len(), "Category tree loaded");
                    app.align_tree_cursor_to_selection();
                    // The selection's filter just became valid; fetch its
                    // first article page if we are looking at it.
                    if app.view == View::Categories && app.selection.active().is_some() {
                        helpers::spawn_category_page(app, event_tx, 1, false);
                    }
                }
                Err(e) => {
                    // Snapshot kept out of the catalog: its parent links
                    // are inconsistent and projections would misbehave.
                    tracing::error!(error = %e, "Rejected category snapshot");
                    app.set_status(format!("Category data is inconsistent: {}", e));
                }
            }
        }
        Err(e) => {
            // Fetch errors keep whatever snapshot we already had; an empty
            // tree response is handled above and is not an error.
            tracing::error!(error = %e, "Category tree fetch failed");
            app.set_status(format!("Failed to load categories: {}", e));
        }
    }
}

fn handle_articles_loaded(
    app: &mut App,
    generation: u64,
    append: bool,
    result: Result<Page<Article>, String>,
) {
    // Check generation first: if the user re-selected while this page was
    // in flight, a newer query owns the list now (last selection wins).
    if generation != app.page_generation {
        tracing::debug!(
            expected = app.page_generation,
            got = generation,
            "Ignoring stale article page (generation mismatch)"
        );
        return;
    }

    app.articles_loading = false;

    match result {
        Ok(page) => {
            tracing::debug!(
                records = page.records.len(),
                current = page.current,
                pages = page.pages,
                append,
                "Applying article page"
            );
            app.pager.apply(page, append);
            if append {
                app.clamp_selected_article();
            } else {
                app.selected_article = 0;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Article page fetch failed");
            app.set_status(format!("Failed to load articles: {}", e));
        }
    }
}

fn handle_article_loaded(
    app: &mut App,
    article_id: i64,
    generation: u64,
    cached: bool,
    result: Result<Article, String>,
) {
    // A stale body must never overwrite a newer navigation (user went
    // A -> B -> A quickly); only the most recent generation is accepted.
    if generation != app.content_generation {
        tracing::debug!(
            expected = app.content_generation,
            got = generation,
            article_id,
            "Ignoring stale article body (generation mismatch)"
        );
        return;
    }

    match result {
        Ok(article) => {
            match article.content.as_deref() {
                Some(md) if !md.trim().is_empty() => {
                    let clean = strip_control_chars(md);
                    let rendered_lines = render_markdown(&clean, &app.theme);
                    if !cached {
                        app.article_cache.put(article_id, article.clone());
                    }
                    app.content_state = ContentState::Loaded {
                        article_id,
                        rendered_lines,
                    };
                    // Detail carries fields the list row lacked.
                    app.reader_article = Some(article);
                }
                _ => {
                    tracing::warn!(article_id, "Article detail arrived without a body");
                    app.content_state = ContentState::Failed {
                        article_id,
                        error: "Article has no content".to_string(),
                        fallback: article.excerpt.clone(),
                    };
                    app.reader_article = Some(article);
                }
            }
        }
        Err(e) => {
            tracing::error!(article_id, error = %e, "Article detail fetch failed");
            let fallback = app
                .reader_article
                .as_ref()
                .and_then(|a| a.excerpt.clone());
            app.content_state = ContentState::Failed {
                article_id,
                error: e,
                fallback,
            };
        }
    }
    app.clamp_reader_scroll();
}
