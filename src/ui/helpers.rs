//! Background fetch spawns shared by input handling and event processing.
//!
//! Every spawn clones the (cheap) `ApiClient` and the event sender into the
//! task; results come back as [`AppEvent`]s. Fetches that can be superseded
//! by a newer user action (article pages, reader content) carry a
//! generation number and store their `JoinHandle` on the `App` so the next
//! spawn can abort them.

use tokio::sync::mpsc;

use crate::api::ArticleQuery;
use crate::app::{AboutData, App, AppEvent, ContentState, SidebarData};
use crate::catalog::CategoryId;
use crate::util::validate_link;

/// Spawn a home-feed page fetch. `append` accumulates (load more) instead
/// of replacing.
pub(super) fn spawn_home_page(
    app: &mut App,
    event_tx: &mpsc::Sender<AppEvent>,
    page_num: u64,
    append: bool,
) {
    let query = app.pager.query_for_page(page_num, &[]);
    spawn_article_page(app, event_tx, query, append, true);
}

/// Spawn a category-filtered page fetch for the current selection.
pub(super) fn spawn_category_page(
    app: &mut App,
    event_tx: &mpsc::Sender<AppEvent>,
    page_num: u64,
    append: bool,
) {
    let filter: Vec<CategoryId> = app.selection.filter_ids().to_vec();
    let query = app.pager.query_for_page(page_num, &filter);
    spawn_article_page(app, event_tx, query, append, false);
}

fn spawn_article_page(
    app: &mut App,
    event_tx: &mpsc::Sender<AppEvent>,
    query: ArticleQuery,
    append: bool,
    home: bool,
) {
    let generation = app.begin_page_load();
    let api = app.api.clone();
    let tx = event_tx.clone();

    tracing::debug!(
        page = query.page_num,
        filter_len = query.category_ids.len(),
        generation,
        append,
        "Spawning article page fetch"
    );

    app.page_load_handle = Some(tokio::spawn(async move {
        let result = if home {
            api.home_articles(&query).await
        } else {
            api.category_articles(&query).await
        };
        let result = result.map_err(|e| e.to_string());

        let event = AppEvent::ArticlesLoaded {
            generation,
            append,
            result,
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send article page (receiver dropped)");
        }
    }));
}

/// Spawn the category tree fetch.
pub(super) fn spawn_category_tree_load(app: &App, event_tx: &mpsc::Sender<AppEvent>) {
    let api = app.api.clone();
    let tx = event_tx.clone();
    let root_id = app.root_category_id;

    tokio::spawn(async move {
        let result = api.category_tree(root_id).await.map_err(|e| e.to_string());
        if let Err(e) = tx.send(AppEvent::CategoriesLoaded { result }).await {
            tracing::warn!(error = %e, "Failed to send category tree (receiver dropped)");
        }
    });
}

/// Start loading the reader's article body.
///
/// Served from the in-memory cache when the article was read recently; the
/// cached copy still flows through the normal event path so the handler
/// stays the single place that builds reader state.
pub(super) fn start_content_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(article) = app.reader_article.clone() else {
        return;
    };
    let article_id = article.article_id;
    let generation = app.begin_content_load();
    app.content_state = ContentState::Loading { article_id };

    if let Some(full) = app.article_cache.get(&article_id).cloned() {
        tracing::debug!(article_id, "Serving article body from cache");
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let _ = tx
                .send(AppEvent::ArticleLoaded {
                    article_id,
                    generation,
                    cached: true,
                    result: Ok(full),
                })
                .await;
        });
        return;
    }

    let api = app.api.clone();
    let tx = event_tx.clone();
    tracing::debug!(article_id, generation, "Spawning article detail fetch");

    app.content_load_handle = Some(tokio::spawn(async move {
        let result = api.article(article_id).await.map_err(|e| e.to_string());
        let event = AppEvent::ArticleLoaded {
            article_id,
            generation,
            cached: false,
            result,
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send article detail (receiver dropped)");
        }
    }));
}

/// Spawn the home sidebar fetch: author, tags, totals, publish dates.
///
/// Each endpoint degrades independently; a failure is logged and its card
/// stays empty.
pub(super) fn spawn_sidebar_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.sidebar_loading {
        return;
    }
    app.sidebar_loading = true;
    let api = app.api.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let (author, tags, article_total, category_total, publish_dates) = tokio::join!(
            api.author(),
            api.tags(),
            api.article_total(),
            api.category_total(),
            api.publish_dates(),
        );

        let data = SidebarData {
            author: author
                .map_err(|e| tracing::warn!(error = %e, "Author fetch failed"))
                .ok(),
            tags: tags
                .map_err(|e| tracing::warn!(error = %e, "Tag list fetch failed"))
                .unwrap_or_default(),
            article_total: article_total
                .map_err(|e| tracing::warn!(error = %e, "Article total fetch failed"))
                .ok(),
            category_total: category_total
                .map_err(|e| tracing::warn!(error = %e, "Category total fetch failed"))
                .ok(),
            publish_dates: publish_dates
                .map_err(|e| tracing::warn!(error = %e, "Publish dates fetch failed"))
                .unwrap_or_default(),
        };

        if tx.send(AppEvent::SidebarLoaded(Box::new(data))).await.is_err() {
            tracing::warn!("Failed to send sidebar data (receiver dropped)");
        }
    });
}

/// Spawn the about page fetch: author, mission, job experience.
pub(super) fn spawn_about_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.about_loading {
        return;
    }
    app.about_loading = true;
    let api = app.api.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let (author, mission, experiences) =
            tokio::join!(api.author(), api.mission(), api.job_experiences());

        let data = AboutData {
            author: author
                .map_err(|e| tracing::warn!(error = %e, "Author fetch failed"))
                .ok(),
            mission: mission
                .map_err(|e| tracing::warn!(error = %e, "Mission fetch failed"))
                .ok(),
            experiences: experiences
                .map_err(|e| tracing::warn!(error = %e, "Job experience fetch failed"))
                .unwrap_or_default(),
        };

        if tx.send(AppEvent::AboutLoaded(Box::new(data))).await.is_err() {
            tracing::warn!("Failed to send about data (receiver dropped)");
        }
    });
}

/// Open a backend-supplied link in the system browser, after validation.
pub(super) fn open_link(app: &mut App, raw: &str) {
    match validate_link(raw) {
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => {
                tracing::info!(url = %url, "Opened link in browser");
                app.set_status("Opened in browser");
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            }
        },
        Err(e) => {
            tracing::warn!(link = %raw, error = %e, "Refusing to open link");
            app.set_status(format!("Not opening link: {}", e));
        }
    }
}
