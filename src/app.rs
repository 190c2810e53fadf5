//! Central application state.
//!
//! `App` owns everything the event loop reads and mutates: the API client,
//! the category catalog and its selection, the paged article list, reader
//! content, sidebar/about data, and the status line. Background fetches
//! communicate back through [`AppEvent`].

use std::borrow::Cow;
use std::num::NonZeroUsize;

use lru::LruCache;
use ratatui::style::Style;
use ratatui::text::Line;
use tokio::time::Instant;

use crate::api::{ApiClient, Article, Author, CategoryNode, JobExperience, Mission, Page, Tag};
use crate::catalog::{CatalogError, CategoryCatalog, CategoryId, CategorySelection};
use crate::pager::ArticlePager;
use crate::theme::{StyleMap, ThemeVariant};

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Capacity of the recently-read article cache. Full articles with
/// markdown bodies; 64 is several sessions of reading.
const ARTICLE_CACHE_CAPACITY: usize = 64;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode, mirroring the blog's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Article feed with the author/tags sidebar.
    Home,
    /// Category tree, breadcrumb, and filtered article list.
    Categories,
    /// Full-screen article reader.
    Reader,
    /// Author, mission, and job experience.
    About,
}

/// Which panel has focus in the Categories view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Articles,
}

// ============================================================================
// Category Tree Rows
// ============================================================================

/// One visible row of the category tree panel.
///
/// Derived from the catalog plus the selection's fold state; collapsed
/// nodes hide their subtree.
#[derive(Debug, Clone)]
pub struct TreeRow {
    pub category_id: CategoryId,
    pub name: String,
    /// Nesting depth (0 = top-level).
    pub depth: usize,
    pub article_total: i64,
    pub has_children: bool,
    pub is_collapsed: bool,
}

// ============================================================================
// Content and Event Types
// ============================================================================

/// Content loading state for the article reader.
#[derive(Debug, Clone)]
pub enum ContentState {
    Idle,
    Loading {
        article_id: i64,
    },
    Loaded {
        article_id: i64,
        /// Markdown pre-rendered to styled lines; cached so scrolling
        /// never re-parses.
        rendered_lines: Vec<Line<'static>>,
    },
    Failed {
        article_id: i64,
        error: String,
        /// Excerpt shown when the full body cannot be fetched.
        fallback: Option<String>,
    },
}

/// Data for the home view's sidebar. Every field is independently
/// optional: one failing endpoint degrades its card, not the whole bar.
#[derive(Debug, Clone, Default)]
pub struct SidebarData {
    pub author: Option<Author>,
    pub tags: Vec<Tag>,
    pub article_total: Option<u64>,
    pub category_total: Option<u64>,
    pub publish_dates: Vec<chrono::NaiveDate>,
}

/// Data for the about view.
#[derive(Debug, Clone, Default)]
pub struct AboutData {
    pub author: Option<Author>,
    pub mission: Option<Mission>,
    pub experiences: Vec<JobExperience>,
}

/// Events sent from background tasks back to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Category tree fetch finished.
    CategoriesLoaded {
        result: Result<Vec<CategoryNode>, String>,
    },
    /// One article page arrived.
    ///
    /// `generation` is compared against the current page generation;
    /// results from superseded queries are discarded (last selection
    /// wins). `append` selects accumulate vs replace.
    ArticlesLoaded {
        generation: u64,
        append: bool,
        result: Result<Page<Article>, String>,
    },
    /// Article detail for the reader arrived.
    ArticleLoaded {
        article_id: i64,
        generation: u64,
        /// True when served from the in-memory cache (no network).
        cached: bool,
        result: Result<Article, String>,
    },
    /// Home sidebar data arrived (already degraded per-field).
    SidebarLoaded(Box<SidebarData>),
    /// About page data arrived.
    AboutLoaded(Box<AboutData>),
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
pub struct App {
    pub api: ApiClient,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    // Navigation
    pub view: View,
    pub focus: Focus,
    /// View to return to when leaving the reader.
    pub reader_return: View,

    // Categories
    /// Root id of the category tree, from config. The backend's synthetic
    /// root; never rendered.
    pub root_category_id: CategoryId,
    /// Catalog of the most recent tree snapshot. Empty both before the
    /// first fetch and for a blog with no categories; `categories_loaded`
    /// tells the two apart so the UI can show "loading" vs "none".
    pub catalog: CategoryCatalog,
    pub categories_loaded: bool,
    pub selection: CategorySelection,
    /// Cursor row in the visible tree.
    pub tree_cursor: usize,
    /// Cached visible rows; invalidated on snapshot, selection, or fold
    /// changes.
    cached_tree_rows: Option<Vec<TreeRow>>,

    // Articles
    pub pager: ArticlePager,
    pub selected_article: usize,
    pub articles_loading: bool,
    /// Generation of the newest article-page query. Stale completions are
    /// dropped by the event handler.
    pub page_generation: u64,
    pub page_load_handle: Option<tokio::task::JoinHandle<()>>,

    // Reader
    pub content_state: ContentState,
    pub reader_article: Option<Article>,
    pub scroll_offset: usize,
    /// Viewport height from the last render, for scroll clamping.
    pub reader_visible_lines: usize,
    pub content_generation: u64,
    pub content_load_handle: Option<tokio::task::JoinHandle<()>>,
    /// Recently read articles, keyed by id, with full bodies.
    pub article_cache: LruCache<i64, Article>,

    // Sidebar / about
    pub sidebar: SidebarData,
    pub sidebar_loading: bool,
    pub about: AboutData,
    pub about_loading: bool,
    /// Scroll offset of the about page.
    pub about_scroll: usize,

    // Chrome
    /// Status message with its creation time; expires after 3 seconds.
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,
    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,
}

impl App {
    pub fn new(api: ApiClient, theme_variant: ThemeVariant, page_size: u64) -> Self {
        Self {
            api,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            view: View::Home,
            focus: Focus::Tree,
            reader_return: View::Home,
            root_category_id: crate::catalog::ROOT_CATEGORY_ID,
            catalog: CategoryCatalog::default(),
            categories_loaded: false,
            selection: CategorySelection::new(),
            tree_cursor: 0,
            cached_tree_rows: None,
            pager: ArticlePager::new(page_size),
            selected_article: 0,
            articles_loading: false,
            page_generation: 0,
            page_load_handle: None,
            content_state: ContentState::Idle,
            reader_article: None,
            scroll_offset: 0,
            reader_visible_lines: 0,
            content_generation: 0,
            content_load_handle: None,
            article_cache: LruCache::new(
                NonZeroUsize::new(ARTICLE_CACHE_CAPACITY).expect("capacity is non-zero"),
            ),
            sidebar: SidebarData::default(),
            sidebar_loading: false,
            about: AboutData::default(),
            about_loading: false,
            about_scroll: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
        }
    }

    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant, returning its name for the status
    /// line.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------

    /// Set a status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if expired. Returns true if one was
    /// cleared (the caller schedules a redraw).
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Category tree
    // ------------------------------------------------------------------

    /// Install a freshly fetched tree snapshot.
    ///
    /// Re-derives the selection against it (defaulting to the first
    /// top-level category, like the web UI) and resets the article list,
    /// whose filter may have changed meaning.
    pub fn apply_category_snapshot(&mut self, tree: &[CategoryNode]) -> Result<(), CatalogError> {
        self.catalog = CategoryCatalog::from_tree(tree);
        self.categories_loaded = true;
        self.invalidate_tree_rows();

        self.selection.revalidate(&self.catalog)?;
        if self.selection.active().is_none() {
            self.selection.select_first(&self.catalog)?;
        }
        self.pager.reset();
        self.selected_article = 0;
        self.clamp_tree_cursor();
        Ok(())
    }

    /// Visible tree rows, rebuilt on demand after invalidation.
    pub fn tree_rows(&mut self) -> &[TreeRow] {
        if self.cached_tree_rows.is_none() {
            self.cached_tree_rows = Some(self.build_tree_rows());
        }
        self.cached_tree_rows.as_deref().unwrap_or(&[])
    }

    /// Read-only access for render functions, rebuilding if needed.
    pub fn tree_rows_for_render(&self) -> Cow<'_, [TreeRow]> {
        match &self.cached_tree_rows {
            Some(rows) => Cow::Borrowed(rows),
            None => Cow::Owned(self.build_tree_rows()),
        }
    }

    fn build_tree_rows(&self) -> Vec<TreeRow> {
        fn push_subtree(
            catalog: &CategoryCatalog,
            selection: &CategorySelection,
            id: CategoryId,
            depth: usize,
            rows: &mut Vec<TreeRow>,
        ) {
            let Some(cat) = catalog.get(id) else { return };
            let has_children = catalog.has_children(id);
            let is_collapsed = selection.is_collapsed(id);
            rows.push(TreeRow {
                category_id: id,
                name: cat.name.clone(),
                depth,
                article_total: cat.article_total,
                has_children,
                is_collapsed,
            });
            if has_children && !is_collapsed {
                for &child in catalog.children_of(id) {
                    push_subtree(catalog, selection, child, depth + 1, rows);
                }
            }
        }

        let mut rows = Vec::with_capacity(self.catalog.len());
        let roots: Vec<CategoryId> = self.catalog.roots().map(|c| c.category_id).collect();
        for id in roots {
            push_subtree(&self.catalog, &self.selection, id, 0, &mut rows);
        }
        rows
    }

    /// Invalidate the cached rows after any snapshot/selection/fold change.
    pub fn invalidate_tree_rows(&mut self) {
        self.cached_tree_rows = None;
    }

    pub fn clamp_tree_cursor(&mut self) {
        let len = self.tree_rows().len();
        if len == 0 {
            self.tree_cursor = 0;
        } else if self.tree_cursor >= len {
            self.tree_cursor = len - 1;
        }
    }

    /// Category id under the tree cursor.
    pub fn tree_cursor_category(&mut self) -> Option<CategoryId> {
        let idx = self.tree_cursor;
        self.tree_rows().get(idx).map(|r| r.category_id)
    }

    /// Move the tree cursor to the active selection's row, if visible.
    pub fn align_tree_cursor_to_selection(&mut self) {
        if let Some(active) = self.selection.active() {
            if let Some(idx) = self
                .tree_rows()
                .iter()
                .position(|r| r.category_id == active)
            {
                self.tree_cursor = idx;
            }
        }
    }

    // ------------------------------------------------------------------
    // Articles
    // ------------------------------------------------------------------

    pub fn clamp_selected_article(&mut self) {
        let len = self.pager.len();
        if len == 0 {
            self.selected_article = 0;
        } else if self.selected_article >= len {
            self.selected_article = len - 1;
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.pager.get(self.selected_article)
    }

    /// Bump the page generation, abort the superseded fetch, and mark the
    /// list as loading. Returns the new generation for the spawned task.
    pub fn begin_page_load(&mut self) -> u64 {
        if let Some(handle) = self.page_load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted superseded article page load");
        }
        self.page_generation = self.page_generation.wrapping_add(1);
        self.articles_loading = true;
        self.page_generation
    }

    // ------------------------------------------------------------------
    // Reader
    // ------------------------------------------------------------------

    /// Enter the reader for an article summary, remembering where to
    /// return. Content loading is started separately by the caller.
    pub fn enter_reader(&mut self, article: Article) {
        self.reader_return = self.view;
        self.view = View::Reader;
        self.scroll_offset = 0;
        self.reader_article = Some(article);
        self.content_state = ContentState::Idle;
    }

    /// Leave the reader, aborting any in-flight content load.
    pub fn exit_reader(&mut self) {
        if let Some(handle) = self.content_load_handle.take() {
            handle.abort();
        }
        self.view = self.reader_return;
        self.reader_article = None;
        self.content_state = ContentState::Idle;
        self.scroll_offset = 0;
    }

    /// Bump the content generation and abort the superseded load.
    pub fn begin_content_load(&mut self) -> u64 {
        if let Some(handle) = self.content_load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted superseded article content load");
        }
        self.content_generation = self.content_generation.wrapping_add(1);
        self.content_generation
    }

    /// Clamp reader scroll to the rendered content length.
    pub fn clamp_reader_scroll(&mut self) {
        let total = match &self.content_state {
            ContentState::Loaded { rendered_lines, .. } => rendered_lines.len(),
            _ => 0,
        };
        let max = total
            .saturating_sub(self.reader_visible_lines)
            .min(MAX_SCROLL);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ROOT_CATEGORY_ID;

    fn node(
        id: CategoryId,
        parent: CategoryId,
        name: &str,
        children: Vec<CategoryNode>,
    ) -> CategoryNode {
        CategoryNode {
            category_id: id,
            category_name: name.to_string(),
            parent_id: parent,
            icon_class: String::new(),
            article_total: 0,
            children,
        }
    }

    fn sample_tree() -> Vec<CategoryNode> {
        vec![
            node(
                2,
                ROOT_CATEGORY_ID,
                "Tech",
                vec![
                    node(3, 2, "Frontend", vec![node(5, 3, "React", vec![])]),
                    node(4, 2, "Backend", vec![]),
                ],
            ),
            node(6, ROOT_CATEGORY_ID, "Life", vec![]),
        ]
    }

    fn test_app() -> App {
        let api = ApiClient::new("https://blog.example.com/api", None).unwrap();
        App::new(api, ThemeVariant::Dark, 8)
    }

    #[test]
    fn snapshot_selects_first_root_by_default() {
        let mut app = test_app();
        app.apply_category_snapshot(&sample_tree()).unwrap();

        assert!(app.categories_loaded);
        assert_eq!(app.selection.active(), Some(2));
        assert_eq!(app.selection.trail(), ["Tech"]);
        assert_eq!(app.selection.filter_ids(), [2, 3, 5, 4]);
    }

    #[test]
    fn tree_rows_follow_preorder_with_depth() {
        let mut app = test_app();
        app.apply_category_snapshot(&sample_tree()).unwrap();

        let rows = app.tree_rows().to_vec();
        let names: Vec<(&str, usize)> =
            rows.iter().map(|r| (r.name.as_str(), r.depth)).collect();
        assert_eq!(
            names,
            [
                ("Tech", 0),
                ("Frontend", 1),
                ("React", 2),
                ("Backend", 1),
                ("Life", 0)
            ]
        );
    }

    #[test]
    fn collapsed_node_hides_its_subtree() {
        let mut app = test_app();
        app.apply_category_snapshot(&sample_tree()).unwrap();

        app.selection.toggle_collapsed(3);
        app.invalidate_tree_rows();

        let names: Vec<String> = app.tree_rows().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, ["Tech", "Frontend", "Backend", "Life"]);
        // The folded node still reports its fold state for the marker.
        assert!(app.tree_rows().iter().any(|r| r.name == "Frontend" && r.is_collapsed));
    }

    #[test]
    fn tree_cursor_clamps_after_fold() {
        let mut app = test_app();
        app.apply_category_snapshot(&sample_tree()).unwrap();

        app.tree_cursor = 4; // "Life"
        app.selection.collapse_all(&app.catalog);
        app.invalidate_tree_rows();
        app.clamp_tree_cursor();

        // Visible rows are now [Tech, Life]
        assert_eq!(app.tree_rows().len(), 2);
        assert!(app.tree_cursor < 2);
    }

    #[test]
    fn refetch_preserves_surviving_selection() {
        let mut app = test_app();
        app.apply_category_snapshot(&sample_tree()).unwrap();
        app.selection.select(4, &app.catalog).unwrap();

        // New snapshot still contains id 4.
        app.apply_category_snapshot(&sample_tree()).unwrap();
        assert_eq!(app.selection.active(), Some(4));
        assert_eq!(app.selection.trail(), ["Tech", "Backend"]);
    }

    #[test]
    fn generation_bumps_are_monotonic() {
        let mut app = test_app();
        let g1 = app.begin_page_load();
        let g2 = app.begin_page_load();
        assert!(g2 > g1);
        assert!(app.articles_loading);

        let c1 = app.begin_content_load();
        let c2 = app.begin_content_load();
        assert!(c2 > c1);
    }

    #[test]
    fn reader_round_trip_restores_view() {
        let mut app = test_app();
        app.view = View::Categories;

        let article = Article {
            article_id: 1,
            title: "t".into(),
            excerpt: None,
            image: None,
            content: None,
            update_time: None,
            article_category_list: vec![],
        };
        app.enter_reader(article);
        assert_eq!(app.view, View::Reader);

        app.exit_reader();
        assert_eq!(app.view, View::Categories);
        assert!(app.reader_article.is_none());
    }

    #[test]
    fn reader_scroll_clamps_to_content() {
        let mut app = test_app();
        app.content_state = ContentState::Loaded {
            article_id: 1,
            rendered_lines: vec![Line::from(""); 10],
        };
        app.reader_visible_lines = 4;
        app.scroll_offset = 100;
        app.clamp_reader_scroll();
        assert_eq!(app.scroll_offset, 6);
    }

    #[test]
    fn status_expiry() {
        let mut app = test_app();
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());
    }
}
