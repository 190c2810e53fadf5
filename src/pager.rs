//! Client-side article list bookkeeping.
//!
//! The backend paginates; the client tracks which page it is on and how the
//! next page is applied. Two application modes exist, mirroring the two
//! navigation styles: *replace* (a fresh query or a page-button jump shows
//! exactly one page) and *append* (load-more scrolling accumulates pages).
//!
//! Append mode deduplicates by article id: when an article shifts between
//! pages server-side (a new post pushes everything down), the copy already
//! on screen wins and list order stays stable.

use std::collections::HashSet;

use crate::api::{Article, ArticleQuery, Page};
use crate::catalog::CategoryId;

/// Merge `incoming` after `existing`, dropping articles whose id is already
/// present. First occurrence wins; relative order is preserved on both
/// sides.
pub fn merge_deduplicated(existing: Vec<Article>, incoming: Vec<Article>) -> Vec<Article> {
    let mut seen: HashSet<i64> = existing.iter().map(|a| a.article_id).collect();
    let mut merged = existing;
    for article in incoming {
        if seen.insert(article.article_id) {
            merged.push(article);
        }
    }
    merged
}

/// Paged article list state for one view.
#[derive(Debug)]
pub struct ArticlePager {
    articles: Vec<Article>,
    /// 1-based page number of the most recently applied page; 0 before the
    /// first page arrives.
    current: u64,
    pages: u64,
    total: u64,
    page_size: u64,
}

impl ArticlePager {
    pub fn new(page_size: u64) -> Self {
        Self {
            articles: Vec::new(),
            current: 0,
            pages: 0,
            total: 0,
            page_size,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn current_page(&self) -> u64 {
        self.current
    }

    pub fn total_pages(&self) -> u64 {
        self.pages
    }

    pub fn total_articles(&self) -> u64 {
        self.total
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// True while pages beyond the current one exist.
    pub fn has_more(&self) -> bool {
        self.current < self.pages
    }

    /// Forget everything loaded; the next applied page starts fresh.
    pub fn reset(&mut self) {
        self.articles.clear();
        self.current = 0;
        self.pages = 0;
        self.total = 0;
    }

    /// Apply a fetched page. `append` accumulates (load-more); otherwise
    /// the page replaces the list (fresh query or page jump).
    pub fn apply(&mut self, page: Page<Article>, append: bool) {
        self.current = page.current;
        self.pages = page.pages;
        self.total = page.total;
        if append {
            self.articles = merge_deduplicated(std::mem::take(&mut self.articles), page.records);
        } else {
            self.articles = page.records;
        }
    }

    /// Query for a specific page with the given category filter.
    pub fn query_for_page(&self, page_num: u64, filter: &[CategoryId]) -> ArticleQuery {
        ArticleQuery {
            page_num: page_num.max(1),
            page_size: self.page_size,
            category_ids: filter.to_vec(),
        }
    }

    /// Query for the page after the current one, or None on the last page.
    pub fn next_page_query(&self, filter: &[CategoryId]) -> Option<ArticleQuery> {
        self.has_more()
            .then(|| self.query_for_page(self.current + 1, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, title: &str) -> Article {
        Article {
            article_id: id,
            title: title.to_string(),
            excerpt: None,
            image: None,
            content: None,
            update_time: None,
            article_category_list: Vec::new(),
        }
    }

    fn page(records: Vec<Article>, current: u64, pages: u64) -> Page<Article> {
        let total = pages * 2;
        Page {
            records,
            current,
            pages,
            total,
        }
    }

    #[test]
    fn merge_drops_duplicates_and_keeps_order() {
        let existing = vec![article(1, "a"), article(2, "b")];
        let incoming = vec![article(2, "b again"), article(3, "c")];

        let merged = merge_deduplicated(existing, incoming);
        let ids: Vec<i64> = merged.iter().map(|a| a.article_id).collect();
        assert_eq!(ids, [1, 2, 3]);
        // First occurrence wins.
        assert_eq!(merged[1].title, "b");
    }

    #[test]
    fn merge_with_empty_sides() {
        assert!(merge_deduplicated(vec![], vec![]).is_empty());
        assert_eq!(merge_deduplicated(vec![], vec![article(1, "a")]).len(), 1);
        assert_eq!(merge_deduplicated(vec![article(1, "a")], vec![]).len(), 1);
    }

    #[test]
    fn apply_replace_shows_exactly_one_page() {
        let mut pager = ArticlePager::new(4);
        pager.apply(page(vec![article(1, "a"), article(2, "b")], 1, 3), false);
        pager.apply(page(vec![article(3, "c")], 2, 3), false);

        assert_eq!(pager.len(), 1);
        assert_eq!(pager.current_page(), 2);
        assert!(pager.has_more());
    }

    #[test]
    fn apply_append_accumulates_without_duplicates() {
        let mut pager = ArticlePager::new(2);
        pager.apply(page(vec![article(1, "a"), article(2, "b")], 1, 2), false);
        // Page 2 re-serves article 2 because a new post shifted the window.
        pager.apply(page(vec![article(2, "b"), article(3, "c")], 2, 2), true);

        let ids: Vec<i64> = pager.articles().iter().map(|a| a.article_id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert!(!pager.has_more());
    }

    #[test]
    fn has_more_before_any_page() {
        let pager = ArticlePager::new(4);
        assert!(!pager.has_more());
        assert_eq!(pager.current_page(), 0);
    }

    #[test]
    fn next_page_query_walks_then_stops() {
        let mut pager = ArticlePager::new(4);
        pager.apply(page(vec![article(1, "a")], 1, 2), false);

        let q = pager.next_page_query(&[2, 3]).unwrap();
        assert_eq!(q.page_num, 2);
        assert_eq!(q.page_size, 4);
        assert_eq!(q.category_ids, [2, 3]);

        pager.apply(page(vec![article(2, "b")], 2, 2), true);
        assert!(pager.next_page_query(&[2, 3]).is_none());
    }

    #[test]
    fn reset_clears_state() {
        let mut pager = ArticlePager::new(4);
        pager.apply(page(vec![article(1, "a")], 1, 5), false);
        pager.reset();

        assert!(pager.is_empty());
        assert_eq!(pager.current_page(), 0);
        assert!(!pager.has_more());
    }
}
