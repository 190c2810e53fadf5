//! Entity shapes as the backend serializes them.
//!
//! Field names are camelCase on the wire; every struct derives
//! `Deserialize` with `rename_all` so the Rust side stays snake_case.
//! Optional and defaulted fields reflect what the backend actually omits:
//! leaf categories arrive without `children`, list wrappers without
//! `records` when empty.

use serde::Deserialize;

use crate::catalog::CategoryId;

// ============================================================================
// Response envelope and pagination
// ============================================================================

/// The backend's uniform response wrapper.
///
/// `code == 0` is success; any other code carries a human-readable
/// `message`. `data` is absent on errors and on empty results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// One page of a paginated list query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub records: Vec<T>,
    /// 1-based page number of this page.
    pub current: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Total number of records across all pages.
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    /// True when pages beyond this one exist.
    pub fn has_more(&self) -> bool {
        self.current < self.pages
    }
}

// ============================================================================
// Articles
// ============================================================================

/// Reference to a category an article belongs to (id + label only).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// An article, in both its list form (no `content`) and detail form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub article_id: i64,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Cover image URL, if the article has one.
    #[serde(default)]
    pub image: Option<String>,
    /// Markdown body; only populated by the detail endpoint.
    #[serde(default)]
    pub content: Option<String>,
    /// "YYYY-MM-DD HH:MM:SS" as the backend formats it.
    #[serde(default)]
    pub update_time: Option<String>,
    #[serde(default)]
    pub article_category_list: Vec<CategoryRef>,
}

impl Article {
    /// The date part of `update_time`, for list rows.
    pub fn update_date(&self) -> Option<&str> {
        self.update_time
            .as_deref()
            .map(|t| t.split_whitespace().next().unwrap_or(t))
    }
}

/// Query parameters for the paginated article endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    /// 1-based page number.
    pub page_num: u64,
    pub page_size: u64,
    /// Category filter: the selected category's subtree ids. Empty means
    /// no filter (home feed).
    pub category_ids: Vec<CategoryId>,
}

impl ArticleQuery {
    pub fn first_page(page_size: u64) -> Self {
        Self {
            page_num: 1,
            page_size,
            category_ids: Vec::new(),
        }
    }
}

// ============================================================================
// Sidebar and about-page entities
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_id: i64,
    pub tag_name: String,
    #[serde(default)]
    pub article_total: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub author_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// "YYYY-MM-DD"; used to derive the author's age on the about page.
    #[serde(default)]
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionPoint {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_class: Option<String>,
}

/// The blog's mission statement with its bullet points.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    #[serde(default)]
    pub statement: Option<String>,
    #[serde(default)]
    pub mission_point_list: Vec<MissionPoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExperience {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achievement_list: Vec<Achievement>,
}

// ============================================================================
// Categories
// ============================================================================

/// A node of the nested category tree as fetched from the backend.
///
/// `children` is ordered and empty for leaves (the backend omits the field
/// entirely for them). Projections into flat/breadcrumb/subtree forms live
/// in [`crate::catalog`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub category_id: CategoryId,
    pub category_name: String,
    pub parent_id: CategoryId,
    #[serde(default)]
    pub icon_class: String,
    #[serde(default)]
    pub article_total: i64,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_category_tree_with_missing_children() {
        let json = r#"{
            "categoryId": 2, "categoryName": "Tech", "parentId": 1,
            "iconClass": "icon-code", "articleTotal": 12,
            "children": [
                {"categoryId": 3, "categoryName": "Frontend", "parentId": 2}
            ]
        }"#;
        let node: CategoryNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.category_name, "Tech");
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].children.is_empty());
        assert_eq!(node.children[0].article_total, 0);
    }

    #[test]
    fn decode_article_list_row() {
        let json = r#"{
            "articleId": 7, "title": "Borrow checker field notes",
            "excerpt": "Things the compiler taught me",
            "image": "https://img.example.com/7.webp",
            "updateTime": "2025-05-06 01:42:09",
            "articleCategoryList": [
                {"categoryId": 3, "categoryName": "Frontend"}
            ]
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.article_id, 7);
        assert!(article.content.is_none());
        assert_eq!(article.update_date(), Some("2025-05-06"));
        assert_eq!(article.article_category_list[0].category_name, "Frontend");
    }

    #[test]
    fn decode_envelope_error_without_data() {
        let json = r#"{"code": 50012, "message": "article not found"}"#;
        let env: ApiEnvelope<Article> = serde_json::from_str(json).unwrap();
        assert_eq!(env.code, 50012);
        assert_eq!(env.message.as_deref(), Some("article not found"));
        assert!(env.data.is_none());
    }

    #[test]
    fn page_has_more() {
        let json = r#"{"records": [], "current": 2, "pages": 5, "total": 18}"#;
        let page: Page<Article> = serde_json::from_str(json).unwrap();
        assert!(page.has_more());

        let json = r#"{"current": 5, "pages": 5}"#;
        let last: Page<Article> = serde_json::from_str(json).unwrap();
        assert!(!last.has_more());
        assert!(last.records.is_empty());
    }
}
