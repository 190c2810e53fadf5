//! Integration tests for the category browsing flow: project the fetched
//! tree, select categories, derive breadcrumb + filter, and page articles
//! through the filter.
//!
//! These tests exercise the pure core end-to-end the way the UI drives it,
//! with hand-built trees instead of a live backend.

use plume::api::{Article, CategoryNode, Page};
use plume::catalog::{
    breadcrumb, collect_subtree_ids, flatten, CatalogError, CategoryCatalog, CategoryId,
    CategorySelection, ROOT_CATEGORY_ID,
};
use plume::pager::ArticlePager;
use pretty_assertions::assert_eq;

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
        icon_class: format!("icon-{}", id),
        article_total: 0,
        children,
    }
}

fn article(id: i64) -> Article {
    Article {
        article_id: id,
        title: format!("Article {}", id),
        excerpt: None,
        image: None,
        content: None,
        update_time: Some("2025-05-06 01:42:09".to_string()),
        article_category_list: Vec::new(),
    }
}

/// Tech(2) -> [Frontend(3) -> [React(5)], Backend(4)], plus Life(6).
fn blog_tree() -> Vec<CategoryNode> {
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

// ============================================================================
// Projection: the worked scenario
// ============================================================================

#[test]
fn worked_scenario_flatten_path_and_subtree() {
    let tree = blog_tree();

    let flat = flatten(&tree[..1]);
    let names: Vec<&str> = flat.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Tech", "Frontend", "React", "Backend"]);

    let react = flat.iter().find(|c| c.name == "React").unwrap();
    assert_eq!(
        breadcrumb(&flat, react).unwrap(),
        vec!["Tech", "Frontend", "React"]
    );

    let mut tech_ids = collect_subtree_ids(&tree[0]);
    tech_ids.sort_unstable();
    assert_eq!(tech_ids, [2, 3, 4, 5]);

    let backend = &tree[0].children[1];
    assert_eq!(collect_subtree_ids(backend), [4]);
}

#[test]
fn flat_list_carries_no_nesting_but_keeps_backlinks() {
    let flat = flatten(&blog_tree());
    // Every node is reachable by id, and every parent link resolves within
    // the list (or points at the synthetic root).
    for cat in &flat {
        let parent_known = cat.parent_id == ROOT_CATEGORY_ID
            || flat.iter().any(|c| c.category_id == cat.parent_id);
        assert!(parent_known, "dangling parent for {}", cat.name);
    }
}

// ============================================================================
// Selection flow: click-through as the category page drives it
// ============================================================================

#[test]
fn click_flow_select_filter_and_breadcrumb() {
    let catalog = CategoryCatalog::from_tree(&blog_tree());
    let mut selection = CategorySelection::new();

    // Landing on the page activates the first top-level category.
    assert!(selection.select_first(&catalog).unwrap());
    assert_eq!(selection.active(), Some(2));
    assert_eq!(selection.trail(), ["Tech"]);
    assert_eq!(selection.filter_ids(), [2, 3, 5, 4]);

    // Click "Frontend": breadcrumb and filter both narrow.
    selection.select(3, &catalog).unwrap();
    assert_eq!(selection.trail(), ["Tech", "Frontend"]);
    assert_eq!(selection.filter_ids(), [3, 5]);

    // Click "Life": a sibling tree, single-element path.
    selection.select(6, &catalog).unwrap();
    assert_eq!(selection.trail(), ["Life"]);
    assert_eq!(selection.filter_ids(), [6]);
}

#[test]
fn filter_is_equivalent_between_nested_and_indexed_forms() {
    let tree = blog_tree();
    let catalog = CategoryCatalog::from_tree(&tree);

    // The nested-form collection and the flat-form (grouped by parent_id)
    // collection agree for every node.
    fn walk(nodes: &[CategoryNode], catalog: &CategoryCatalog) {
        for n in nodes {
            assert_eq!(collect_subtree_ids(n), catalog.subtree_ids(n.category_id));
            walk(&n.children, catalog);
        }
    }
    walk(&tree, &catalog);
}

#[test]
fn cyclic_snapshot_is_reported_not_hung() {
    // Corrupt snapshot: 10 <-> 11 parent cycle, plus a healthy node.
    let a = node(10, 11, "A", vec![]);
    let b = node(11, 10, "B", vec![]);
    let healthy = node(12, ROOT_CATEGORY_ID, "C", vec![]);

    let catalog = CategoryCatalog::from_tree(&[a, b, healthy]);
    let mut selection = CategorySelection::new();

    let err = selection.select(10, &catalog).unwrap_err();
    assert_eq!(err, CatalogError::ParentCycle { id: 10 });
    // The failed select left no partial state behind.
    assert_eq!(selection.active(), None);

    // Healthy nodes keep working against the same snapshot.
    selection.select(12, &catalog).unwrap();
    assert_eq!(selection.trail(), ["C"]);
}

#[test]
fn empty_tree_degrades_to_empty_everything() {
    let catalog = CategoryCatalog::from_tree(&[]);
    let mut selection = CategorySelection::new();

    assert!(flatten(&[]).is_empty());
    assert!(!selection.select_first(&catalog).unwrap());
    assert!(selection.trail().is_empty());
    assert!(selection.filter_ids().is_empty());
}

// ============================================================================
// Paging through a selection
// ============================================================================

#[test]
fn selection_change_resets_paging() {
    let catalog = CategoryCatalog::from_tree(&blog_tree());
    let mut selection = CategorySelection::new();
    let mut pager = ArticlePager::new(2);

    selection.select(2, &catalog).unwrap();
    let q1 = pager.query_for_page(1, selection.filter_ids());
    assert_eq!(q1.category_ids, [2, 3, 5, 4]);

    pager.apply(
        Page {
            records: vec![article(1), article(2)],
            current: 1,
            pages: 3,
            total: 6,
        },
        false,
    );
    assert!(pager.has_more());

    // New selection: the page state starts over with the new filter.
    selection.select(4, &catalog).unwrap();
    pager.reset();
    let q2 = pager.next_page_query(selection.filter_ids());
    assert!(q2.is_none(), "no pages known yet after reset");
    let q2 = pager.query_for_page(1, selection.filter_ids());
    assert_eq!(q2.category_ids, [4]);
    assert_eq!(q2.page_num, 1);
}

#[test]
fn load_more_accumulates_deduplicated() {
    let mut pager = ArticlePager::new(2);

    pager.apply(
        Page {
            records: vec![article(1), article(2)],
            current: 1,
            pages: 2,
            total: 3,
        },
        false,
    );
    // Server shifted: page 2 repeats article 2.
    pager.apply(
        Page {
            records: vec![article(2), article(3)],
            current: 2,
            pages: 2,
            total: 3,
        },
        true,
    );

    let ids: Vec<i64> = pager.articles().iter().map(|a| a.article_id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert!(!pager.has_more());
}
