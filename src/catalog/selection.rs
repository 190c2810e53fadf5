//! Selection state for the category browser.
//!
//! One "selected category" slot, overwritten on every click. The breadcrumb
//! trail and the subtree filter are derived from the catalog at selection
//! time and cached here; the article query itself is issued by the caller.

use std::collections::HashSet;

use super::{CatalogError, CategoryCatalog, CategoryId};

/// Page-level category selection state.
///
/// Also tracks which nodes are folded in the tree panel. Folding is
/// presentation-only: it never affects the filter or the breadcrumb.
#[derive(Debug, Default)]
pub struct CategorySelection {
    active: Option<CategoryId>,
    trail: Vec<String>,
    filter: Vec<CategoryId>,
    collapsed: HashSet<CategoryId>,
}

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected category, if any.
    pub fn active(&self) -> Option<CategoryId> {
        self.active
    }

    /// Breadcrumb of the active selection, topmost ancestor first.
    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    /// Subtree ids of the active selection, for the article query filter.
    pub fn filter_ids(&self) -> &[CategoryId] {
        &self.filter
    }

    /// Select `id`, recomputing trail and filter from the catalog.
    ///
    /// On a cyclic parent chain the error is surfaced and the previous
    /// selection is left untouched.
    pub fn select(&mut self, id: CategoryId, catalog: &CategoryCatalog) -> Result<(), CatalogError> {
        let trail = catalog.breadcrumb(id)?;
        self.filter = catalog.subtree_ids(id);
        self.trail = trail;
        self.active = Some(id);
        Ok(())
    }

    /// Select the first top-level category, the default after a tree fetch.
    /// Returns false when the catalog is empty (nothing to select).
    pub fn select_first(&mut self, catalog: &CategoryCatalog) -> Result<bool, CatalogError> {
        match catalog.first_root().map(|c| c.category_id) {
            Some(id) => {
                self.select(id, catalog)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop the selection (no active category, empty trail and filter).
    pub fn clear(&mut self) {
        self.active = None;
        self.trail.clear();
        self.filter.clear();
    }

    /// Re-derive state against a fresh snapshot. A vanished active id
    /// clears the selection; collapsed ids not in the snapshot are pruned.
    pub fn revalidate(&mut self, catalog: &CategoryCatalog) -> Result<(), CatalogError> {
        self.collapsed.retain(|id| catalog.contains(*id));
        match self.active {
            Some(id) if catalog.contains(id) => self.select(id, catalog),
            _ => {
                self.clear();
                Ok(())
            }
        }
    }

    pub fn is_collapsed(&self, id: CategoryId) -> bool {
        self.collapsed.contains(&id)
    }

    pub fn toggle_collapsed(&mut self, id: CategoryId) {
        if !self.collapsed.remove(&id) {
            self.collapsed.insert(id);
        }
    }

    /// Fold every node that has children.
    pub fn collapse_all(&mut self, catalog: &CategoryCatalog) {
        self.collapsed = catalog
            .iter()
            .filter(|c| catalog.has_children(c.category_id))
            .map(|c| c.category_id)
            .collect();
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }
}
