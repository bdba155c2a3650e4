//! Page-set editing for a single file.
//!
//! The range string is the only source of truth. Every edit derives the
//! current selection from it, changes that list, and formats it back into a
//! new range string for the caller to store. The editor itself only keeps
//! where removed pages used to sit, so that adding one back restores its old
//! position.

use std::collections::HashMap;

use crate::range::{format_page_list, parse_range};

/// Partition of a file's pages into selected and excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    /// Selected pages in output order.
    pub selected: Vec<usize>,
    /// Remaining pages in ascending order.
    pub excluded: Vec<usize>,
}

impl PageSelection {
    /// Derive the selection from a range string.
    pub fn derive(range: &str, page_count: usize) -> Self {
        let selected = parse_range(range, page_count);
        let excluded = (0..page_count)
            .filter(|page| !selected.contains(page))
            .collect();
        Self { selected, excluded }
    }
}

/// Editor state for one file's page grid.
///
/// Dropping the editor forgets the removal history.
#[derive(Debug, Clone, Default)]
pub struct PageSetEditor {
    removal_history: HashMap<usize, usize>,
}

impl PageSetEditor {
    /// Create an editor with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `moved` to the slot currently held by `target`.
    ///
    /// Returns the new range string, or `None` if nothing changes.
    pub fn reorder(
        &self,
        range: &str,
        page_count: usize,
        moved: usize,
        target: usize,
    ) -> Option<String> {
        if moved == target {
            return None;
        }

        let mut selected = parse_range(range, page_count);
        let from = selected.iter().position(|&page| page == moved)?;
        let to = selected.iter().position(|&page| page == target)?;

        let page = selected.remove(from);
        selected.insert(to, page);
        Some(format_page_list(&selected))
    }

    /// Drop `page` from the selection, remembering where it was.
    ///
    /// Removing the only selected page yields `""`, which selects every page
    /// again.
    pub fn remove(&mut self, range: &str, page_count: usize, page: usize) -> Option<String> {
        let mut selected = parse_range(range, page_count);
        let position = selected.iter().position(|&p| p == page)?;

        self.removal_history.insert(page, position);
        selected.remove(position);
        Some(format_page_list(&selected))
    }

    /// Put an excluded page back into the selection.
    ///
    /// The page goes back to the position it was removed from, clamped to the
    /// current length, or to the end if it was never removed here.
    pub fn add(&self, range: &str, page_count: usize, page: usize) -> Option<String> {
        if page >= page_count {
            return None;
        }

        let mut selected = parse_range(range, page_count);
        if selected.contains(&page) {
            return None;
        }

        let position = self
            .removal_history
            .get(&page)
            .map_or(selected.len(), |&remembered| remembered.min(selected.len()));
        selected.insert(position, page);
        Some(format_page_list(&selected))
    }

    /// Position `page` was last removed from, if any.
    pub fn remembered_position(&self, page: usize) -> Option<usize> {
        self.removal_history.get(&page).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derive_partitions_pages() {
        let selection = PageSelection::derive("4, 2", 5);
        assert_eq!(selection.selected, vec![3, 1]);
        assert_eq!(selection.excluded, vec![0, 2, 4]);

        let all = PageSelection::derive("", 3);
        assert_eq!(all.selected, vec![0, 1, 2]);
        assert!(all.excluded.is_empty());
    }

    #[test]
    fn test_reorder_moves_like_array_move() {
        let editor = PageSetEditor::new();
        assert_eq!(editor.reorder("", 4, 0, 2).as_deref(), Some("2, 3, 1, 4"));
        assert_eq!(editor.reorder("", 4, 3, 0).as_deref(), Some("4, 1, 2, 3"));
    }

    #[test]
    fn test_reorder_noops() {
        let editor = PageSetEditor::new();
        assert_eq!(editor.reorder("1-3", 5, 1, 1), None);
        assert_eq!(editor.reorder("1-3", 5, 4, 0), None);
        assert_eq!(editor.reorder("1-3", 5, 0, 4), None);
    }

    #[test]
    fn test_remove_then_add_restores_position() {
        let mut editor = PageSetEditor::new();
        let range = editor.remove("", 5, 2).unwrap();
        assert_eq!(range, "1, 2, 4, 5");
        assert_eq!(editor.remembered_position(2), Some(2));

        let range = editor.add(&range, 5, 2).unwrap();
        assert_eq!(range, "1, 2, 3, 4, 5");
    }

    #[test]
    fn test_add_clamps_remembered_position() {
        let mut editor = PageSetEditor::new();
        let range = editor.remove("1-5", 5, 4).unwrap();
        assert_eq!(editor.remembered_position(4), Some(4));

        let range = editor.remove(&range, 5, 0).unwrap();
        let range = editor.remove(&range, 5, 1).unwrap();
        assert_eq!(range, "3, 4");

        assert_eq!(editor.add(&range, 5, 4).as_deref(), Some("3, 4, 5"));
    }

    #[test]
    fn test_add_without_history_appends() {
        let editor = PageSetEditor::new();
        assert_eq!(editor.add("3, 1", 4, 1).as_deref(), Some("3, 1, 2"));
    }

    #[test]
    fn test_add_rejects_selected_or_out_of_bounds() {
        let editor = PageSetEditor::new();
        assert_eq!(editor.add("1, 2", 4, 0), None);
        assert_eq!(editor.add("1, 2", 4, 4), None);
    }

    #[test]
    fn test_remove_unselected_page_is_noop() {
        let mut editor = PageSetEditor::new();
        assert_eq!(editor.remove("1, 2", 4, 3), None);
        assert_eq!(editor.remembered_position(3), None);
    }

    #[test]
    fn test_removing_last_page_selects_all_again() {
        let mut editor = PageSetEditor::new();
        let range = editor.remove("2", 3, 1).unwrap();
        assert_eq!(range, "");
        assert_eq!(PageSelection::derive(&range, 3).selected, vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_keeps_excluded() {
        let editor = PageSetEditor::new();
        let range = editor.reorder("1, 3, 5", 6, 4, 0).unwrap();
        let selection = PageSelection::derive(&range, 6);
        assert_eq!(selection.selected, vec![4, 0, 2]);
        assert_eq!(selection.excluded, vec![1, 3, 5]);
    }
}
