// ── Page-scoped selection ──

use indexmap::IndexSet;

use crate::model::EntityId;

/// Selected rows of the current page.
///
/// Invariant: `selected ⊆ known`, where `known` is the id set of the last
/// applied page. Ids that are not on the page cannot be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    known: IndexSet<EntityId>,
    selected: IndexSet<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one id. Returns whether it is now selected; ids not on the
    /// current page are ignored and report `false`.
    pub fn toggle(&mut self, id: &EntityId) -> bool {
        if !self.known.contains(id) {
            return false;
        }
        if self.selected.shift_remove(id) {
            false
        } else {
            self.selected.insert(id.clone());
            true
        }
    }

    /// Clear if everything on the page is selected, else select the page.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected.clone_from(&self.known);
        }
    }

    pub fn is_all_selected(&self) -> bool {
        !self.known.is_empty() && self.selected.len() == self.known.len()
    }

    /// Adopt a new page's ids, pruning selections that are no longer on it.
    pub fn sync(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.known = ids.into_iter().collect();
        let known = &self.known;
        self.selected.retain(|id| known.contains(id));
    }

    pub fn remove(&mut self, ids: &[EntityId]) {
        for id in ids {
            self.selected.shift_remove(id);
        }
    }

    /// Selected ids in page order.
    pub fn selected(&self) -> Vec<EntityId> {
        self.known
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[u64]) -> Selection {
        let mut selection = Selection::new();
        selection.sync(ids.iter().copied().map(EntityId::from));
        selection
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let mut selection = page(&[1, 2, 3]);

        selection.toggle_all();
        assert_eq!(selection.len(), 3);
        assert!(selection.is_all_selected());

        selection.toggle_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_all_from_partial_selects_everything() {
        let mut selection = page(&[1, 2, 3]);
        selection.toggle(&EntityId::from(2));

        selection.toggle_all();
        assert_eq!(
            selection.selected(),
            vec![EntityId::from(1), EntityId::from(2), EntityId::from(3)]
        );
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut selection = page(&[1, 2]);
        assert!(!selection.toggle(&EntityId::from(99)));
        assert!(selection.is_empty());
    }

    #[test]
    fn sync_prunes_stale_ids() {
        let mut selection = page(&[1, 2, 3]);
        selection.toggle_all();

        selection.sync([EntityId::from(2), EntityId::from(4)]);
        assert_eq!(selection.selected(), vec![EntityId::from(2)]);
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        let mut selection = page(&[]);
        selection.toggle_all();
        assert!(!selection.is_all_selected());
        assert!(selection.is_empty());
    }
}
