// ── Resource query state ──

use crate::model::{Criteria, ListQuery};

/// Page plus filter/search payload for one list screen.
///
/// Any change to the payload resets the page to 1; re-applying an equal
/// payload leaves the page alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    per_page: u32,
    criteria: Criteria,
}

impl QueryState {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            criteria: Criteria::default(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Set (or clear, on blank) one filter. Returns whether the payload changed.
    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        let mut next = self.criteria.clone();
        next.set_filter(key, value);
        self.set_criteria(next)
    }

    pub fn clear_filters(&mut self) -> bool {
        let mut next = Criteria::default();
        if let Some(search) = self.criteria.search() {
            next.set_search(search);
        }
        self.set_criteria(next)
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        let mut next = self.criteria.clone();
        next.set_search(search);
        self.set_criteria(next)
    }

    pub fn set_criteria(&mut self, criteria: Criteria) -> bool {
        if criteria == self.criteria {
            return false;
        }
        self.criteria = criteria;
        self.page = 1;
        true
    }

    /// Returns whether the page changed.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn query(&self) -> ListQuery {
        ListQuery::new(self.page, self.per_page, self.criteria.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_change_resets_page() {
        let mut state = QueryState::new(10);
        state.set_page(4);

        assert!(state.set_filter("status", "active"));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn equal_payload_keeps_page() {
        let mut state = QueryState::new(10);
        state.set_filter("status", "active");
        state.set_page(3);

        assert!(!state.set_filter("status", "active"));
        assert!(!state.set_search("   "));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn whitespace_only_search_change_is_not_a_change() {
        let mut state = QueryState::new(10);
        state.set_search("ada");
        state.set_page(2);

        assert!(!state.set_search(" ada  "));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn clear_filters_keeps_search() {
        let mut state = QueryState::new(10);
        state.set_filter("gender", "male");
        state.set_search("bo");

        assert!(state.clear_filters());
        assert_eq!(state.criteria().search(), Some("bo"));
        assert!(state.criteria().filters().is_empty());
    }
}
