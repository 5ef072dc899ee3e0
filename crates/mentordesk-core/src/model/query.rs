// ── List query ──
//
// `Criteria` is the filter/search payload a page reset is keyed on;
// `ListQuery` is what actually goes to the server.

use std::collections::BTreeMap;

use serde::Serialize;

/// Filter and search payload, excluding the page.
///
/// Stored normalized: blank filter values are absent and the search term is
/// trimmed, so two payloads that produce the same server query compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Criteria {
    filters: BTreeMap<String, String>,
    search: String,
}

impl Criteria {
    /// Set or clear (on blank value) one filter.
    pub fn with_filter(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.set_filter(key, value);
        self
    }

    pub fn with_search(mut self, search: impl AsRef<str>) -> Self {
        self.set_search(search);
        self
    }

    pub(crate) fn set_filter(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let key = key.into();
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value.to_owned());
        }
    }

    pub(crate) fn set_search(&mut self, search: impl AsRef<str>) {
        search.as_ref().trim().clone_into(&mut self.search);
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn search(&self) -> Option<&str> {
        (!self.search.is_empty()).then_some(self.search.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.search.is_empty()
    }
}

/// A fully-specified list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    page: u32,
    per_page: u32,
    #[serde(flatten)]
    criteria: Criteria,
}

impl ListQuery {
    pub fn new(page: u32, per_page: u32, criteria: Criteria) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            criteria,
        }
    }

    /// A one-row query whose only purpose is reading the `total` count.
    pub fn count(criteria: Criteria) -> Self {
        Self::new(1, 1, criteria)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Query-string pairs: `page`, `per_page`, then every non-blank filter
    /// and the search term if present.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_owned(), self.page.to_string()),
            ("per_page".to_owned(), self.per_page.to_string()),
        ];
        params.extend(
            self.criteria
                .filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if let Some(search) = self.criteria.search() {
            params.push(("search".to_owned(), search.to_owned()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn blank_fields_are_omitted() {
        let criteria = Criteria::default()
            .with_filter("gender", "female")
            .with_filter("status", "   ")
            .with_search("");
        let query = ListQuery::new(2, 10, criteria);

        assert_eq!(
            query.to_params(),
            owned(&[("page", "2"), ("per_page", "10"), ("gender", "female")])
        );
    }

    #[test]
    fn search_is_sent_trimmed() {
        let query = ListQuery::new(1, 10, Criteria::default().with_search("  ada "));
        assert_eq!(
            query.to_params(),
            owned(&[("page", "1"), ("per_page", "10"), ("search", "ada")])
        );
    }

    #[test]
    fn clearing_a_filter_restores_equality() {
        let base = Criteria::default().with_filter("status", "active");
        let cleared = base.clone().with_filter("status", "");
        assert_eq!(cleared, Criteria::default());
        assert_ne!(base, cleared);
    }
}
