//! Free-text filtering over the store. Pure: nothing here touches the view.

use crate::record::LocationRecord;
use crate::store::LocationStore;
use crate::view::MarkerHandle;

/// Which record fields a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// City or zip code.
    Location,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    term: String,
    field: SearchField,
}

impl SearchQuery {
    /// Trim and case-fold `term`.
    #[must_use]
    pub fn new(term: &str, field: SearchField) -> Self {
        Self {
            term: term.trim().to_lowercase(),
            field,
        }
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn field(&self) -> SearchField {
        self.field
    }

    /// An empty query matches every record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    #[must_use]
    pub fn matches(&self, record: &LocationRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&self.term);
        match self.field {
            SearchField::Location => contains(&record.city) || contains(&record.zipcode),
            SearchField::Name => contains(&record.name),
        }
    }
}

/// Markers of all records matching `query`, in store order.
#[must_use]
pub fn search(store: &LocationStore, query: &SearchQuery) -> Vec<MarkerHandle> {
    store
        .all()
        .iter()
        .filter(|e| query.matches(&e.record))
        .map(|e| e.marker)
        .collect()
}

#[must_use]
pub fn search_by_location(store: &LocationStore, term: &str) -> Vec<MarkerHandle> {
    search(store, &SearchQuery::new(term, SearchField::Location))
}

#[must_use]
pub fn search_by_name(store: &LocationStore, term: &str) -> Vec<MarkerHandle> {
    search(store, &SearchQuery::new(term, SearchField::Name))
}
