//! Shared table contract: pagination, sort, search, and persisted table state.
//!
//! Invariant: `pagination.start` goes back to 0 whenever the sort, the search
//! or the page size changes, so a new query never starts mid-way through a
//! differently ordered result set.

use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// Page sizes offered to the operator.
pub const ROWS_PER_PAGE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Filter token prefix restricting the list to banned users.
pub const BANNED_FILTER_PREFIX: &str = "banned:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page size.
    pub count: u32,
    /// Zero-based offset.
    pub start: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl TryFrom<i8> for SortOrder {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ascending),
            -1 => Ok(Self::Descending),
            other => Err(format!("sort order must be 1 or -1, got {other}")),
        }
    }
}

impl From<SortOrder> for i8 {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: Ustr,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: &str, order: SortOrder) -> Self {
        Self {
            field: Ustr::from(field),
            order,
        }
    }

    /// Parse the REST form: `createdAt` (ascending) or `-createdAt` (descending).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (field, order) = match value.strip_prefix('-') {
            Some(field) => (field, SortOrder::Descending),
            None => (value, SortOrder::Ascending),
        };
        (!field.is_empty()).then(|| Self::new(field, order))
    }

    /// REST form of the sort.
    pub fn to_query(self) -> String {
        match self.order {
            SortOrder::Ascending => self.field.to_string(),
            SortOrder::Descending => format!("-{}", self.field),
        }
    }
}

/// Search text split into free text and recognized filter tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub search: Option<String>,
    pub blocked: Option<bool>,
}

impl SearchFilters {
    /// Tokens are whitespace separated. `banned:true|false` becomes the
    /// `blocked` filter (last one wins); anything else stays free text.
    pub fn parse(raw: &str) -> Self {
        let mut blocked = None;
        let mut words = Vec::new();

        for token in raw.split_whitespace() {
            let parsed = token
                .strip_prefix(BANNED_FILTER_PREFIX)
                .and_then(|value| value.parse::<bool>().ok());

            match parsed {
                Some(value) => blocked = Some(value),
                None => words.push(token),
            }
        }

        Self {
            search: (!words.is_empty()).then(|| words.join(" ")),
            blocked,
        }
    }
}

/// Everything needed to ask the directory for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListQuery {
    pub pagination: Pagination,
    pub sort: Sort,
    pub search: Option<String>,
}

impl UserListQuery {
    pub fn filters(&self) -> SearchFilters {
        self.search
            .as_deref()
            .map(SearchFilters::parse)
            .unwrap_or_default()
    }

    /// Query-string pairs in the order the REST API documents them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let filters = self.filters();
        let mut pairs = vec![
            ("start", self.pagination.start.to_string()),
            ("count", self.pagination.count.to_string()),
            ("sort", self.sort.to_query()),
        ];
        if let Some(search) = filters.search {
            pairs.push(("search", search));
        }
        if let Some(blocked) = filters.blocked {
            pairs.push(("blocked", blocked.to_string()));
        }
        pairs
    }
}

/// Sort and page size remembered between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub sort: Sort,
    pub rows_per_page: u32,
}

/// Column descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub id: &'static str,
    pub label: &'static str,
}

/// Pagination/sort/search state of one table.
#[derive(Debug, Clone)]
pub struct RestTable {
    identifier: &'static str,
    rows_per_page: u32,
    pagination: Pagination,
    sort: Sort,
    search: Option<String>,
}

impl RestTable {
    pub fn new(identifier: &'static str, default_sort: Sort) -> Self {
        let rows_per_page = ROWS_PER_PAGE_OPTIONS[0];
        Self {
            identifier,
            rows_per_page,
            pagination: Pagination {
                count: rows_per_page,
                start: 0,
            },
            sort: default_sort,
            search: None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// Move to the page starting at `start` with `count` rows.
    ///
    /// A page size change restarts from the first page.
    pub fn on_page(&mut self, start: u64, count: u32) {
        let count = count.max(1);
        if count != self.rows_per_page {
            self.rows_per_page = count;
            self.pagination = Pagination { count, start: 0 };
        } else {
            self.pagination = Pagination { count, start };
        }
    }

    pub fn on_sort(&mut self, sort: Sort) {
        self.sort = sort;
        self.pagination.start = 0;
    }

    /// Empty or whitespace-only text clears the search.
    pub fn on_search(&mut self, search: &str) {
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_owned());
        self.pagination.start = 0;
    }

    pub fn reset_search(&mut self) {
        self.on_search("");
    }

    pub fn query(&self) -> UserListQuery {
        UserListQuery {
            pagination: self.pagination,
            sort: self.sort,
            search: self.search.clone(),
        }
    }

    pub fn state(&self) -> TableState {
        TableState {
            sort: self.sort,
            rows_per_page: self.rows_per_page,
        }
    }

    pub fn restore(&mut self, state: TableState) {
        self.sort = state.sort;
        self.rows_per_page = state.rows_per_page.max(1);
        self.pagination = Pagination {
            count: self.rows_per_page,
            start: 0,
        };
    }
}
