use crate::models::UserId;
use crate::table::{Pagination, Sort};
use crate::users::bulk::BulkActionEntry;
use crate::users::row::UserRow;

/// Snapshot of the user list, republished after every state change.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListView {
    pub rows: Vec<UserRow>,
    pub total: u64,
    pub pagination: Pagination,
    pub sort: Sort,
    pub search: Option<String>,
    /// Selected ids, in row order.
    pub selection: Vec<UserId>,
    pub visible_columns: Vec<&'static str>,
    pub bulk_actions: Vec<Vec<BulkActionEntry>>,
    pub selection_mode: bool,
    pub requires_email_verification: bool,
    pub highlight_banned_users: bool,
}

impl UserListView {
    pub fn displayed_bulk_actions(&self) -> impl Iterator<Item = &BulkActionEntry> {
        self.bulk_actions
            .iter()
            .flatten()
            .filter(|entry| entry.displayed)
    }
}
