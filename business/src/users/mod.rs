//! Admin user list: listing, selection and bulk moderation.
//!
//! - `traits`: collaborator seams (directory, blocklist, prompts, notifier)
//! - `api`: REST implementations of those seams
//! - `controller`: the list state machine front ends drive

pub mod api;
pub mod bulk;
pub mod columns;
pub mod controller;
pub mod operator;
pub mod row;
pub mod traits;
pub mod view;

pub use api::AdminClient;
pub use bulk::{BULK_ACTION_SECTIONS, BulkActionEntry, BulkActionKind, BulkActionOutcome};
pub use columns::{ColumnSet, DEFAULT_VISIBLE_COLUMNS, USER_COLUMNS};
pub use controller::{AdminSession, USER_LIST_TABLE_ID, UserListController, UserListDeps};
pub use operator::AuthUser;
pub use row::{AccountMutedStatus, UserRow, format_bytes, format_percentage};
pub use traits::{
    BanModal, BlockStatusClient, ConfirmGate, Notifier, Operator, ServerConfigSource,
    UserChanged, UserChangedSender, UserDirectory,
};
pub use view::UserListView;
