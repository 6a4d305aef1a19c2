//! Collaborators the user list depends on.
//!
//! Every seam is a trait object so front ends (and tests) can plug in their
//! own prompt, notifier or transport.

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{BlockStatus, ResultList, ServerConfig, User, UserId, UserUpdate};
use crate::table::UserListQuery;

/// Paginated user queries and moderation mutations.
///
/// Batch mutations are one call from the caller's point of view; an
/// implementation may fan out and must stop at the first failure.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_users(&self, query: &UserListQuery) -> ApiResult<ResultList<User>>;

    async fn ban_users(&self, users: &[User], reason: Option<&str>) -> ApiResult<()>;

    async fn unban_users(&self, users: &[User]) -> ApiResult<()>;

    async fn remove_users(&self, users: &[User]) -> ApiResult<()>;

    async fn update_users(&self, users: &[User], update: &UserUpdate) -> ApiResult<()>;
}

/// Server-side blocklist lookups keyed by `username@host`.
#[async_trait]
pub trait BlockStatusClient: Send + Sync {
    async fn get_block_status(&self, accounts: &[String]) -> ApiResult<BlockStatus>;
}

#[async_trait]
pub trait ServerConfigSource: Send + Sync {
    async fn get_config(&self) -> ApiResult<ServerConfig>;
}

/// Asynchronous yes/no prompt. A dismissed prompt answers `false`.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    async fn confirm(&self, message: &str, title: &str) -> bool;
}

/// Operator-facing success and error messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// The authenticated operator's authorization rule.
pub trait Operator: Send + Sync {
    fn can_manage(&self, user: &User) -> bool;
}

/// Raised by anything that changed users behind the list's back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanged {
    pub user_ids: Vec<UserId>,
}

impl UserChanged {
    pub fn for_users(users: &[User]) -> Self {
        Self {
            user_ids: users.iter().map(|u| u.id).collect(),
        }
    }
}

pub type UserChangedSender = flume::Sender<UserChanged>;

/// Ban dialog. It owns confirmation and the ban call, and sends one
/// [`UserChanged`] on `done` when users were actually banned.
#[async_trait]
pub trait BanModal: Send + Sync {
    async fn open(&self, users: Vec<User>, done: UserChangedSender);
}
