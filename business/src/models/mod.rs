//! Wire types shared with the platform's REST API.

pub mod live;
pub mod notification;
pub mod user;

pub use live::{LiveLatencyMode, LiveVideo};
pub use notification::{UserNotification, UserNotificationType};
pub use user::{
    AccountBlockStatus, AccountSummary, BlockStatus, ResultList, RoleRef, ServerConfig,
    SignupConfig, UNLIMITED_QUOTA, User, UserId, UserRole, UserUpdate,
};
