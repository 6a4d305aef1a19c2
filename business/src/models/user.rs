//! User records as returned by the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// Numeric user id.
pub type UserId = u64;

/// Quota value meaning "no limit".
pub const UNLIMITED_QUOTA: i64 = -1;

/// Platform role.
///
/// Unknown ids are preserved as [`UserRole::Other`] instead of failing the
/// whole page decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum UserRole {
    Administrator,
    Moderator,
    User,
    Other(u8),
}

impl From<u8> for UserRole {
    fn from(id: u8) -> Self {
        match id {
            0 => Self::Administrator,
            1 => Self::Moderator,
            2 => Self::User,
            other => Self::Other(other),
        }
    }
}

impl From<UserRole> for u8 {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Administrator => 0,
            UserRole::Moderator => 1,
            UserRole::User => 2,
            UserRole::Other(id) => id,
        }
    }
}

impl UserRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Moderator => "Moderator",
            Self::User => "User",
            Self::Other(_) => "Unknown",
        }
    }

    /// CSS-ish badge class used by list views.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Administrator => "badge-purple",
            Self::Moderator => "badge-blue",
            Self::User | Self::Other(_) => "badge-yellow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: UserRole,
    #[serde(default)]
    pub label: String,
}

/// Local account attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub name: Ustr,
    pub host: Ustr,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: Ustr,
    #[serde(default)]
    pub email: Option<String>,
    pub role: RoleRef,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub blocked_reason: Option<String>,
    /// `None` when the server does not track verification for this user.
    #[serde(default)]
    pub email_verified: Option<bool>,
    pub video_quota: i64,
    pub video_quota_daily: i64,
    #[serde(default)]
    pub video_quota_used: i64,
    #[serde(default)]
    pub video_quota_used_daily: i64,
    #[serde(default)]
    pub plugin_auth: Option<String>,
    #[serde(default)]
    pub last_login_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub account: AccountSummary,
}

impl User {
    pub fn role(&self) -> UserRole {
        self.role.id
    }

    pub fn is_root(&self) -> bool {
        self.username == "root"
    }

    pub fn is_email_verified(&self) -> bool {
        self.email_verified.unwrap_or(false)
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultList<T> {
    pub total: u64,
    pub data: Vec<T>,
}

/// Partial update sent by bulk actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_quota: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_quota_daily: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<u8>,
}

impl UserUpdate {
    pub fn email_verified() -> Self {
        Self {
            email_verified: Some(true),
            ..Self::default()
        }
    }
}

/// Per-account block status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBlockStatus {
    #[serde(default)]
    pub blocked_by_server: bool,
    #[serde(default)]
    pub blocked_by_user: Option<bool>,
}

/// Response of the block-status endpoint, keyed by `username@host`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlockStatus {
    #[serde(default)]
    pub accounts: std::collections::HashMap<String, AccountBlockStatus>,
}

/// The subset of the instance configuration this client reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub signup: SignupConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupConfig {
    #[serde(default)]
    pub allowed: bool,
    #[serde(default)]
    pub requires_email_verification: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r#"{
        "id": 7,
        "username": "alice",
        "email": "alice@example.org",
        "emailVerified": false,
        "role": { "id": 2, "label": "User" },
        "blocked": false,
        "blockedReason": null,
        "videoQuota": 1073741824,
        "videoQuotaDaily": -1,
        "videoQuotaUsed": 536870912,
        "videoQuotaUsedDaily": 0,
        "pluginAuth": null,
        "lastLoginDate": "2024-05-01T10:00:00.000Z",
        "createdAt": "2023-01-01T00:00:00.000Z",
        "account": { "name": "alice", "host": "videos.example.org", "displayName": "Alice" }
    }"#;

    #[test]
    fn test_user_decodes_platform_payload() {
        let user: User = serde_json::from_str(USER_JSON).expect("user decodes");
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role(), UserRole::User);
        assert!(!user.is_email_verified());
        assert_eq!(user.video_quota_daily, UNLIMITED_QUOTA);
        assert!(user.last_login_date.is_some());
        assert_eq!(user.account.host, "videos.example.org");
    }

    #[test]
    fn test_unknown_role_is_not_an_error() {
        let json = USER_JSON.replace(r#""id": 2, "label": "User""#, r#""id": 9, "label": "?""#);
        let user: User = serde_json::from_str(&json).expect("unknown role still decodes");
        assert_eq!(user.role(), UserRole::Other(9));
        assert_eq!(user.role().badge_class(), "badge-yellow");
    }

    #[test]
    fn test_role_badges() {
        assert_eq!(UserRole::Administrator.badge_class(), "badge-purple");
        assert_eq!(UserRole::Moderator.badge_class(), "badge-blue");
        assert_eq!(UserRole::User.badge_class(), "badge-yellow");
    }

    #[test]
    fn test_user_update_only_serializes_set_fields() {
        let body = serde_json::to_value(UserUpdate::email_verified()).unwrap();
        assert_eq!(body, serde_json::json!({ "emailVerified": true }));
    }

    #[test]
    fn test_block_status_decodes() {
        let status: BlockStatus = serde_json::from_str(
            r#"{"accounts": {"alice@h": {"blockedByServer": true, "blockedByUser": false}}, "hosts": {}}"#,
        )
        .unwrap();
        assert!(status.accounts["alice@h"].blocked_by_server);
    }
}
