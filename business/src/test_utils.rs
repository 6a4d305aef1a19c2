//! Fixtures for unit tests inside the business crate.
//!
//! Integration tests under `tests/` carry their own copies in
//! `tests/common/mod.rs`, since `cfg(test)` items are not visible there.

#![cfg(test)]

use chrono::{TimeZone, Utc};
use ustr::Ustr;

use crate::models::{AccountSummary, RoleRef, UNLIMITED_QUOTA, User, UserId, UserRole};

/// A plain, unblocked, unverified user on `videos.example.org` with a 1 GiB
/// quota and nothing used.
pub fn sample_user(id: UserId, username: &str) -> User {
    User {
        id,
        username: Ustr::from(username),
        email: Some(format!("{username}@example.org")),
        role: RoleRef {
            id: UserRole::User,
            label: "User".to_owned(),
        },
        blocked: false,
        blocked_reason: None,
        email_verified: Some(false),
        video_quota: 1024 * 1024 * 1024,
        video_quota_daily: UNLIMITED_QUOTA,
        video_quota_used: 0,
        video_quota_used_daily: 0,
        plugin_auth: None,
        last_login_date: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        account: AccountSummary {
            name: Ustr::from(username),
            host: Ustr::from("videos.example.org"),
            display_name: None,
        },
    }
}
