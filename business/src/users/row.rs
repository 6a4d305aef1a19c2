//! Decorated rows of the user list and their presentation helpers.

use ustr::Ustr;

use crate::models::{UNLIMITED_QUOTA, User};

/// Mute flags of the account behind a row.
///
/// Every flag starts `false`; only block-status reconciliation upgrades
/// `muted_by_instance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMutedStatus {
    pub name_with_host: Ustr,
    pub muted_by_instance: bool,
    pub muted_by_user: bool,
    pub muted_server_by_instance: bool,
    pub muted_server_by_user: bool,
}

impl AccountMutedStatus {
    pub fn unmuted(user: &User) -> Self {
        Self {
            name_with_host: Ustr::from(
                format!("{}@{}", user.account.name, user.account.host).as_str(),
            ),
            muted_by_instance: false,
            muted_by_user: false,
            muted_server_by_instance: false,
            muted_server_by_user: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user: User,
    pub account_muted_status: AccountMutedStatus,
    /// Set when banned users are highlighted and this user is blocked.
    pub highlighted: bool,
}

impl UserRow {
    pub fn new(user: User, highlight_banned: bool) -> Self {
        let account_muted_status = AccountMutedStatus::unmuted(&user);
        let mut row = Self {
            user,
            account_muted_status,
            highlighted: false,
        };
        row.set_highlight_banned(highlight_banned);
        row
    }

    pub fn set_highlight_banned(&mut self, enabled: bool) {
        self.highlighted = enabled && self.user.blocked;
    }

    /// Key used by the block-status endpoint.
    pub fn block_status_key(&self, api_host: &str) -> String {
        format!("{}@{api_host}", self.user.username)
    }

    pub fn video_quota_percentage(&self) -> f64 {
        quota_percentage(self.user.video_quota_used, self.user.video_quota)
    }

    pub fn video_quota_daily_percentage(&self) -> f64 {
        quota_percentage(
            self.user.video_quota_used_daily,
            self.user.video_quota_daily,
        )
    }

    pub fn quota_display(&self) -> String {
        quota_display(
            self.user.video_quota_used,
            self.user.video_quota,
            self.video_quota_percentage(),
        )
    }

    pub fn quota_daily_display(&self) -> String {
        quota_display(
            self.user.video_quota_used_daily,
            self.user.video_quota_daily,
            self.video_quota_daily_percentage(),
        )
    }
}

/// `used * 100 / quota`. A zero quota gives a non-finite value.
pub fn quota_percentage(used: i64, quota: i64) -> f64 {
    used as f64 * 100.0 / quota as f64
}

pub fn format_percentage(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.0}%")
    } else {
        "-".to_owned()
    }
}

fn quota_display(used: i64, quota: i64, percentage: f64) -> String {
    if quota == UNLIMITED_QUOTA {
        return format!("{} / Unlimited", format_bytes(used));
    }
    format!(
        "{} / {} ({})",
        format_bytes(used),
        format_bytes(quota),
        format_percentage(percentage)
    )
}

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Binary-scaled size, e.g. `1.50 GB`. `-1` renders as `Unlimited`.
pub fn format_bytes(bytes: i64) -> String {
    if bytes == UNLIMITED_QUOTA {
        return "Unlimited".to_owned();
    }
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", BYTE_UNITS[unit])
}
