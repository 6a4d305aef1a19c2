//! Table rendering for the user list.

use tabled::builder::Builder;
use tabled::settings::Style;
use tube_admin_business::models::UserRole;
use tube_admin_business::users::{UserListView, UserRow};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

/// Role label with a marker matching its badge color.
pub fn role_badge(role: UserRole) -> String {
    let marker = match role.badge_class() {
        "badge-purple" => "◆",
        "badge-blue" => "●",
        _ => "○",
    };
    format!("{marker} {}", role.label())
}

fn username_cell(row: &UserRow) -> String {
    let mut cell = String::new();
    if row.highlighted {
        cell.push_str("▶ ");
    }
    cell.push_str(row.user.username.as_str());
    if row.user.blocked {
        cell.push_str(" [banned]");
    }
    if row.account_muted_status.muted_by_instance {
        cell.push_str(" [muted]");
    }
    cell
}

fn email_cell(row: &UserRow, requires_email_verification: bool) -> String {
    let Some(email) = row.user.email.as_deref() else {
        return "-".to_owned();
    };
    let email = truncate_str(email, 32);
    if requires_email_verification && row.user.email_verified == Some(false) {
        format!("{email} (unverified)")
    } else {
        email
    }
}

/// Text of one cell. Unknown column ids render empty.
pub fn cell(row: &UserRow, column: &str, requires_email_verification: bool) -> String {
    match column {
        "username" => username_cell(row),
        "role" => role_badge(row.user.role()),
        "email" => email_cell(row, requires_email_verification),
        "quota" => row.quota_display(),
        "quotaDaily" => row.quota_daily_display(),
        "createdAt" => row.user.created_at.format(DATE_FORMAT).to_string(),
        "lastLoginDate" => row
            .user
            .last_login_date
            .map_or_else(|| "-".to_owned(), |d| d.format(DATE_FORMAT).to_string()),
        "pluginAuth" => row.user.plugin_auth.clone().unwrap_or_else(|| "-".to_owned()),
        _ => String::new(),
    }
}

/// Render the visible columns of a view. Selected rows are marked with `*`.
pub fn render_users(view: &UserListView, labels: &[(&'static str, &'static str)]) -> String {
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    header.extend(labels.iter().map(|(_, label)| (*label).to_owned()));
    builder.push_record(header);

    for row in &view.rows {
        let mark = if view.selection.contains(&row.user.id) {
            "*"
        } else {
            ""
        };
        let mut record = vec![mark.to_owned()];
        record.extend(
            labels
                .iter()
                .map(|(id, _)| cell(row, id, view.requires_email_verification)),
        );
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Option text of a row in interactive pickers.
pub fn row_label(row: &UserRow) -> String {
    format!(
        "{} ({}) #{}",
        username_cell(row),
        row.user.role().label(),
        row.user.id
    )
}
