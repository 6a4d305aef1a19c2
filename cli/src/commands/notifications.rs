//! Notifications of the operator.

use anyhow::{Context as _, Result};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;
use tube_admin_business::models::UserNotification;

use crate::context::AdminContext;
use crate::output::Output;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "")]
    unread: &'static str,
    #[tabled(rename = "When")]
    created_at: String,
    #[tabled(rename = "Notification")]
    summary: String,
}

impl From<&UserNotification> for NotificationRow {
    fn from(notification: &UserNotification) -> Self {
        Self {
            unread: if notification.read { "" } else { "●" },
            created_at: notification.created_at.format("%Y-%m-%d %H:%M").to_string(),
            summary: notification.summary(),
        }
    }
}

#[instrument(skip_all, name = "notifications", fields(unread_only = unread_only, count = count))]
pub async fn run_notifications(ctx: &AdminContext, unread_only: bool, count: u32) -> Result<()> {
    let out = Output::new();

    let list = ctx
        .client
        .list_notifications(0, count, unread_only)
        .await
        .context("Failed to load notifications")?;

    if list.data.is_empty() {
        out.dim("No notifications.");
        return Ok(());
    }

    let rows: Vec<NotificationRow> = list.data.iter().map(NotificationRow::from).collect();
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    out.newline();
    out.print(table.to_string());
    out.page_summary(0, rows.len(), list.total);
    Ok(())
}
