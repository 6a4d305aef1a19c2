//! Terminal implementations of the user list's interactive seams.

use std::sync::Arc;

use async_trait::async_trait;
use inquire::{Confirm, Text};
use tracing::{debug, warn};
use tube_admin_business::models::User;
use tube_admin_business::users::{
    BanModal, BulkActionKind, ConfirmGate, Notifier, UserChanged, UserChangedSender,
    UserDirectory,
};

/// Run a blocking `inquire` prompt off the async runtime.
async fn blocking_prompt<T, F>(prompt: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> inquire::error::InquireResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(prompt).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            debug!("Prompt dismissed: {e}");
            None
        }
        Err(e) => {
            warn!("Prompt task failed: {e}");
            None
        }
    }
}

/// Yes/no prompt on the terminal. Escape or Ctrl-C answers no.
pub struct InquireConfirm;

#[async_trait]
impl ConfirmGate for InquireConfirm {
    async fn confirm(&self, message: &str, title: &str) -> bool {
        let prompt = format!("{title}: {message}");
        blocking_prompt(move || Confirm::new(&prompt).with_default(false).prompt())
            .await
            .unwrap_or(false)
    }
}

/// Answers yes without asking (`--yes`).
pub struct AutoConfirm;

#[async_trait]
impl ConfirmGate for AutoConfirm {
    async fn confirm(&self, message: &str, title: &str) -> bool {
        debug!("Auto-confirmed {title}: {message}");
        true
    }
}

/// Ban dialog: asks for a reason unless one was given, confirms, bans and
/// reports the change back to the list.
pub struct TerminalBanModal {
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn ConfirmGate>,
    reason: Option<String>,
}

impl TerminalBanModal {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn ConfirmGate>,
        reason: Option<String>,
    ) -> Self {
        Self {
            directory,
            notifier,
            confirm,
            reason,
        }
    }

    async fn reason(&self) -> Option<String> {
        let reason = match &self.reason {
            Some(reason) => Some(reason.clone()),
            None => blocking_prompt(|| {
                Text::new("Ban reason:")
                    .with_help_message("Leave empty to ban without a reason")
                    .prompt()
            })
            .await,
        };
        reason
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty())
    }
}

#[async_trait]
impl BanModal for TerminalBanModal {
    async fn open(&self, users: Vec<User>, done: UserChangedSender) {
        let kind = BulkActionKind::Ban;
        let reason = self.reason().await;

        let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
        let message = format!("Ban {}?", names.join(", "));
        if !self.confirm.confirm(&message, kind.label()).await {
            debug!("Ban dialog closed without banning");
            return;
        }

        match self.directory.ban_users(&users, reason.as_deref()).await {
            Ok(()) => {
                self.notifier.success(&kind.success_message(users.len()));
                if done.send(UserChanged::for_users(&users)).is_err() {
                    debug!("User list dropped before ban completed");
                }
            }
            Err(e) => self.notifier.error(&e.to_string()),
        }
    }
}
