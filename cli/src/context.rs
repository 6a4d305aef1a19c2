//! Connection setup and user list wiring.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{info, instrument};
use tube_admin_business::BusinessConfig;
use tube_admin_business::users::{
    AdminClient, AdminSession, AuthUser, ConfirmGate, Notifier, USER_LIST_TABLE_ID,
    UserListController, UserListDeps,
};

use crate::config::Config;
use crate::prompts::TerminalBanModal;

/// An authenticated connection to one instance.
pub struct AdminContext {
    pub client: Arc<AdminClient>,
    pub operator: AuthUser,
    pub session: AdminSession,
}

/// Build the client and identify the operator.
#[instrument(skip_all, name = "connect", fields(url = %config.api_base_url))]
pub async fn connect(config: &BusinessConfig) -> Result<AdminContext> {
    let api_host = config.api_host().context("Invalid instance URL")?;
    let client = Arc::new(AdminClient::new(config).context("Failed to build HTTP client")?);

    let operator = client
        .get_me()
        .await
        .context("Failed to identify the operator (is the token valid?)")?;
    info!(username = %operator.username, role = operator.role().label(), "Connected");

    let session = AdminSession::new(Arc::new(operator.clone()), api_host);
    Ok(AdminContext {
        client,
        operator,
        session,
    })
}

/// Wire a user list to the instance, the terminal prompts and the notifier.
/// The remembered sort and page size are applied when present.
pub fn build_user_list(
    ctx: &AdminContext,
    config: &Config,
    confirm: Arc<dyn ConfirmGate>,
    notifier: Arc<dyn Notifier>,
    ban_reason: Option<String>,
) -> UserListController {
    let ban_modal = TerminalBanModal::new(
        ctx.client.clone(),
        Arc::clone(&notifier),
        Arc::clone(&confirm),
        ban_reason,
    );
    let deps = UserListDeps {
        directory: ctx.client.clone(),
        block_status: ctx.client.clone(),
        server_config: ctx.client.clone(),
        confirm,
        notifier,
        ban_modal: Arc::new(ban_modal),
    };

    let mut controller = UserListController::new(ctx.session.clone(), deps);
    if let Some(state) = config.table_state(USER_LIST_TABLE_ID) {
        controller.restore_table_state(state);
    }
    controller
}
