//! User list orchestration.
//!
//! The controller is driven through `&mut self`, so operator actions never
//! interleave. The only background work is block-status reconciliation: it
//! runs in a [`JoinSet`] and reports back over a channel, and results are
//! applied on [`UserListController::sync`] / [`UserListController::settle`].
//!
//! Each successful page load bumps a generation number. Reconciliation
//! results carry the generation they were issued for and are dropped when the
//! rows have been replaced since.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinSet;
use ustr::Ustr;

use crate::error::ApiResult;
use crate::models::{BlockStatus, User, UserId, UserUpdate};
use crate::table::{RestTable, Sort, SortOrder, TableState};
use crate::users::bulk::{BulkActionKind, BulkActionOutcome, PolicyContext, bulk_action_sections};
use crate::users::columns::ColumnSet;
use crate::users::row::UserRow;
use crate::users::traits::{
    BanModal, BlockStatusClient, ConfirmGate, Notifier, Operator, ServerConfigSource,
    UserChanged, UserChangedSender, UserDirectory,
};
use crate::users::view::UserListView;

/// Table identifier used to persist sort and page size.
pub const USER_LIST_TABLE_ID: &str = "user-list";

/// Default ordering: oldest accounts first.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Who is operating, and against which instance.
#[derive(Clone)]
pub struct AdminSession {
    pub operator: Arc<dyn Operator>,
    /// `host[:port]` of the instance, used for `username@host` handles.
    pub api_host: Ustr,
}

impl AdminSession {
    pub fn new(operator: Arc<dyn Operator>, api_host: Ustr) -> Self {
        Self { operator, api_host }
    }
}

/// External collaborators of the user list.
#[derive(Clone)]
pub struct UserListDeps {
    pub directory: Arc<dyn UserDirectory>,
    pub block_status: Arc<dyn BlockStatusClient>,
    pub server_config: Arc<dyn ServerConfigSource>,
    pub confirm: Arc<dyn ConfirmGate>,
    pub notifier: Arc<dyn Notifier>,
    pub ban_modal: Arc<dyn BanModal>,
}

#[derive(Debug)]
struct MutedStatusUpdate {
    generation: u64,
    result: ApiResult<BlockStatus>,
}

pub struct UserListController {
    session: AdminSession,
    deps: UserListDeps,

    table: RestTable,
    columns: ColumnSet,
    rows: Vec<UserRow>,
    total: u64,
    selection: BTreeSet<UserId>,
    highlight_banned_users: bool,
    requires_email_verification: bool,
    initialized: bool,

    generation: u64,
    tasks: JoinSet<()>,
    muted_tx: flume::Sender<MutedStatusUpdate>,
    muted_rx: flume::Receiver<MutedStatusUpdate>,
    changed_tx: UserChangedSender,
    changed_rx: flume::Receiver<UserChanged>,
    view_tx: watch::Sender<UserListView>,
}

impl UserListController {
    pub fn new(session: AdminSession, deps: UserListDeps) -> Self {
        let table = RestTable::new(
            USER_LIST_TABLE_ID,
            Sort::new(DEFAULT_SORT_FIELD, SortOrder::Ascending),
        );
        let (muted_tx, muted_rx) = flume::unbounded();
        let (changed_tx, changed_rx) = flume::unbounded();
        let (view_tx, _) = watch::channel(UserListView {
            rows: Vec::new(),
            total: 0,
            pagination: table.pagination(),
            sort: table.sort(),
            search: None,
            selection: Vec::new(),
            visible_columns: Vec::new(),
            bulk_actions: Vec::new(),
            selection_mode: false,
            requires_email_verification: false,
            highlight_banned_users: false,
        });

        let mut controller = Self {
            session,
            deps,
            table,
            columns: ColumnSet::default(),
            rows: Vec::new(),
            total: 0,
            selection: BTreeSet::new(),
            highlight_banned_users: false,
            requires_email_verification: false,
            initialized: false,
            generation: 0,
            tasks: JoinSet::new(),
            muted_tx,
            muted_rx,
            changed_tx,
            changed_rx,
            view_tx,
        };
        controller.publish();
        controller
    }

    /// Apply a persisted sort and page size. Meant to be called before
    /// [`Self::initialize`].
    pub fn restore_table_state(&mut self, state: TableState) {
        self.table.restore(state);
        self.publish();
    }

    pub fn table_state(&self) -> TableState {
        self.table.state()
    }

    /// Position the table before the first load. Loaded rows are untouched
    /// until the next reload.
    pub fn preset_query(&mut self, start: u64, search: Option<&str>) {
        if let Some(search) = search {
            self.table.on_search(search);
        }
        let count = self.table.rows_per_page();
        self.table.on_page(start, count);
        self.publish();
    }

    /// Read the server configuration and load the first page.
    pub async fn initialize(&mut self) {
        if self.initialized {
            debug!("user list already initialized");
            return;
        }
        self.initialized = true;

        match self.deps.server_config.get_config().await {
            Ok(config) => {
                self.requires_email_verification = config.signup.requires_email_verification;
            }
            Err(e) => {
                warn!("Failed to read server config: {e}");
                self.deps.notifier.error(&e.to_string());
            }
        }

        self.reload_data().await;
    }

    /// Clear the selection and fetch the current page.
    pub async fn reload_data(&mut self) {
        self.selection.clear();

        let query = self.table.query();
        debug!("Loading users {query:?}");

        match self.deps.directory.get_users(&query).await {
            Ok(page) => {
                self.generation += 1;
                self.total = page.total;
                self.rows = page
                    .data
                    .into_iter()
                    .map(|user| UserRow::new(user, self.highlight_banned_users))
                    .collect();
                info!(
                    "Loaded {} of {} users (generation {})",
                    self.rows.len(),
                    self.total,
                    self.generation
                );
                self.publish();
                self.load_muted_status();
            }
            Err(e) => {
                warn!("Failed to load users: {e}");
                self.deps.notifier.error(&e.to_string());
                self.publish();
            }
        }
    }

    /// Ask the blocklist about the current rows without waiting for the answer.
    pub fn load_muted_status(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let accounts: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.block_status_key(&self.session.api_host))
            .collect();
        let client = Arc::clone(&self.deps.block_status);
        let tx = self.muted_tx.clone();
        let generation = self.generation;

        self.tasks.spawn(async move {
            let result = client.get_block_status(&accounts).await;
            if tx.send(MutedStatusUpdate { generation, result }).is_err() {
                debug!("User list dropped before block status arrived");
            }
        });
    }

    /// Apply every reconciliation result received so far.
    pub fn sync(&mut self) {
        while let Some(joined) = self.tasks.try_join_next() {
            if let Err(e) = joined {
                warn!("Block status task failed: {e}");
            }
        }

        let updates: Vec<MutedStatusUpdate> = self.muted_rx.try_iter().collect();
        if updates.is_empty() {
            return;
        }
        for update in updates {
            self.apply_muted_status(update);
        }
        self.publish();
    }

    /// Wait for outstanding reconciliation tasks, then apply their results.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Block status task failed: {e}");
            }
        }
        self.sync();
    }

    fn apply_muted_status(&mut self, update: MutedStatusUpdate) {
        if update.generation != self.generation {
            debug!(
                "Dropping block status for generation {} (current {})",
                update.generation, self.generation
            );
            return;
        }

        let status = match update.result {
            Ok(status) => status,
            Err(e) => {
                warn!("Failed to load block status: {e}");
                return;
            }
        };

        for row in &mut self.rows {
            let key = row.block_status_key(&self.session.api_host);
            if status
                .accounts
                .get(&key)
                .is_some_and(|account| account.blocked_by_server)
            {
                row.account_muted_status.muted_by_instance = true;
            }
        }
    }

    pub fn is_in_selection_mode(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Ids that are not on the current page are ignored.
    pub fn select(&mut self, id: UserId) {
        if self.rows.iter().any(|row| row.user.id == id) {
            self.selection.insert(id);
            self.publish();
        }
    }

    pub fn deselect(&mut self, id: UserId) {
        if self.selection.remove(&id) {
            self.publish();
        }
    }

    pub fn toggle_selection(&mut self, id: UserId) {
        if self.selection.contains(&id) {
            self.deselect(id);
        } else {
            self.select(id);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = self.rows.iter().map(|row| row.user.id).collect();
        self.publish();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.publish();
    }

    pub fn selected_users(&self) -> Vec<User> {
        self.rows
            .iter()
            .filter(|row| self.selection.contains(&row.user.id))
            .map(|row| row.user.clone())
            .collect()
    }

    pub async fn on_page(&mut self, start: u64, count: u32) {
        self.table.on_page(start, count);
        self.reload_data().await;
    }

    pub async fn on_sort(&mut self, field: &str, order: SortOrder) {
        self.table.on_sort(Sort::new(field, order));
        self.reload_data().await;
    }

    pub async fn on_search(&mut self, search: &str) {
        self.table.on_search(search);
        self.reload_data().await;
    }

    pub async fn reset_search(&mut self) {
        self.table.reset_search();
        self.reload_data().await;
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn set_visible_columns(&mut self, ids: &[&str]) {
        self.columns.set_visible(ids);
        self.publish();
    }

    pub fn toggle_column(&mut self, id: &str) -> Option<bool> {
        let visible = self.columns.toggle(id);
        self.publish();
        visible
    }

    pub fn set_highlight_banned_users(&mut self, enabled: bool) {
        self.highlight_banned_users = enabled;
        for row in &mut self.rows {
            row.set_highlight_banned(enabled);
        }
        self.publish();
    }

    pub fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn table(&self) -> &RestTable {
        &self.table
    }

    pub fn requires_email_verification(&self) -> bool {
        self.requires_email_verification
    }

    pub fn subscribe(&self) -> watch::Receiver<UserListView> {
        self.view_tx.subscribe()
    }

    pub fn view(&self) -> UserListView {
        self.view_tx.borrow().clone()
    }

    /// Channel handed to components that change users on their own.
    pub fn user_changed_sender(&self) -> UserChangedSender {
        self.changed_tx.clone()
    }

    pub async fn on_user_changed(&mut self) {
        self.reload_data().await;
    }

    /// Reload once per pending "user changed" event. Returns the number of
    /// events handled.
    pub async fn process_user_changed_events(&mut self) -> usize {
        let events: Vec<UserChanged> = self.changed_rx.try_iter().collect();
        for event in &events {
            debug!("Users changed: {:?}", event.user_ids);
            self.on_user_changed().await;
        }
        events.len()
    }

    pub async fn remove_users(&mut self) -> BulkActionOutcome {
        self.run_bulk_action(BulkActionKind::Delete).await
    }

    pub async fn open_ban_user_modal(&mut self) -> BulkActionOutcome {
        self.run_bulk_action(BulkActionKind::Ban).await
    }

    pub async fn unban_users(&mut self) -> BulkActionOutcome {
        self.run_bulk_action(BulkActionKind::Unban).await
    }

    pub async fn set_emails_as_verified(&mut self) -> BulkActionOutcome {
        self.run_bulk_action(BulkActionKind::SetEmailVerified).await
    }

    /// Validate, confirm, mutate and reload for the current selection.
    pub async fn run_bulk_action(&mut self, kind: BulkActionKind) -> BulkActionOutcome {
        let users = self.selected_users();
        let count = users.len();
        if users.is_empty() {
            debug!("{} ignored: empty selection", kind.label());
            return BulkActionOutcome::NothingSelected;
        }

        if let Some(message) = kind.root_guard_message() {
            if users.iter().any(User::is_root) {
                return self.reject(message.to_owned());
            }
        }

        if !kind.is_displayed(&users, self.policy_context()) {
            return self.reject(kind.not_allowed_message(count));
        }

        if let Some((message, title)) = kind.confirmation(count) {
            if !self.deps.confirm.confirm(&message, title).await {
                debug!("{} declined by operator", kind.label());
                return BulkActionOutcome::Declined;
            }
        }

        info!("{} on {count} users", kind.label());
        let result = match kind {
            BulkActionKind::Ban => {
                self.deps
                    .ban_modal
                    .open(users, self.changed_tx.clone())
                    .await;
                return BulkActionOutcome::ModalOpened(count);
            }
            BulkActionKind::Delete => self.deps.directory.remove_users(&users).await,
            BulkActionKind::Unban => self.deps.directory.unban_users(&users).await,
            BulkActionKind::SetEmailVerified => {
                self.deps
                    .directory
                    .update_users(&users, &UserUpdate::email_verified())
                    .await
            }
        };

        match result {
            Ok(()) => {
                self.deps.notifier.success(&kind.success_message(count));
                self.reload_data().await;
                BulkActionOutcome::Reloaded(count)
            }
            Err(e) => {
                let message = e.to_string();
                warn!("{} failed: {message}", kind.label());
                self.deps.notifier.error(&message);
                BulkActionOutcome::Failed(message)
            }
        }
    }

    fn reject(&self, message: String) -> BulkActionOutcome {
        self.deps.notifier.error(&message);
        BulkActionOutcome::Rejected(message)
    }

    fn policy_context(&self) -> PolicyContext<'_> {
        PolicyContext {
            operator: self.session.operator.as_ref(),
            requires_email_verification: self.requires_email_verification,
        }
    }

    fn publish(&self) {
        let selected = self.selected_users();
        let view = UserListView {
            rows: self.rows.clone(),
            total: self.total,
            pagination: self.table.pagination(),
            sort: self.table.sort(),
            search: self.table.search().map(str::to_owned),
            selection: selected.iter().map(|u| u.id).collect(),
            visible_columns: self.columns.visible().to_vec(),
            bulk_actions: bulk_action_sections(&selected, self.policy_context()),
            selection_mode: self.is_in_selection_mode(),
            requires_email_verification: self.requires_email_verification,
            highlight_banned_users: self.highlight_banned_users,
        };
        self.view_tx.send_replace(view);
    }
}
