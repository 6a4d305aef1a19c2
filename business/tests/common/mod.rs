//! Recording collaborators for user-list controller tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tube_admin_business::models::{
    AccountBlockStatus, BlockStatus, ResultList, ServerConfig, SignupConfig, User, UserId,
    UserRole, UserUpdate,
};
use tube_admin_business::users::{
    AdminSession, BanModal, BlockStatusClient, ConfirmGate, Notifier, Operator,
    ServerConfigSource, UserChanged, UserChangedSender, UserDirectory, UserListController,
    UserListDeps,
};
use tube_admin_business::{AdminApiError, ApiResult, UserListQuery};
use ustr::Ustr;

pub const API_HOST: &str = "videos.example.org";

pub fn user(id: UserId, username: &str) -> User {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.org"),
        "emailVerified": false,
        "role": { "id": 2, "label": "User" },
        "blocked": false,
        "videoQuota": 1_073_741_824_i64,
        "videoQuotaDaily": -1,
        "videoQuotaUsed": 0,
        "videoQuotaUsedDaily": 0,
        "createdAt": "2024-01-01T00:00:00Z",
        "account": { "name": username, "host": API_HOST }
    }))
    .expect("fixture user decodes")
}

pub fn blocked_user(id: UserId, username: &str) -> User {
    let mut user = user(id, username);
    user.blocked = true;
    user
}

pub fn page(users: Vec<User>) -> ResultList<User> {
    ResultList {
        total: users.len() as u64,
        data: users,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    GetUsers(UserListQuery),
    Ban(Vec<Ustr>, Option<String>),
    Unban(Vec<Ustr>),
    Remove(Vec<Ustr>),
    Update(Vec<Ustr>, UserUpdate),
}

fn names(users: &[User]) -> Vec<Ustr> {
    users.iter().map(|u| u.username).collect()
}

/// Serves queued pages (the last one repeats) and records every call.
#[derive(Default)]
pub struct MockDirectory {
    pages: Mutex<VecDeque<ApiResult<ResultList<User>>>>,
    mutation_error: Mutex<Option<AdminApiError>>,
    calls: Mutex<Vec<DirectoryCall>>,
}

impl MockDirectory {
    pub fn with_pages(pages: Vec<ApiResult<ResultList<User>>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        })
    }

    pub fn fail_mutations_with(&self, error: AdminApiError) {
        *self.mutation_error.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_users_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, DirectoryCall::GetUsers(_)))
            .count()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, DirectoryCall::GetUsers(_)))
            .count()
    }

    fn record(&self, call: DirectoryCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_result(&self) -> ApiResult<()> {
        match self.mutation_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn get_users(&self, query: &UserListQuery) -> ApiResult<ResultList<User>> {
        self.record(DirectoryCall::GetUsers(query.clone()));
        let mut pages = self.pages.lock().unwrap();
        if pages.len() > 1 {
            pages.pop_front().unwrap()
        } else {
            pages.front().cloned().unwrap_or_else(|| Ok(page(Vec::new())))
        }
    }

    async fn ban_users(&self, users: &[User], reason: Option<&str>) -> ApiResult<()> {
        self.record(DirectoryCall::Ban(names(users), reason.map(str::to_owned)));
        self.mutation_result()
    }

    async fn unban_users(&self, users: &[User]) -> ApiResult<()> {
        self.record(DirectoryCall::Unban(names(users)));
        self.mutation_result()
    }

    async fn remove_users(&self, users: &[User]) -> ApiResult<()> {
        self.record(DirectoryCall::Remove(names(users)));
        self.mutation_result()
    }

    async fn update_users(&self, users: &[User], update: &UserUpdate) -> ApiResult<()> {
        self.record(DirectoryCall::Update(names(users), update.clone()));
        self.mutation_result()
    }
}

type BlockRule = Box<dyn Fn(&[String]) -> Vec<String> + Send + Sync>;

/// Answers with `blocked_by_server` for the handles its rule picks out of
/// each request.
pub struct MockBlockStatus {
    rule: BlockRule,
    fail: bool,
    requests: Mutex<Vec<Vec<String>>>,
}

impl MockBlockStatus {
    pub fn blocking(handles: &[&str]) -> Arc<Self> {
        let blocked: Vec<String> = handles.iter().map(|h| (*h).to_owned()).collect();
        Self::with_rule(move |_| blocked.clone())
    }

    pub fn with_rule(rule: impl Fn(&[String]) -> Vec<String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            rule: Box::new(rule),
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            rule: Box::new(|_| Vec::new()),
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlockStatusClient for MockBlockStatus {
    async fn get_block_status(&self, accounts: &[String]) -> ApiResult<BlockStatus> {
        self.requests.lock().unwrap().push(accounts.to_vec());
        if self.fail {
            return Err(AdminApiError::server(500, None));
        }
        let accounts: HashMap<String, AccountBlockStatus> = (self.rule)(accounts)
            .into_iter()
            .map(|handle| {
                (
                    handle,
                    AccountBlockStatus {
                        blocked_by_server: true,
                        blocked_by_user: None,
                    },
                )
            })
            .collect();
        Ok(BlockStatus { accounts })
    }
}

pub struct MockServerConfig {
    result: ApiResult<ServerConfig>,
}

impl MockServerConfig {
    pub fn requiring_email_verification(required: bool) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(ServerConfig {
                signup: SignupConfig {
                    allowed: true,
                    requires_email_verification: required,
                },
            }),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Err(AdminApiError::server(503, Some(message.to_owned()))),
        })
    }
}

#[async_trait]
impl ServerConfigSource for MockServerConfig {
    async fn get_config(&self) -> ApiResult<ServerConfig> {
        self.result.clone()
    }
}

/// Answers every prompt with a fixed value and records the prompts.
pub struct MockConfirm {
    answer: bool,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockConfirm {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmGate for MockConfirm {
    async fn confirm(&self, message: &str, title: &str) -> bool {
        self.prompts
            .lock()
            .unwrap()
            .push((message.to_owned(), title.to_owned()));
        self.answer
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<Notification> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message),
                Notification::Success(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(Notification::Error(message.to_owned()));
    }
}

/// Bans through the directory and signals completion, like the real dialog
/// after the operator confirms.
pub struct MockBanModal {
    directory: Arc<MockDirectory>,
    opened: Mutex<Vec<Vec<Ustr>>>,
}

impl MockBanModal {
    pub fn new(directory: Arc<MockDirectory>) -> Arc<Self> {
        Arc::new(Self {
            directory,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn opened(&self) -> Vec<Vec<Ustr>> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl BanModal for MockBanModal {
    async fn open(&self, users: Vec<User>, done: UserChangedSender) {
        self.opened.lock().unwrap().push(names(&users));
        if self
            .directory
            .ban_users(&users, Some("spam"))
            .await
            .is_ok()
        {
            done.send(UserChanged::for_users(&users))
                .expect("controller is alive");
        }
    }
}

pub struct RoleOperator(pub UserRole);

impl Operator for RoleOperator {
    fn can_manage(&self, user: &User) -> bool {
        match self.0 {
            UserRole::Administrator => true,
            UserRole::Moderator => user.role() == UserRole::User,
            UserRole::User | UserRole::Other(_) => false,
        }
    }
}

/// A controller wired to recording mocks.
pub struct Harness {
    pub controller: UserListController,
    pub directory: Arc<MockDirectory>,
    pub block_status: Arc<MockBlockStatus>,
    pub confirm: Arc<MockConfirm>,
    pub notifier: Arc<RecordingNotifier>,
    pub ban_modal: Arc<MockBanModal>,
}

pub struct HarnessBuilder {
    pages: Vec<ApiResult<ResultList<User>>>,
    block_status: Arc<MockBlockStatus>,
    server_config: Arc<MockServerConfig>,
    confirm: bool,
    role: UserRole,
}

impl HarnessBuilder {
    pub fn new(pages: Vec<ApiResult<ResultList<User>>>) -> Self {
        Self {
            pages,
            block_status: MockBlockStatus::blocking(&[]),
            server_config: MockServerConfig::requiring_email_verification(false),
            confirm: true,
            role: UserRole::Administrator,
        }
    }

    pub fn block_status(mut self, block_status: Arc<MockBlockStatus>) -> Self {
        self.block_status = block_status;
        self
    }

    pub fn server_config(mut self, server_config: Arc<MockServerConfig>) -> Self {
        self.server_config = server_config;
        self
    }

    pub fn confirm(mut self, answer: bool) -> Self {
        self.confirm = answer;
        self
    }

    pub fn role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn build(self) -> Harness {
        let directory = MockDirectory::with_pages(self.pages);
        let confirm = MockConfirm::answering(self.confirm);
        let notifier = Arc::new(RecordingNotifier::default());
        let ban_modal = MockBanModal::new(Arc::clone(&directory));

        let session = AdminSession::new(Arc::new(RoleOperator(self.role)), Ustr::from(API_HOST));
        let deps = UserListDeps {
            directory: directory.clone(),
            block_status: self.block_status.clone(),
            server_config: self.server_config,
            confirm: confirm.clone(),
            notifier: notifier.clone(),
            ban_modal: ban_modal.clone(),
        };

        Harness {
            controller: UserListController::new(session, deps),
            directory,
            block_status: self.block_status,
            confirm,
            notifier,
            ban_modal,
        }
    }
}
