//! REST implementations of the user-list collaborators.
//!
//! Batch mutations fan out to one request per user, in selection order, and
//! stop at the first failure. The server has no batch endpoint for them.

use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use crate::config::BusinessConfig;
use crate::error::ApiResult;
use crate::http::Client;
use crate::models::{
    BlockStatus, LiveVideo, ResultList, ServerConfig, User, UserNotification, UserUpdate,
};
use crate::table::UserListQuery;
use crate::users::operator::AuthUser;
use crate::users::traits::{BlockStatusClient, ServerConfigSource, UserDirectory};

#[derive(Debug, Serialize)]
struct BlockUserRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

/// Admin API client for one instance.
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
}

impl AdminClient {
    pub fn new(config: &BusinessConfig) -> ApiResult<Self> {
        Ok(Self {
            http: Client::new(config)?,
        })
    }

    /// GET `/users/me`
    pub async fn get_me(&self) -> ApiResult<AuthUser> {
        self.http
            .get("users/me")
            .send_ok()
            .await?
            .json("AuthUser")
    }

    /// GET `/users/me/notifications`
    pub async fn list_notifications(
        &self,
        start: u64,
        count: u32,
        unread_only: bool,
    ) -> ApiResult<ResultList<UserNotification>> {
        self.http
            .get("users/me/notifications")
            .query("start", start)
            .query("count", count)
            .query("sort", "-createdAt")
            .query_opt("unread", unread_only.then_some(true))
            .send_ok()
            .await?
            .json("UserNotificationList")
    }

    /// GET `/videos/live/{id}`
    pub async fn get_live(&self, video_id: &str) -> ApiResult<LiveVideo> {
        self.http
            .get(&format!("videos/live/{video_id}"))
            .send_ok()
            .await?
            .json("LiveVideo")
    }
}

#[async_trait]
impl UserDirectory for AdminClient {
    /// GET `/users?start&count&sort&search&blocked`
    async fn get_users(&self, query: &UserListQuery) -> ApiResult<ResultList<User>> {
        let mut request = self.http.get("users");
        for (name, value) in query.to_query_pairs() {
            request = request.query(name, value);
        }
        request.send_ok().await?.json("UserList")
    }

    /// POST `/users/{id}/block`
    async fn ban_users(&self, users: &[User], reason: Option<&str>) -> ApiResult<()> {
        let body = BlockUserRequest { reason };
        for user in users {
            debug!("Banning {}", user.username);
            self.http
                .post(&format!("users/{}/block", user.id))
                .json(&body)?
                .send_ok()
                .await?;
        }
        Ok(())
    }

    /// POST `/users/{id}/unblock`
    async fn unban_users(&self, users: &[User]) -> ApiResult<()> {
        for user in users {
            debug!("Unbanning {}", user.username);
            self.http
                .post(&format!("users/{}/unblock", user.id))
                .send_ok()
                .await?;
        }
        Ok(())
    }

    /// DELETE `/users/{id}`
    async fn remove_users(&self, users: &[User]) -> ApiResult<()> {
        for user in users {
            debug!("Deleting {}", user.username);
            self.http
                .delete(&format!("users/{}", user.id))
                .send_ok()
                .await?;
        }
        Ok(())
    }

    /// PUT `/users/{id}`
    async fn update_users(&self, users: &[User], update: &UserUpdate) -> ApiResult<()> {
        for user in users {
            debug!("Updating {}", user.username);
            self.http
                .put(&format!("users/{}", user.id))
                .json(update)?
                .send_ok()
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlockStatusClient for AdminClient {
    /// GET `/blocklist/status?accounts=a&accounts=b`
    async fn get_block_status(&self, accounts: &[String]) -> ApiResult<BlockStatus> {
        let mut request = self.http.get("blocklist/status");
        for account in accounts {
            request = request.query("accounts", account);
        }
        request.send_ok().await?.json("BlockStatus")
    }
}

#[async_trait]
impl ServerConfigSource for AdminClient {
    /// GET `/config`
    async fn get_config(&self) -> ApiResult<ServerConfig> {
        self.http.get("config").send_ok().await?.json("ServerConfig")
    }
}
