use serde::Deserialize;
use ustr::Ustr;

use crate::models::{RoleRef, User, UserId, UserRole};
use crate::users::traits::Operator;

/// The logged-in operator, as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub username: Ustr,
    pub role: RoleRef,
}

impl AuthUser {
    pub fn role(&self) -> UserRole {
        self.role.id
    }
}

impl Operator for AuthUser {
    /// Administrators manage everyone; moderators only plain users.
    fn can_manage(&self, user: &User) -> bool {
        match self.role() {
            UserRole::Administrator => true,
            UserRole::Moderator => user.role() == UserRole::User,
            UserRole::User | UserRole::Other(_) => false,
        }
    }
}
