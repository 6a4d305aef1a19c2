//! Bulk moderation actions and the policy deciding when each one applies.

use crate::models::User;
use crate::users::traits::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkActionKind {
    Delete,
    Ban,
    Unban,
    SetEmailVerified,
}

/// Render order: destructive actions first, then account maintenance.
pub const BULK_ACTION_SECTIONS: &[&[BulkActionKind]] = &[
    &[
        BulkActionKind::Delete,
        BulkActionKind::Ban,
        BulkActionKind::Unban,
    ],
    &[BulkActionKind::SetEmailVerified],
];

/// Everything the policy reads besides the selection itself.
#[derive(Clone, Copy)]
pub struct PolicyContext<'a> {
    pub operator: &'a dyn Operator,
    pub requires_email_verification: bool,
}

impl BulkActionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Delete => "Delete",
            Self::Ban => "Ban",
            Self::Unban => "Unban",
            Self::SetEmailVerified => "Set Email as Verified",
        }
    }

    pub fn description(self) -> Option<&'static str> {
        match self {
            Self::Delete => Some("Videos will be deleted, comments will be tombstoned."),
            Self::Ban => Some(
                "User won't be able to login anymore, but videos and comments will be kept as is.",
            ),
            Self::Unban | Self::SetEmailVerified => None,
        }
    }

    /// Whether the action applies to every user of the selection.
    pub fn is_displayed(self, users: &[User], ctx: PolicyContext<'_>) -> bool {
        let can_manage = |u: &User| ctx.operator.can_manage(u);
        match self {
            Self::Delete => users.iter().all(can_manage),
            Self::Ban => users.iter().all(|u| can_manage(u) && !u.blocked),
            Self::Unban => users.iter().all(|u| can_manage(u) && u.blocked),
            Self::SetEmailVerified => {
                ctx.requires_email_verification
                    && users
                        .iter()
                        .all(|u| can_manage(u) && !u.blocked && u.email_verified == Some(false))
            }
        }
    }

    /// Message shown when the selection targets `root`. Only destructive
    /// account actions guard against it.
    pub fn root_guard_message(self) -> Option<&'static str> {
        match self {
            Self::Delete => Some("You cannot delete root."),
            Self::Ban => Some("You cannot ban root."),
            Self::Unban | Self::SetEmailVerified => None,
        }
    }

    pub fn not_allowed_message(self, count: usize) -> String {
        format!(
            "{} is not allowed for the {count} selected users.",
            self.label()
        )
    }

    /// Confirmation prompt as `(message, title)`, for actions that ask first.
    pub fn confirmation(self, count: usize) -> Option<(String, &'static str)> {
        match self {
            Self::Delete => Some((
                format!(
                    "Do you really want to delete {count} users? \
                     If you remove these users, you will not be able to create others with the same username!"
                ),
                "Delete",
            )),
            Self::Unban => Some((format!("Do you really want to unban {count} users?"), "Unban")),
            Self::Ban | Self::SetEmailVerified => None,
        }
    }

    pub fn success_message(self, count: usize) -> String {
        match self {
            Self::Delete => format!("{count} users deleted."),
            Self::Ban => format!("{count} users banned."),
            Self::Unban => format!("{count} users unbanned."),
            Self::SetEmailVerified => format!("{count} users email set as verified."),
        }
    }
}

/// One rendered entry of the bulk-action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkActionEntry {
    pub kind: BulkActionKind,
    pub label: &'static str,
    pub description: Option<&'static str>,
    pub displayed: bool,
}

/// Evaluate every section against `users`.
pub fn bulk_action_sections(users: &[User], ctx: PolicyContext<'_>) -> Vec<Vec<BulkActionEntry>> {
    BULK_ACTION_SECTIONS
        .iter()
        .map(|section| {
            section
                .iter()
                .map(|&kind| BulkActionEntry {
                    kind,
                    label: kind.label(),
                    description: kind.description(),
                    displayed: kind.is_displayed(users, ctx),
                })
                .collect()
        })
        .collect()
}

/// Terminal state of one bulk action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkActionOutcome {
    /// Nothing was selected.
    NothingSelected,
    /// A precondition failed; the message was sent to the notifier.
    Rejected(String),
    /// The operator declined the confirmation prompt.
    Declined,
    /// The ban dialog took over for this many users.
    ModalOpened(usize),
    /// The mutation succeeded and the list was reloaded.
    Reloaded(usize),
    /// The mutation failed with this server message.
    Failed(String),
}

impl BulkActionOutcome {
    /// Refusals and server errors. Declining or selecting nothing is not a
    /// failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::Failed(_))
    }
}
