//! User notifications.
//!
//! Every payload is optional: which one is present depends on
//! [`UserNotificationType`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

/// Wire ids are 1-based and follow declaration order. Ids this client
/// doesn't know are kept as [`UserNotificationType::Other`] so one newer
/// notification can't fail the whole page decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum UserNotificationType {
    NewVideoFromSubscription,
    NewCommentOnMyVideo,
    NewAbuseForModerators,
    BlacklistOnMyVideo,
    UnblacklistOnMyVideo,
    MyVideoPublished,
    MyVideoImportSuccess,
    MyVideoImportError,
    NewUserRegistration,
    NewFollow,
    CommentMention,
    VideoAutoBlacklistForModerators,
    NewInstanceFollower,
    AutoInstanceFollowing,
    AbuseStateChange,
    AbuseNewMessage,
    NewPluginVersion,
    NewPlatformVersion,
    Other(u8),
}

const NOTIFICATION_TYPES: [UserNotificationType; 18] = [
    UserNotificationType::NewVideoFromSubscription,
    UserNotificationType::NewCommentOnMyVideo,
    UserNotificationType::NewAbuseForModerators,
    UserNotificationType::BlacklistOnMyVideo,
    UserNotificationType::UnblacklistOnMyVideo,
    UserNotificationType::MyVideoPublished,
    UserNotificationType::MyVideoImportSuccess,
    UserNotificationType::MyVideoImportError,
    UserNotificationType::NewUserRegistration,
    UserNotificationType::NewFollow,
    UserNotificationType::CommentMention,
    UserNotificationType::VideoAutoBlacklistForModerators,
    UserNotificationType::NewInstanceFollower,
    UserNotificationType::AutoInstanceFollowing,
    UserNotificationType::AbuseStateChange,
    UserNotificationType::AbuseNewMessage,
    UserNotificationType::NewPluginVersion,
    UserNotificationType::NewPlatformVersion,
];

impl From<u8> for UserNotificationType {
    fn from(id: u8) -> Self {
        id.checked_sub(1)
            .and_then(|index| NOTIFICATION_TYPES.get(usize::from(index)))
            .copied()
            .unwrap_or(Self::Other(id))
    }
}

impl From<UserNotificationType> for u8 {
    fn from(kind: UserNotificationType) -> Self {
        if let UserNotificationType::Other(id) = kind {
            return id;
        }
        NOTIFICATION_TYPES
            .iter()
            .zip(1u8..)
            .find_map(|(known, id)| (*known == kind).then_some(id))
            .unwrap_or_default()
    }
}

impl UserNotificationType {
    pub fn description(self) -> &'static str {
        match self {
            Self::NewVideoFromSubscription => "New video from a subscription",
            Self::NewCommentOnMyVideo => "New comment on your video",
            Self::NewAbuseForModerators => "New abuse report",
            Self::BlacklistOnMyVideo => "Your video was blocked",
            Self::UnblacklistOnMyVideo => "Your video was unblocked",
            Self::MyVideoPublished => "Your video was published",
            Self::MyVideoImportSuccess => "Video import finished",
            Self::MyVideoImportError => "Video import failed",
            Self::NewUserRegistration => "New user registration",
            Self::NewFollow => "New follower",
            Self::CommentMention => "You were mentioned in a comment",
            Self::VideoAutoBlacklistForModerators => "Video automatically blocked",
            Self::NewInstanceFollower => "New instance follower",
            Self::AutoInstanceFollowing => "Instance automatically followed",
            Self::AbuseStateChange => "Abuse report state changed",
            Self::AbuseNewMessage => "New message on abuse report",
            Self::NewPluginVersion => "New plugin version available",
            Self::NewPlatformVersion => "New platform version available",
            Self::Other(_) => "Notification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub id: u64,
    pub uuid: String,
    #[serde(default, rename = "shortUUID")]
    pub short_uuid: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarInfo {
    pub width: u32,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorInfo {
    pub id: u64,
    pub display_name: String,
    pub name: Ustr,
    pub host: Ustr,
    #[serde(default)]
    pub avatars: Vec<AvatarInfo>,
}

impl ActorInfo {
    pub fn handle(&self) -> String {
        format!("{}@{}", self.name, self.host)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelVideoInfo {
    #[serde(flatten)]
    pub video: VideoInfo,
    pub channel: ActorInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoImportInfo {
    pub id: u64,
    #[serde(default)]
    pub video: Option<VideoInfo>,
    #[serde(default)]
    pub torrent_name: Option<String>,
    #[serde(default)]
    pub magnet_uri: Option<String>,
    #[serde(default)]
    pub target_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInfo {
    pub id: u64,
    pub thread_id: u64,
    pub account: ActorInfo,
    pub video: VideoInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbuseCommentInfo {
    pub thread_id: u64,
    pub video: VideoInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbuseInfo {
    pub id: u64,
    /// 1 = pending, 2 = rejected, 3 = accepted.
    pub state: u8,
    #[serde(default)]
    pub video: Option<VideoInfo>,
    #[serde(default)]
    pub comment: Option<AbuseCommentInfo>,
    #[serde(default)]
    pub account: Option<ActorInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoBlacklistInfo {
    pub id: u64,
    pub video: VideoInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowingType {
    Account,
    Channel,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingInfo {
    #[serde(rename = "type")]
    pub kind: FollowingType,
    pub name: String,
    pub display_name: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorFollowInfo {
    pub id: u64,
    pub follower: ActorInfo,
    /// `pending`, `accepted` or `rejected`.
    pub state: String,
    pub following: FollowingInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub name: String,
    /// 1 = plugin, 2 = theme.
    #[serde(rename = "type")]
    pub kind: u8,
    pub latest_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformVersionInfo {
    pub latest_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: UserNotificationType,
    pub read: bool,
    #[serde(default)]
    pub video: Option<ChannelVideoInfo>,
    #[serde(default)]
    pub video_import: Option<VideoImportInfo>,
    #[serde(default)]
    pub comment: Option<CommentInfo>,
    #[serde(default)]
    pub abuse: Option<AbuseInfo>,
    #[serde(default)]
    pub video_blacklist: Option<VideoBlacklistInfo>,
    #[serde(default)]
    pub account: Option<ActorInfo>,
    #[serde(default)]
    pub actor_follow: Option<ActorFollowInfo>,
    #[serde(default)]
    pub plugin: Option<PluginInfo>,
    /// Payload of [`UserNotificationType::NewPlatformVersion`].
    #[serde(default, rename = "peertube")]
    pub platform: Option<PlatformVersionInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserNotification {
    /// One-line summary: the type description plus the most specific subject.
    pub fn summary(&self) -> String {
        let subject = self
            .video
            .as_ref()
            .map(|v| v.video.name.clone())
            .or_else(|| self.comment.as_ref().map(|c| c.video.name.clone()))
            .or_else(|| self.video_blacklist.as_ref().map(|b| b.video.name.clone()))
            .or_else(|| {
                self.video_import
                    .as_ref()
                    .and_then(|i| i.video.as_ref().map(|v| v.name.clone()))
            })
            .or_else(|| self.account.as_ref().map(ActorInfo::handle))
            .or_else(|| self.actor_follow.as_ref().map(|f| f.follower.handle()))
            .or_else(|| self.abuse.as_ref().map(|a| format!("report #{}", a.id)))
            .or_else(|| {
                self.plugin
                    .as_ref()
                    .map(|p| format!("{} {}", p.name, p.latest_version))
            })
            .or_else(|| self.platform.as_ref().map(|p| p.latest_version.clone()));

        match subject {
            Some(subject) => format!("{}: {subject}", self.kind.description()),
            None => self.kind.description().to_owned(),
        }
    }
}
