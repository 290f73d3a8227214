//! Wire models shared by the fetcher, the auth flow and the comment API.

use serde::{Deserialize, Serialize};

/// Identity of the visitor as reported by the comment service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub block: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub email_subscription: bool,
}

/// Remote configuration served by `GET /config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub version: String,
    pub edit_duration: u64,
    pub max_comment_size: u64,
    pub admins: Vec<String>,
    pub admin_email: String,
    /// Names of the enabled sign-in providers, in display order.
    pub auth_providers: Vec<String>,
    pub low_score: i64,
    pub critical_score: i64,
    pub positive_score: bool,
    pub readonly_age: u64,
    pub max_image_size: u64,
    pub simple_view: bool,
    pub anon_vote: bool,
    pub email_notifications: bool,
    pub emoji_enabled: bool,
}

/// Where a comment lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locator {
    pub site: String,
    pub url: String,
}

/// Edit marker on a comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    pub time: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub pid: String,
    pub text: String,
    #[serde(default)]
    pub orig: Option<String>,
    pub user: User,
    pub locator: Locator,
    #[serde(default)]
    pub score: i64,
    /// The visitor's own vote on this comment (-1, 0, 1).
    #[serde(default)]
    pub vote: i64,
    #[serde(default)]
    pub controversy: f64,
    pub time: String,
    #[serde(default)]
    pub edit: Option<Edit>,
    #[serde(default)]
    pub pin: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub title: Option<String>,
}

/// A comment with its replies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub comment: Comment,
    #[serde(default)]
    pub replies: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostInfo {
    pub url: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub first_time: Option<String>,
    #[serde(default)]
    pub last_time: Option<String>,
}

/// Comment tree of a page (`GET /find?format=tree`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub comments: Vec<Node>,
    pub info: PostInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentCount {
    pub url: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserComments {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockedUser {
    pub id: String,
    pub name: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub block: bool,
    pub site_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMeResponse {
    pub user_id: String,
    pub link: String,
}

/// Server reply to a picture upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PictureUploaded {
    pub id: String,
}

/// Uploaded image as presented to the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub name: String,
    pub size: usize,
    pub content_type: String,
    pub url: String,
}

/// How long a user block lasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockTtl {
    Permanently,
    /// Server duration string such as `"43200m"`
    For(String),
}

/// Comment ordering accepted by `/find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sorting {
    #[default]
    NewestFirst,
    OldestFirst,
    BestScore,
    WorstScore,
    MostControversial,
    LeastControversial,
    RecentlyActive,
}

impl Sorting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sorting::NewestFirst => "-time",
            Sorting::OldestFirst => "+time",
            Sorting::BestScore => "-score",
            Sorting::WorstScore => "+score",
            Sorting::MostControversial => "-controversy",
            Sorting::LeastControversial => "+controversy",
            Sorting::RecentlyActive => "-active",
        }
    }
}
