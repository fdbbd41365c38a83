use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub f_name: String,
    pub m_name: Option<String>,
    pub l_name: String,
    pub initials: String,
    pub profile_color: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Display fields returned by `/currentUser`.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub f_name: String,
    pub m_name: Option<String>,
    pub l_name: String,
    pub initials: String,
    pub username: String,
    pub profile_color: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            f_name: user.f_name,
            m_name: user.m_name,
            l_name: user.l_name,
            initials: user.initials,
            username: user.username,
            profile_color: user.profile_color,
        }
    }
}

/// A post joined with its author's display fields and like metadata for one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub edited: bool,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub f_name: String,
    pub m_name: Option<String>,
    pub l_name: String,
    pub initials: String,
    pub profile_color: String,
    pub like_count: i64,
    pub liked_by_current_user: bool,
}
