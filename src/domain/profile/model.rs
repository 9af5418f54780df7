use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Profile record as stored. Most naming columns are optional and older rows
/// only carry some of them.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub username: Option<String>,
    #[sqlx(default)]
    pub handle: Option<String>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub followers_count: Option<i64>,
    pub following_count: Option<i64>,
    pub spliks_count: Option<i64>,
    pub is_private: Option<bool>,
    #[sqlx(default)]
    pub followers_private: Option<bool>,
    #[sqlx(default)]
    pub following_private: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The one profile shape the rest of the crate sees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    /// Path segment for the profile page
    pub slug: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub spliks_count: i64,
    pub is_private: bool,
    /// Only the owner may list who follows them
    pub followers_private: bool,
    /// Only the owner may list who they follow
    pub following_private: bool,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        let username = non_blank(&row.username);
        let handle = non_blank(&row.handle);

        let full_name = match (non_blank(&row.first_name), non_blank(&row.last_name)) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        };

        let display_name = non_blank(&row.display_name)
            .map(str::to_string)
            .or(full_name)
            .or_else(|| username.map(str::to_string))
            .unwrap_or_else(|| "Unknown User".to_string());

        let canonical_username = username.or(handle).unwrap_or("unknown").to_string();
        let slug = username
            .or(handle)
            .map(str::to_string)
            .unwrap_or_else(|| row.id.to_string());

        Profile {
            id: row.id,
            username: canonical_username,
            display_name,
            slug,
            avatar_url: row.avatar_url,
            bio: row.bio,
            city: row.city,
            followers_count: row.followers_count.unwrap_or(0),
            following_count: row.following_count.unwrap_or(0),
            spliks_count: row.spliks_count.unwrap_or(0),
            is_private: row.is_private.unwrap_or(false),
            followers_private: row.followers_private.unwrap_or(false),
            following_private: row.following_private.unwrap_or(false),
        }
    }
}
