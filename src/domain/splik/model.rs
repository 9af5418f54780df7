use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Splik {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<f64>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub status: String,
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
    pub views: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub boost_score: i32,
    pub is_currently_boosted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert for a freshly uploaded splik
#[derive(Debug, Clone)]
pub struct NewSplik {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration: f64,
    pub file_size: i64,
    pub mime_type: String,
    pub trim_start: f64,
    pub trim_end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub splik_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A view event, deduplicated per (splik, session)
#[derive(Debug, Clone)]
pub struct ViewRecord {
    pub splik_id: Uuid,
    pub session_id: String,
    pub viewer_id: Option<Uuid>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewOutcome {
    pub new_view: bool,
    pub view_count: i64,
}
