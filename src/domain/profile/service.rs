use async_trait::async_trait;
use moka::future::Cache;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{Profile, ProfileChanges, ProfileRepository, UpdateProfileRequest};
use crate::domain::auth::Session;
use crate::error::{AppError, AppResult};

pub const RISING_CREATORS_LIMIT: i64 = 6;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;
pub const MAX_DISPLAY_NAME_CHARS: usize = 50;
pub const MAX_BIO_CHARS: usize = 500;

/// Trim, drop a leading `@` and check the allowed alphabet
pub fn normalize_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    let username = username.strip_prefix('@').unwrap_or(username);

    let len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
        return Err(AppError::BadRequest(format!(
            "Username must be {} to {} characters",
            USERNAME_MIN_CHARS, USERNAME_MAX_CHARS
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(AppError::BadRequest(
            "Username can only contain letters, numbers, underscores and periods".to_string(),
        ));
    }
    Ok(username.to_string())
}

fn bounded_text(
    value: Option<String>,
    max_chars: usize,
    field: &str,
) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim().to_string();
    if value.chars().count() > max_chars {
        return Err(AppError::BadRequest(format!(
            "{} must be {} characters or fewer",
            field, max_chars
        )));
    }
    Ok(Some(value))
}

impl TryFrom<UpdateProfileRequest> for ProfileChanges {
    type Error = AppError;

    fn try_from(request: UpdateProfileRequest) -> AppResult<Self> {
        Ok(ProfileChanges {
            username: request.username.as_deref().map(normalize_username).transpose()?,
            display_name: bounded_text(
                request.display_name,
                MAX_DISPLAY_NAME_CHARS,
                "Display name",
            )?,
            bio: bounded_text(request.bio, MAX_BIO_CHARS, "Bio")?,
            city: bounded_text(request.city, MAX_DISPLAY_NAME_CHARS, "City")?,
            avatar_url: None,
            followers_private: request.followers_private,
            following_private: request.following_private,
        })
    }
}

pub struct ProfileService {
    profile_repo: Arc<dyn ProfileRepository>,
    cache: Option<Cache<Uuid, Profile>>,
}

impl ProfileService {
    pub fn new(profile_repo: Arc<dyn ProfileRepository>, cache_enabled: bool) -> Self {
        // Counters go stale quickly, keep entries short-lived
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(10_000)
                    .time_to_live(Duration::from_secs(60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            profile_repo,
            cache,
        }
    }

    async fn apply(&self, id: Uuid, changes: &ProfileChanges) -> AppResult<Option<Profile>> {
        let row = self.profile_repo.update(id, changes).await?;
        self.invalidate(id).await;
        Ok(row.map(Profile::from))
    }

    /// Store a freshly uploaded avatar. `None` when the user has no profile yet.
    pub async fn set_avatar(&self, user_id: Uuid, avatar_url: &str) -> AppResult<Option<Profile>> {
        let changes = ProfileChanges {
            avatar_url: Some(avatar_url.to_string()),
            ..Default::default()
        };
        self.apply(user_id, &changes).await
    }

    /// Owners always see their own lists
    fn check_list_visible(session: &Session, profile: &Profile, private: bool) -> AppResult<()> {
        if private && session.user_id() != Some(profile.id) {
            return Err(AppError::Forbidden("This list is private".to_string()));
        }
        Ok(())
    }

    /// Drop a cached profile after one of its counters changed
    pub async fn invalidate(&self, id: Uuid) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&id).await;
        }
    }

    async fn remember(&self, profile: &Profile) {
        if let Some(cache) = &self.cache {
            cache.insert(profile.id, profile.clone()).await;
        }
    }
}

#[async_trait]
pub trait ProfileServiceApi: Send + Sync {
    async fn find(&self, id: Uuid) -> AppResult<Option<Profile>>;

    async fn get(&self, id: Uuid) -> AppResult<Profile>;

    /// Profiles keyed by id; unknown ids are left out
    async fn get_many(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Profile>>;

    async fn followers(&self, session: &Session, profile_id: Uuid) -> AppResult<Vec<Profile>>;

    async fn following(&self, session: &Session, profile_id: Uuid) -> AppResult<Vec<Profile>>;

    async fn recent(&self, limit: i64) -> AppResult<Vec<Profile>>;

    /// Edit the caller's own profile
    async fn update_profile(
        &self,
        session: &Session,
        request: UpdateProfileRequest,
    ) -> AppResult<Profile>;
}

#[async_trait]
impl ProfileServiceApi for ProfileService {
    async fn find(&self, id: Uuid) -> AppResult<Option<Profile>> {
        if let Some(cache) = &self.cache {
            if let Some(profile) = cache.get(&id).await {
                tracing::trace!(profile_id = %id, "Profile cache hit");
                return Ok(Some(profile));
            }
        }

        let Some(row) = self.profile_repo.find_by_id(id).await? else {
            return Ok(None);
        };
        let profile = Profile::from(row);
        self.remember(&profile).await;
        Ok(Some(profile))
    }

    async fn get(&self, id: Uuid) -> AppResult<Profile> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    async fn get_many(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, Profile>> {
        let mut found = HashMap::with_capacity(ids.len());
        let mut missing = Vec::new();

        for id in ids {
            if found.contains_key(id) || missing.contains(id) {
                continue;
            }
            let cached = match &self.cache {
                Some(cache) => cache.get(id).await,
                None => None,
            };
            match cached {
                Some(profile) => {
                    found.insert(*id, profile);
                }
                None => missing.push(*id),
            }
        }

        if !missing.is_empty() {
            for row in self.profile_repo.find_by_ids(&missing).await? {
                let profile = Profile::from(row);
                self.remember(&profile).await;
                found.insert(profile.id, profile);
            }
        }

        Ok(found)
    }

    async fn followers(&self, session: &Session, profile_id: Uuid) -> AppResult<Vec<Profile>> {
        let profile = self.get(profile_id).await?;
        Self::check_list_visible(session, &profile, profile.followers_private)?;
        let rows = self.profile_repo.followers(profile_id).await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn following(&self, session: &Session, profile_id: Uuid) -> AppResult<Vec<Profile>> {
        let profile = self.get(profile_id).await?;
        Self::check_list_visible(session, &profile, profile.following_private)?;
        let rows = self.profile_repo.following(profile_id).await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<Profile>> {
        let rows = self.profile_repo.recent(limit).await?;
        Ok(rows.into_iter().map(Profile::from).collect())
    }

    async fn update_profile(
        &self,
        session: &Session,
        request: UpdateProfileRequest,
    ) -> AppResult<Profile> {
        let user = session.require_user("edit your profile")?;
        let changes = ProfileChanges::try_from(request)?;
        if changes.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        let profile = self
            .apply(user.user_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
        tracing::info!(user_id = %user.user_id, "Profile updated");
        Ok(profile)
    }
}
