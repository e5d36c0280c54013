//! Durable session cache: auth token, cached profile and user type.
//!
//! No expiry logic lives here: token validity is decided by the remote
//! service's responses, not locally.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use models::user::{Profile, Session, UserType};

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

const KEY_TOKEN: &str = "auth_token";
const KEY_PROFILE: &str = "profile";
const KEY_USER_TYPE: &str = "user_type";
const KEY_LOGGED_IN: &str = "logged_in";

/// File-backed session store over a [`JsonMapStore`].
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<JsonMapStore<String, String>>,
}

impl SessionStore {
    /// Open (or create) the session file at the given path.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::new(path).await?;
        Ok(Arc::new(Self { store }))
    }

    /// Persist token, profile and user type in a single write.
    pub async fn save(
        &self,
        token: &str,
        profile: &Profile,
        user_type: UserType,
    ) -> Result<(), ServiceError> {
        if token.trim().is_empty() {
            return Err(ServiceError::Validation("session token must not be empty".into()));
        }
        let profile_json =
            serde_json::to_string(profile).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let token = token.to_string();
        self.store
            .update_map(move |m| {
                m.insert(KEY_TOKEN.to_string(), token);
                m.insert(KEY_PROFILE.to_string(), profile_json);
                m.insert(KEY_USER_TYPE.to_string(), user_type.to_string());
                m.insert(KEY_LOGGED_IN.to_string(), "true".to_string());
            })
            .await
    }

    /// Current cached session; every field is optional. A corrupt cached
    /// profile degrades to `None` instead of failing the load.
    pub async fn load(&self) -> Session {
        let map = self.store.snapshot().await;
        let profile = map.get(KEY_PROFILE).and_then(|raw| {
            serde_json::from_str::<Profile>(raw)
                .map_err(|e| warn!(error = %e, "discarding unreadable cached profile"))
                .ok()
        });
        let user_type = map.get(KEY_USER_TYPE).and_then(|s| s.parse::<UserType>().ok());
        Session { token: map.get(KEY_TOKEN).cloned(), profile, user_type }
    }

    /// Cached bearer token, if any.
    pub async fn token(&self) -> Option<String> {
        self.store.get(&KEY_TOKEN.to_string()).await
    }

    /// Remove every session key in one persist.
    pub async fn clear(&self) -> Result<(), ServiceError> {
        self.store.update_map(|m| m.clear()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session_path() -> PathBuf {
        std::env::temp_dir().join(format!("damu_session_{}.json", uuid::Uuid::new_v4()))
    }

    fn sample_profile() -> Profile {
        Profile {
            id: Some(42),
            name: Some("Jane Wanjiku".into()),
            blood_type: Some("O+".into()),
            county: Some("Kiambu County".into()),
            constituency: Some("Ruiru".into()),
            ..Profile::default()
        }
    }

    #[tokio::test]
    async fn save_load_round_trip_survives_reopen() -> Result<(), anyhow::Error> {
        let path = temp_session_path();
        let store = SessionStore::open(&path).await?;

        store.save("tok-123", &sample_profile(), UserType::Donor).await?;

        let session = store.load().await;
        assert!(session.is_logged_in());
        assert_eq!(session.token.as_deref(), Some("tok-123"));
        assert_eq!(session.user_type, Some(UserType::Donor));
        assert_eq!(session.profile.unwrap().name.as_deref(), Some("Jane Wanjiku"));

        // a fresh store over the same file sees the same triple
        let reopened = SessionStore::open(&path).await?;
        let session = reopened.load().await;
        assert_eq!(session.token.as_deref(), Some("tok-123"));
        assert_eq!(reopened.token().await.as_deref(), Some("tok-123"));

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn clear_removes_all_session_keys() -> Result<(), anyhow::Error> {
        let path = temp_session_path();
        let store = SessionStore::open(&path).await?;
        store.save("tok-abc", &sample_profile(), UserType::Doctor).await?;

        store.clear().await?;

        let session = store.load().await;
        assert!(!session.is_logged_in());
        assert!(session.profile.is_none());
        assert!(session.user_type.is_none());
        assert!(store.token().await.is_none());

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn empty_token_is_rejected() -> Result<(), anyhow::Error> {
        let path = temp_session_path();
        let store = SessionStore::open(&path).await?;
        let err = store.save("  ", &sample_profile(), UserType::Donor).await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        assert!(!store.load().await.is_logged_in());
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
