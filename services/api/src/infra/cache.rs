use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::ChallengeStore;
use crate::domain::types::OtpSession;
use crate::error::ApiError;

fn session_key(session_id: &str) -> String {
    format!("otp_session:{session_id}")
}

// ── Redis-backed store ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisChallengeStore {
    pub pool: Pool,
}

impl ChallengeStore for RedisChallengeStore {
    async fn put(&self, session: &OtpSession) -> Result<(), ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let payload = serde_json::to_vec(session).map_err(|e| ApiError::Internal(e.into()))?;
        // The key lives until the evict deadline, not the expiry: in
        // between, a verify still finds the session and can answer
        // "expired" rather than "unknown".
        let ttl = (session.evict_deadline() - Utc::now()).num_seconds().max(1) as u64;
        let key = session_key(&session.session_id);
        let (): () = conn
            .set_ex(&key, payload, ttl)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }

    async fn take(&self, session_id: &str) -> Result<Option<OtpSession>, ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let key = session_key(session_id);
        let value: Option<Vec<u8>> = conn
            .get_del(&key)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        match value {
            Some(bytes) => {
                let session =
                    serde_json::from_slice(&bytes).map_err(|e| ApiError::Internal(e.into()))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn sweep(&self, _now: DateTime<Utc>) -> Result<usize, ApiError> {
        // Redis expires keys on its own
        Ok(0)
    }
}

// ── In-process store ─────────────────────────────────────────────────────────

/// Fallback when no `REDIS_URL` is configured. Sessions die with the
/// process, which only costs the user a fresh login code.
#[derive(Clone, Default)]
pub struct MemoryChallengeStore {
    sessions: Arc<Mutex<HashMap<String, OtpSession>>>,
}

impl MemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChallengeStore for MemoryChallengeStore {
    async fn put(&self, session: &OtpSession) -> Result<(), ApiError> {
        // A poisoned lock still holds a consistent map
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn take(&self, session_id: &str) -> Result<Option<OtpSession>, ApiError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        Ok(sessions.remove(session_id))
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ApiError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        let before = sessions.len();
        sessions.retain(|_, session| now <= session.evict_deadline());
        Ok(before - sessions.len())
    }
}

// ── Configured store ─────────────────────────────────────────────────────────

/// Whichever store the deployment runs on; picked once at startup.
#[derive(Clone)]
pub enum AnyChallengeStore {
    Redis(RedisChallengeStore),
    Memory(MemoryChallengeStore),
}

impl ChallengeStore for AnyChallengeStore {
    async fn put(&self, session: &OtpSession) -> Result<(), ApiError> {
        match self {
            AnyChallengeStore::Redis(store) => store.put(session).await,
            AnyChallengeStore::Memory(store) => store.put(session).await,
        }
    }

    async fn take(&self, session_id: &str) -> Result<Option<OtpSession>, ApiError> {
        match self {
            AnyChallengeStore::Redis(store) => store.take(session_id).await,
            AnyChallengeStore::Memory(store) => store.take(session_id).await,
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, ApiError> {
        match self {
            AnyChallengeStore::Redis(store) => store.sweep(now).await,
            AnyChallengeStore::Memory(store) => store.sweep(now).await,
        }
    }
}
