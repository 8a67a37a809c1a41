use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::QuizError;
use crate::metrics::{SESSIONS_ACTIVE, SESSIONS_TOTAL};
use crate::models::{Question, QuizMode, QuizSession};

/// In-memory quiz sessions keyed by an opaque token.
///
/// Sessions expire after `idle_timeout` without activity. Expiry is checked on
/// every access and by [`SessionStore::sweep_expired`]; an expired session is
/// reported as [`QuizError::SessionNotFound`].
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, QuizSession>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn create(
        &self,
        topic: &str,
        mode: QuizMode,
        questions: Vec<Question>,
    ) -> QuizSession {
        let session_id = Uuid::new_v4().to_string();
        let session = QuizSession::new(&session_id, topic, mode, questions, Utc::now());

        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session.clone());

        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.inc();

        tracing::info!(
            "New session: {} [Topic: {}, Mode: {}, Questions: {}]",
            session_id,
            topic,
            mode.as_str(),
            session.total_questions()
        );

        session
    }

    /// Returns a snapshot of the session and refreshes its idle timer.
    pub async fn get(&self, session_id: &str) -> Result<QuizSession, QuizError> {
        self.update(session_id, |session| Ok(session.clone())).await
    }

    /// Runs `apply` against the live session under the write lock.
    pub async fn update<T, F>(&self, session_id: &str, apply: F) -> Result<T, QuizError>
    where
        F: FnOnce(&mut QuizSession) -> Result<T, QuizError>,
    {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get(session_id) {
            None => return Err(QuizError::SessionNotFound),
            Some(session) => session.is_expired(now, self.idle_timeout),
        };
        if expired {
            sessions.remove(session_id);
            record_expired(1);
            tracing::info!("Session expired on access: {}", session_id);
            return Err(QuizError::SessionNotFound);
        }

        let session = sessions
            .get_mut(session_id)
            .ok_or(QuizError::SessionNotFound)?;
        session.touch(now);

        let was_completed = session.is_completed();
        let outcome = apply(&mut *session);
        if !was_completed && session.is_completed() {
            SESSIONS_TOTAL.with_label_values(&["completed"]).inc();
            tracing::info!(
                "Session completed: {} (score {}/{})",
                session.id,
                session.score,
                session.total_questions()
            );
        }
        outcome
    }

    /// Drops the session; returns whether a live session existed.
    ///
    /// An idle-expired session is dropped too, but reported as absent.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.remove_at(session_id, Utc::now()).await
    }

    pub async fn remove_at(&self, session_id: &str, now: DateTime<Utc>) -> bool {
        let Some(session) = self.sessions.write().await.remove(session_id) else {
            return false;
        };
        if session.is_expired(now, self.idle_timeout) {
            record_expired(1);
            tracing::info!("Session expired on removal: {}", session_id);
            return false;
        }
        SESSIONS_ACTIVE.dec();
        tracing::info!("Session removed: {}", session_id);
        true
    }

    /// Removes every session idle past the timeout; returns how many.
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now()).await
    }

    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.idle_timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            record_expired(removed);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn record_expired(count: usize) {
    SESSIONS_TOTAL
        .with_label_values(&["expired"])
        .inc_by(count as u64);
    SESSIONS_ACTIVE.sub(count as i64);
}
