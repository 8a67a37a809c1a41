use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::{metrics::SESSION_SWEEPER_TICKS_TOTAL, services::session_store::SessionStore};

/// Periodically drops idle sessions so abandoned quizzes do not pile up.
pub struct SessionSweeper {
    sessions: SessionStore,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: SessionStore, interval: Duration) -> Self {
        Self { sessions, interval }
    }

    pub async fn run(&self) {
        info!(
            "Starting session sweeper loop (interval {}s)",
            self.interval.as_secs()
        );

        loop {
            sleep(self.interval).await;
            self.run_once().await;
        }
    }

    pub async fn run_once(&self) -> usize {
        let removed = self.sessions.sweep_expired().await;
        SESSION_SWEEPER_TICKS_TOTAL.inc();
        if removed > 0 {
            info!("Session sweeper removed {} expired sessions", removed);
        } else {
            debug!("Session sweeper tick: nothing to remove");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuizMode};

    #[tokio::test]
    async fn test_run_once_drops_idle_sessions() {
        let store = SessionStore::new(chrono::Duration::zero());
        store
            .create(
                "spanish",
                QuizMode::Vocabulary,
                vec![Question::vocabulary("hola", "hello")],
            )
            .await;
        sleep(Duration::from_millis(5)).await;

        let sweeper = SessionSweeper::new(store.clone(), Duration::from_secs(60));
        assert_eq!(sweeper.run_once().await, 1);
        assert!(store.is_empty().await);
    }
}
