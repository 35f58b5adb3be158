use std::{sync::Arc, time::Duration};

use anyhow::Result;
use taskhelper_core::auth::SessionStore;
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, error};

use crate::infra::app_state::AppState;

/// Work run once the state is wired, before the listener accepts traffic.
pub trait StartupHooks: Send + Sync {
    fn run(&self, state: &AppState) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct ProdStartupHooks;

impl StartupHooks for ProdStartupHooks {
    fn run(&self, state: &AppState) -> Result<()> {
        spawn_session_sweeper(
            Arc::clone(&state.sessions),
            state.config.session.sweep_interval,
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopStartupHooks;

impl StartupHooks for NoopStartupHooks {
    fn run(&self, _state: &AppState) -> Result<()> {
        Ok(())
    }
}

/// Periodically purge expired sessions. Lookups already ignore expired
/// entries; this only bounds memory.
pub fn spawn_session_sweeper(sessions: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(first_tick) = Instant::now().checked_add(every) else {
            error!(
                interval_secs = every.as_secs(),
                "session sweep interval out of range; expired sessions will not be purged"
            );
            return;
        };
        let mut interval = tokio::time::interval_at(first_tick, every);
        loop {
            interval.tick().await;
            let removed = sessions.purge_expired();
            debug!(removed, remaining = sessions.len(), "session sweep finished");
        }
    })
}
