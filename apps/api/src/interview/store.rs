use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use super::session::MockInterview;

pub type SessionHandle = Arc<Mutex<MockInterview>>;

pub const DEFAULT_IDLE_TTL_SECS: u32 = 60 * 60;

/// In-process session map. Each entry has its own lock, held by a handler for the
/// whole interaction, so one session's events are serialized while others proceed.
/// Nothing is persisted; sessions vanish with the process.
///
/// Sessions untouched for longer than the idle TTL are swept whenever a new one is
/// inserted. A session whose lock is held is in use and always survives the sweep.
#[derive(Clone)]
pub struct InterviewStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    idle_ttl: Duration,
}

impl Default for InterviewStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::seconds(DEFAULT_IDLE_TTL_SECS.into()))
    }
}

impl InterviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn insert(&self, session: MockInterview) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        let mut sessions = self.sessions.write().await;
        let evicted = sweep_idle(&mut sessions, self.idle_ttl);
        if evicted > 0 {
            info!("Evicted {evicted} idle interview session(s)");
        }
        sessions.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn sweep_idle(sessions: &mut HashMap<Uuid, SessionHandle>, idle_ttl: Duration) -> usize {
    let now = Utc::now();
    let before = sessions.len();
    sessions.retain(|_, handle| match handle.try_lock() {
        Ok(session) => now - session.updated_at <= idle_ttl,
        Err(_) => true,
    });
    before - sessions.len()
}
