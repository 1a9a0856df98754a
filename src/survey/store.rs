use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::session::SurveySession;
use crate::catalog::Catalog;

pub type SharedSession = Arc<Mutex<SurveySession>>;

/// Sessions untouched for this long are dropped by [`SessionStore::cleanup`].
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(60 * 60);

struct Entry {
    session: SharedSession,
    touched: Instant,
}

/// Independent survey sessions keyed by id.
///
/// Sessions share nothing but the read-only catalog.
#[derive(Clone)]
pub struct SessionStore {
    catalog: Arc<Catalog>,
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn create(&self) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(SurveySession::new(Arc::clone(&self.catalog))));
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .insert(
                id,
                Entry {
                    session: Arc::clone(&session),
                    touched: Instant::now(),
                },
            );
        (id, session)
    }

    /// Looks up a session and marks it as recently used.
    pub fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let entry = sessions.get_mut(&id)?;
        entry.touched = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .remove(&id)
            .is_some()
    }

    /// Drops sessions not touched within `max_idle`. Returns how many went.
    pub fn cleanup(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().expect("session store lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.touched) < max_idle);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session store lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::new(Arc::new(Catalog::course_survey()));
        let (a, first) = store.create();
        let (b, _) = store.create();

        first.lock().unwrap().begin("fox").unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        let second = store.get(b).unwrap();
        assert_eq!(second.lock().unwrap().identity(), "");
    }

    #[test]
    fn remove_forgets_session() {
        let store = SessionStore::new(Arc::new(Catalog::course_survey()));
        let (id, _) = store.create();

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(store.get(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn cleanup_evicts_idle_sessions() {
        let store = SessionStore::new(Arc::new(Catalog::course_survey()));
        let (idle, _) = store.create();
        let (active, _) = store.create();
        std::thread::sleep(Duration::from_millis(60));
        store.get(active).unwrap();

        let evicted = store.cleanup(Duration::from_millis(40));

        assert_eq!(evicted, 1);
        assert!(store.get(idle).is_none());
        assert!(store.get(active).is_some());
    }

    #[test]
    fn cleanup_keeps_fresh_sessions() {
        let store = SessionStore::new(Arc::new(Catalog::course_survey()));
        store.create();

        assert_eq!(store.cleanup(DEFAULT_SESSION_IDLE), 0);
        assert_eq!(store.len(), 1);
    }
}
