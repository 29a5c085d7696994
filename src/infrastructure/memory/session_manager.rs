//! In-Memory Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;

use crate::application::ports::{BuildSession, SessionError, SessionManagerPort};

/// 内存会话管理器
pub struct InMemorySessionManager {
    sessions: DashMap<String, BuildSession>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn create(&self, session: BuildSession) -> Result<String, SessionError> {
        let session_id = session.id.clone();
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyExists(session_id));
        }
        self.sessions.insert(session_id.clone(), session);
        tracing::info!(session_id = %session_id, "Session created");
        Ok(session_id)
    }

    fn get(&self, id: &str) -> Result<BuildSession, SessionError> {
        self.sessions
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn modify(
        &self,
        id: &str,
        f: Box<dyn FnOnce(&mut BuildSession) + '_>,
    ) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        f(session.value_mut());
        session.last_activity = Utc::now();
        Ok(())
    }

    fn is_valid(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    fn close(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|(_, session)| {
                tracing::info!(
                    session_id = %id,
                    images = session.images.len(),
                    "Session closed"
                );
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn list_all(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::modify_session;

    #[test]
    fn test_session_lifecycle() {
        let manager = InMemorySessionManager::new();
        let session = BuildSession::new();
        let session_id = session.id.clone();

        // Create
        let result = manager.create(session.clone());
        assert!(result.is_ok());
        assert!(matches!(
            manager.create(session),
            Err(SessionError::AlreadyExists(_))
        ));

        // Modify
        let count = modify_session(&manager, &session_id, |s| {
            s.push_message("hello");
            s.messages.len()
        })
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(manager.get(&session_id).unwrap().messages, vec!["hello"]);

        // Is valid
        assert!(manager.is_valid(&session_id));
        assert_eq!(manager.list_all(), vec![session_id.clone()]);

        // Close
        let result = manager.close(&session_id);
        assert!(result.is_ok());
        assert!(!manager.is_valid(&session_id));
        assert!(matches!(
            manager.get(&session_id),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_modify_unknown_session() {
        let manager = InMemorySessionManager::new();
        let result = modify_session(&manager, "missing", |_| ());
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_expired_sessions() {
        let manager = InMemorySessionManager::new();
        let mut stale = BuildSession::new();
        stale.last_activity = Utc::now() - chrono::Duration::hours(25);
        let stale_id = manager.create(stale).unwrap();
        manager.create(BuildSession::new()).unwrap();

        assert_eq!(manager.get_expired_sessions(86400), vec![stale_id]);
    }
}
