//! Session Command Handlers

use std::sync::Arc;

use crate::application::commands::session_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{BuildSession, SessionManagerPort};

/// CreateSession Handler
pub struct CreateSessionHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl CreateSessionHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        _cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResponse, ApplicationError> {
        let session_id = self.session_manager.create(BuildSession::new())?;

        tracing::info!(session_id = %session_id, "Build session created");

        Ok(CreateSessionResponse { session_id })
    }
}

/// CloseSession Handler - 关闭会话并丢弃其截图
pub struct CloseSessionHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl CloseSessionHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: CloseSessionCommand,
    ) -> Result<CloseSessionResponse, ApplicationError> {
        self.session_manager.close(&cmd.session_id)?;

        tracing::info!(session_id = %cmd.session_id, "Build session closed");

        Ok(CloseSessionResponse {
            session_id: cmd.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemorySessionManager;

    #[tokio::test]
    async fn test_create_then_close() {
        let sessions: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let create = CreateSessionHandler::new(sessions.clone());
        let close = CloseSessionHandler::new(sessions.clone());

        let created = create.handle(CreateSessionCommand).await.unwrap();
        assert!(sessions.is_valid(&created.session_id));

        close
            .handle(CloseSessionCommand {
                session_id: created.session_id.clone(),
            })
            .await
            .unwrap();
        assert!(!sessions.is_valid(&created.session_id));
    }

    #[tokio::test]
    async fn test_close_unknown_session() {
        let sessions: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let close = CloseSessionHandler::new(sessions);

        let err = close
            .handle(CloseSessionCommand {
                session_id: "missing".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
