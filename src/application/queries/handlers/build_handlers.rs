//! Build Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{CatalogPort, SessionManagerPort};
use crate::application::queries::GetBuild;
use crate::domain::build::{BuildState, Element};
use crate::domain::stats::{compute_stats, BuildStats};

// ============================================================================
// Response DTOs
// ============================================================================

/// 配装快照与派生属性
#[derive(Debug, Clone)]
pub struct BuildResponse {
    pub session_id: String,
    pub display_name: Option<String>,
    pub active_element: Option<Element>,
    pub build: BuildState,
    pub stats: BuildStats,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetBuild Handler
///
/// 每次调用都从快照重新计算属性，不做缓存。
pub struct GetBuildHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    catalog: Arc<dyn CatalogPort>,
}

impl GetBuildHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            session_manager,
            catalog,
        }
    }

    pub async fn handle(&self, query: GetBuild) -> Result<BuildResponse, ApplicationError> {
        let session = self.session_manager.get(&query.session_id)?;
        let stats = compute_stats(&session.build, self.catalog.level_curves());

        Ok(BuildResponse {
            session_id: session.id,
            display_name: session.build.display_name(),
            active_element: session.build.active_element(),
            build: session.build,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{modify_session, BuildSession};
    use crate::domain::build::StatName;
    use crate::infrastructure::catalog::fixtures::sample_catalog;
    use crate::infrastructure::memory::InMemorySessionManager;

    #[tokio::test]
    async fn test_get_build_recomputes_stats() {
        let sessions: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let catalog: Arc<dyn CatalogPort> = Arc::new(sample_catalog());
        let session_id = sessions.create(BuildSession::new()).unwrap();
        let handler = GetBuildHandler::new(sessions.clone(), catalog.clone());
        let query = GetBuild {
            session_id: session_id.clone(),
        };

        let empty = handler.handle(query.clone()).await.unwrap();
        assert!(empty.display_name.is_none());
        assert!(empty.stats.stats.is_empty());
        assert_eq!(empty.stats.quality.raw, 0.0);

        let jinhsi = catalog.character("Jinhsi").unwrap();
        modify_session(sessions.as_ref(), &session_id, |session| {
            session.build.select_character(jinhsi);
        })
        .unwrap();

        let response = handler.handle(query).await.unwrap();
        assert_eq!(response.display_name.as_deref(), Some("Jinhsi"));
        assert_eq!(response.active_element, Some(Element::Spectro));
        assert_eq!(response.stats.stats[&StatName::Hp].display, "800");
        assert_eq!(response.stats.stats[&StatName::CritRate].display, "5.0%");
        assert_eq!(response.stats.stats[&StatName::CritDmg].final_value, 150.0);
    }

    #[tokio::test]
    async fn test_get_build_unknown_session() {
        let sessions: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let handler = GetBuildHandler::new(sessions, Arc::new(sample_catalog()));

        let err = handler
            .handle(GetBuild {
                session_id: "missing".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
