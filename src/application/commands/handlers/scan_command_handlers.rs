//! Scan Command Handlers - 截图上传、识别与清理

use futures_util::future::join_all;
use std::sync::Arc;

use crate::application::commands::scan_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ingestion::{
    encode_data_uri, ImageValidator, Reconciler, ValidationError,
};
use crate::application::ports::{
    modify_session, BuildSession, CatalogPort, EncodedImage, RecognitionEnginePort,
    SessionManagerPort,
};
use crate::domain::ingestion::{ImageStatus, ImageTask};
use crate::domain::recognition::{classify, RecognitionResult};

const PREPARE_FAILED: &str = "Failed to prepare image";

/// UploadImages Handler - 校验、建任务、编码
pub struct UploadImagesHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    validator: ImageValidator,
}

impl UploadImagesHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>, validator: ImageValidator) -> Self {
        Self {
            session_manager,
            validator,
        }
    }

    pub async fn handle(
        &self,
        cmd: UploadImagesCommand,
    ) -> Result<UploadImagesResponse, ApplicationError> {
        let incoming = cmd.files.len();
        let existing = modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.messages.clear();
            session.images.len()
        })?;

        // 超出上限时整批拒绝，编码前先按当前数量快速失败
        self.validator
            .check_capacity(existing, incoming)
            .map_err(|e| ApplicationError::validation(e.to_string()))?;

        let mut tasks = Vec::with_capacity(cmd.files.len());
        let mut rejected = Vec::new();

        for file in &cmd.files {
            if let Err(e) = self.validator.validate(&file.mime_type, file.bytes.len()) {
                tracing::debug!(file = %file.file_name, error = %e, "Image rejected");
                rejected.push(format!("{}: {}", file.file_name, e));
                continue;
            }

            let mut task = ImageTask::new(&file.file_name, &file.mime_type, file.bytes.len());
            match encode_data_uri(&file.mime_type, file.bytes.as_slice()).await {
                Ok(data_uri) => task.mark_ready(data_uri),
                Err(e) => {
                    tracing::warn!(file = %file.file_name, error = %e, "Failed to encode image");
                    task.mark_error(PREPARE_FAILED);
                }
            }
            tasks.push(task);
        }

        let accepted: Vec<String> = tasks.iter().map(|t| t.id().to_string()).collect();
        let messages = rejected.clone();
        let validator = &self.validator;
        // 复核与写入在同一次加锁内完成，并发上传不会越过上限
        let append = move |session: &mut BuildSession| -> Result<(), ValidationError> {
            validator.check_capacity(session.images.len(), incoming)?;
            session.images.extend(tasks);
            session.messages.extend(messages);
            Ok(())
        };
        modify_session(self.session_manager.as_ref(), &cmd.session_id, append)?
            .map_err(|e| ApplicationError::validation(e.to_string()))?;

        tracing::info!(
            session_id = %cmd.session_id,
            accepted = accepted.len(),
            rejected = rejected.len(),
            "Images uploaded"
        );

        Ok(UploadImagesResponse { accepted, rejected })
    }
}

/// ProcessImages Handler
///
/// 就绪截图并发提交识别，结果分类后交给 Reconciler 落到会话。
/// 等待识别期间不持有会话锁。
pub struct ProcessImagesHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    recognition_engine: Arc<dyn RecognitionEnginePort>,
    reconciler: Reconciler,
}

impl ProcessImagesHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        recognition_engine: Arc<dyn RecognitionEnginePort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            session_manager,
            recognition_engine,
            reconciler: Reconciler::new(catalog),
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessImagesCommand,
    ) -> Result<ProcessImagesResponse, ApplicationError> {
        let batch = modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.messages.clear();
            session
                .images
                .iter_mut()
                .filter(|task| task.status() == ImageStatus::Ready)
                .filter_map(|task| {
                    let data_uri = task.data_uri()?.to_string();
                    task.mark_processing();
                    Some(EncodedImage {
                        image_id: task.id().to_string(),
                        data_uri,
                    })
                })
                .collect::<Vec<_>>()
        })?;

        if batch.is_empty() {
            tracing::debug!(session_id = %cmd.session_id, "No ready images to process");
            return Ok(ProcessImagesResponse {
                submitted: 0,
                succeeded: 0,
                failed: 0,
            });
        }

        tracing::info!(
            session_id = %cmd.session_id,
            images = batch.len(),
            "Recognition batch started"
        );

        let replies = join_all(
            batch
                .iter()
                .map(|image| self.recognition_engine.submit(image)),
        )
        .await;

        let results: Vec<RecognitionResult> = replies
            .into_iter()
            .map(|reply| match reply.outcome {
                Ok(analysis) => RecognitionResult::recognized(reply.image_id, classify(&analysis)),
                Err(error) => RecognitionResult::failed(reply.image_id, error),
            })
            .collect();

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;

        modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            self.reconciler.reconcile(session, results)
        })?;

        tracing::info!(
            session_id = %cmd.session_id,
            succeeded = succeeded,
            failed = failed,
            "Recognition batch finished"
        );

        Ok(ProcessImagesResponse {
            submitted: batch.len(),
            succeeded,
            failed,
        })
    }
}

/// DeleteImage Handler - 同时丢弃该截图的排队结果
pub struct DeleteImageHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl DeleteImageHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(&self, cmd: DeleteImageCommand) -> Result<(), ApplicationError> {
        let removed = modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            let before = session.images.len();
            session.images.retain(|task| task.id() != cmd.image_id);
            session.gate.discard(&cmd.image_id);
            session.images.len() != before
        })?;

        if !removed {
            return Err(ApplicationError::not_found("Image", cmd.image_id));
        }

        tracing::debug!(session_id = %cmd.session_id, image_id = %cmd.image_id, "Image deleted");
        Ok(())
    }
}

/// ClearImages Handler
pub struct ClearImagesHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl ClearImagesHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: ClearImagesCommand,
    ) -> Result<ClearImagesResponse, ApplicationError> {
        let removed = modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            let removed = session.images.len();
            session.images.clear();
            session.messages.clear();
            session.gate.clear_pending();
            removed
        })?;

        tracing::info!(session_id = %cmd.session_id, removed = removed, "Images cleared");

        Ok(ClearImagesResponse { removed })
    }
}

/// ClearMessages Handler
pub struct ClearMessagesHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl ClearMessagesHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(&self, cmd: ClearMessagesCommand) -> Result<(), ApplicationError> {
        modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.messages.clear()
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ingestion::{IngestionLimits, SELECT_CHARACTER_FIRST};
    use crate::domain::ingestion::GateState;
    use crate::infrastructure::adapters::FakeRecognitionClient;
    use crate::infrastructure::catalog::fixtures::sample_catalog;
    use crate::infrastructure::memory::InMemorySessionManager;
    use serde_json::json;

    fn png(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            bytes: b"\x89PNG".to_vec(),
        }
    }

    fn setup() -> (Arc<dyn SessionManagerPort>, String) {
        let sessions: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());
        let session_id = sessions.create(BuildSession::new()).unwrap();
        (sessions, session_id)
    }

    async fn upload(
        sessions: &Arc<dyn SessionManagerPort>,
        session_id: &str,
        files: Vec<ImageUpload>,
    ) -> UploadImagesResponse {
        UploadImagesHandler::new(sessions.clone(), ImageValidator::default())
            .handle(UploadImagesCommand {
                session_id: session_id.to_string(),
                files,
            })
            .await
            .unwrap()
    }

    fn processor(
        sessions: &Arc<dyn SessionManagerPort>,
        engine: FakeRecognitionClient,
    ) -> ProcessImagesHandler {
        ProcessImagesHandler::new(sessions.clone(), Arc::new(engine), Arc::new(sample_catalog()))
    }

    #[tokio::test]
    async fn test_upload_validates_each_file() {
        let (sessions, session_id) = setup();
        let gif = ImageUpload {
            file_name: "a.gif".to_string(),
            mime_type: "image/gif".to_string(),
            bytes: vec![0; 4],
        };

        let response = upload(&sessions, &session_id, vec![gif, png("b.png")]).await;
        assert_eq!(response.accepted.len(), 1);
        assert_eq!(
            response.rejected,
            vec!["a.gif: Invalid file type. Only JPEG and PNG files are allowed."]
        );

        let session = sessions.get(&session_id).unwrap();
        assert_eq!(session.images.len(), 1);
        assert_eq!(session.images[0].status(), ImageStatus::Ready);
        assert_eq!(
            session.images[0].data_uri(),
            Some("data:image/png;base64,iVBORw==")
        );
        assert_eq!(session.messages, response.rejected);
    }

    #[tokio::test]
    async fn test_upload_rejects_whole_batch_over_capacity() {
        let (sessions, session_id) = setup();
        let files = (0..6).map(|i| png(&format!("{i}.png"))).collect();
        upload(&sessions, &session_id, files).await;

        let validator = ImageValidator::new(IngestionLimits::default());
        let err = UploadImagesHandler::new(sessions.clone(), validator)
            .handle(UploadImagesCommand {
                session_id: session_id.clone(),
                files: (0..5).map(|i| png(&format!("x{i}.png"))).collect(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::ValidationError(ref m) if m == "Maximum 10 images allowed"
        ));
        assert_eq!(sessions.get(&session_id).unwrap().images.len(), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_uploads_respect_capacity() {
        for _ in 0..20 {
            let (sessions, session_id) = setup();
            let barrier = Arc::new(tokio::sync::Barrier::new(4));

            let uploads: Vec<_> = (0..4)
                .map(|n| {
                    let handler =
                        UploadImagesHandler::new(sessions.clone(), ImageValidator::default());
                    let barrier = barrier.clone();
                    let session_id = session_id.clone();
                    tokio::spawn(async move {
                        let files = (0..6)
                            .map(|i| ImageUpload {
                                file_name: format!("{n}-{i}.png"),
                                mime_type: "image/png".to_string(),
                                bytes: vec![0x89; 64 * 1024],
                            })
                            .collect();
                        barrier.wait().await;
                        handler
                            .handle(UploadImagesCommand { session_id, files })
                            .await
                    })
                })
                .collect();

            let mut succeeded = 0;
            for upload in uploads {
                match upload.await.unwrap() {
                    Ok(_) => succeeded += 1,
                    Err(e) => assert!(matches!(
                        e,
                        ApplicationError::ValidationError(ref m) if m == "Maximum 10 images allowed"
                    )),
                }
            }

            assert_eq!(succeeded, 1);
            assert_eq!(sessions.get(&session_id).unwrap().images.len(), 6);
        }
    }

    #[tokio::test]
    async fn test_process_applies_character_before_other_results() {
        let (sessions, session_id) = setup();
        let uploaded = upload(&sessions, &session_id, vec![png("seq.png"), png("char.png")]).await;

        let engine = FakeRecognitionClient::new()
            .with_analysis(json!({"type": "Sequences", "sequence": 3}))
            .with_analysis(json!({"type": "Character", "name": "Jinhsi", "level": "90"}));
        let response = processor(&sessions, engine)
            .handle(ProcessImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();

        assert_eq!(response.submitted, 2);
        assert_eq!(response.succeeded, 2);

        let session = sessions.get(&session_id).unwrap();
        assert_eq!(
            session.build.character().map(|c| c.name.as_str()),
            Some("Jinhsi")
        );
        assert_eq!(session.build.level(), 90);
        assert_eq!(session.build.sequence(), 3);
        assert_eq!(session.gate.state(), GateState::Unlocked);
        assert!(session.messages.is_empty());
        for id in &uploaded.accepted {
            let task = session.images.iter().find(|t| t.id() == id).unwrap();
            assert_eq!(task.status(), ImageStatus::Complete);
        }
    }

    #[tokio::test]
    async fn test_process_queues_without_character() {
        let (sessions, session_id) = setup();
        upload(&sessions, &session_id, vec![png("seq.png")]).await;

        let engine = FakeRecognitionClient::new()
            .with_analysis(json!({"type": "Sequences", "sequence": 2}));
        processor(&sessions, engine)
            .handle(ProcessImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();

        let session = sessions.get(&session_id).unwrap();
        assert_eq!(session.images[0].status(), ImageStatus::Queued);
        assert_eq!(session.gate.pending_len(), 1);
        assert_eq!(session.messages, vec![SELECT_CHARACTER_FIRST]);

        // 已处理的截图不会再次提交
        let engine = FakeRecognitionClient::new();
        let response = processor(&sessions, engine)
            .handle(ProcessImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(response.submitted, 0);
    }

    #[tokio::test]
    async fn test_process_records_failures() {
        let (sessions, session_id) = setup();
        upload(&sessions, &session_id, vec![png("a.png")]).await;

        let engine = FakeRecognitionClient::new().with_failure("Rate limit exceeded");
        let response = processor(&sessions, engine)
            .handle(ProcessImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(response.failed, 1);

        let session = sessions.get(&session_id).unwrap();
        assert_eq!(session.images[0].status(), ImageStatus::Error);
        assert_eq!(session.images[0].error(), Some("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_delete_discards_pending_result() {
        let (sessions, session_id) = setup();
        let uploaded = upload(&sessions, &session_id, vec![png("seq.png")]).await;
        let engine = FakeRecognitionClient::new()
            .with_analysis(json!({"type": "Sequences", "sequence": 2}));
        processor(&sessions, engine)
            .handle(ProcessImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();

        let delete = DeleteImageHandler::new(sessions.clone());
        delete
            .handle(DeleteImageCommand {
                session_id: session_id.clone(),
                image_id: uploaded.accepted[0].clone(),
            })
            .await
            .unwrap();

        let session = sessions.get(&session_id).unwrap();
        assert!(session.images.is_empty());
        assert_eq!(session.gate.pending_len(), 0);

        let err = delete
            .handle(DeleteImageCommand {
                session_id: session_id.clone(),
                image_id: uploaded.accepted[0].clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_clear_images_resets_queue_and_messages() {
        let (sessions, session_id) = setup();
        upload(&sessions, &session_id, vec![png("a.png"), png("b.png")]).await;
        let engine = FakeRecognitionClient::new()
            .with_analysis(json!({"type": "Sequences", "sequence": 2}))
            .with_analysis(json!({"type": "Sequences", "sequence": 4}));
        processor(&sessions, engine)
            .handle(ProcessImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();

        let response = ClearImagesHandler::new(sessions.clone())
            .handle(ClearImagesCommand {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(response.removed, 2);

        let session = sessions.get(&session_id).unwrap();
        assert!(session.images.is_empty());
        assert!(session.messages.is_empty());
        assert_eq!(session.gate.pending_len(), 0);
        assert!(session.gate.is_locked());
    }
}
