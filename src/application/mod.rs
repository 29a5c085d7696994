//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（RecognitionEngine、Catalog、SessionManager）
//! - ingestion: 截图导入流水线（校验、编码、结果落地）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ingestion;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Session commands
    CloseSessionCommand,
    CloseSessionResponse,
    CreateSessionCommand,
    CreateSessionResponse,
    // Scan commands
    ClearImagesCommand,
    ClearImagesResponse,
    ClearMessagesCommand,
    DeleteImageCommand,
    ImageUpload,
    ProcessImagesCommand,
    ProcessImagesResponse,
    UploadImagesCommand,
    UploadImagesResponse,
    // Build commands
    BuildEditResponse,
    CycleForteMaxCommand,
    CycleForteMaxResponse,
    EchoPanelInput,
    SelectCharacterCommand,
    SelectWeaponCommand,
    SetCharacterLevelCommand,
    SetEchoPanelCommand,
    SetForteCommand,
    SetForteLevelCommand,
    SetSequenceCommand,
    SetSequenceResponse,
    SetWeaponConfigCommand,
    ToggleElementCommand,
    ToggleElementResponse,
    ToggleForteNodeCommand,
    ToggleForteNodeResponse,
    // Handlers
    handlers::{
        ClearImagesHandler, ClearMessagesHandler, CloseSessionHandler, CreateSessionHandler,
        CycleForteMaxHandler, DeleteImageHandler, ProcessImagesHandler, SelectCharacterHandler,
        SelectWeaponHandler, SetCharacterLevelHandler, SetEchoPanelHandler, SetForteHandler,
        SetForteLevelHandler, SetSequenceHandler, SetWeaponConfigHandler, ToggleElementHandler,
        ToggleForteNodeHandler, UploadImagesHandler,
    },
};

pub use error::ApplicationError;

pub use ingestion::{ImageValidator, IngestionLimits, Reconciler};

pub use ports::{
    // Catalog
    CatalogError,
    CatalogPort,
    // Recognition engine
    EncodedImage,
    RecognitionEnginePort,
    RecognitionError,
    RecognitionReply,
    // Session manager
    modify_session,
    BuildSession,
    SessionError,
    SessionManagerPort,
};

pub use queries::{
    // Build queries
    GetBuild,
    // Scan queries
    GetScanStatus,
    // Handlers
    handlers::{
        BuildResponse, GetBuildHandler, GetScanStatusHandler, ImageStatusResponse,
        ScanStatusResponse,
    },
};
