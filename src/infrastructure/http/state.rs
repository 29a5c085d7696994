//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ClearImagesHandler, ClearMessagesHandler, CloseSessionHandler, CreateSessionHandler,
    CycleForteMaxHandler, DeleteImageHandler, ProcessImagesHandler, SelectCharacterHandler,
    SelectWeaponHandler, SetCharacterLevelHandler, SetEchoPanelHandler, SetForteHandler,
    SetForteLevelHandler, SetSequenceHandler, SetWeaponConfigHandler, ToggleElementHandler,
    ToggleForteNodeHandler, UploadImagesHandler,
    // Query handlers
    GetBuildHandler, GetScanStatusHandler,
    // Ports
    CatalogPort, ImageValidator, RecognitionEnginePort, SessionManagerPort,
};

/// 应用状态
///
/// SessionManager 为内存实现，Catalog 启动时加载后只读
pub struct AppState {
    // ========== Ports ==========
    pub session_manager: Arc<dyn SessionManagerPort>,
    pub catalog: Arc<dyn CatalogPort>,
    pub recognition_engine: Arc<dyn RecognitionEnginePort>,

    // ========== Session ==========
    pub create_session_handler: CreateSessionHandler,
    pub close_session_handler: CloseSessionHandler,

    // ========== Scan ==========
    pub upload_images_handler: UploadImagesHandler,
    pub process_images_handler: ProcessImagesHandler,
    pub delete_image_handler: DeleteImageHandler,
    pub clear_images_handler: ClearImagesHandler,
    pub clear_messages_handler: ClearMessagesHandler,
    pub get_scan_status_handler: GetScanStatusHandler,

    // ========== Build ==========
    pub get_build_handler: GetBuildHandler,
    pub select_character_handler: SelectCharacterHandler,
    pub set_character_level_handler: SetCharacterLevelHandler,
    pub set_sequence_handler: SetSequenceHandler,
    pub toggle_element_handler: ToggleElementHandler,
    pub select_weapon_handler: SelectWeaponHandler,
    pub set_weapon_config_handler: SetWeaponConfigHandler,
    pub set_forte_handler: SetForteHandler,
    pub toggle_forte_node_handler: ToggleForteNodeHandler,
    pub set_forte_level_handler: SetForteLevelHandler,
    pub cycle_forte_max_handler: CycleForteMaxHandler,
    pub set_echo_panel_handler: SetEchoPanelHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        catalog: Arc<dyn CatalogPort>,
        recognition_engine: Arc<dyn RecognitionEnginePort>,
        validator: ImageValidator,
    ) -> Self {
        Self {
            // Ports
            session_manager: session_manager.clone(),
            catalog: catalog.clone(),
            recognition_engine: recognition_engine.clone(),

            // Session
            create_session_handler: CreateSessionHandler::new(session_manager.clone()),
            close_session_handler: CloseSessionHandler::new(session_manager.clone()),

            // Scan
            upload_images_handler: UploadImagesHandler::new(session_manager.clone(), validator),
            process_images_handler: ProcessImagesHandler::new(
                session_manager.clone(),
                recognition_engine.clone(),
                catalog.clone(),
            ),
            delete_image_handler: DeleteImageHandler::new(session_manager.clone()),
            clear_images_handler: ClearImagesHandler::new(session_manager.clone()),
            clear_messages_handler: ClearMessagesHandler::new(session_manager.clone()),
            get_scan_status_handler: GetScanStatusHandler::new(session_manager.clone()),

            // Build
            get_build_handler: GetBuildHandler::new(session_manager.clone(), catalog.clone()),
            select_character_handler: SelectCharacterHandler::new(
                session_manager.clone(),
                catalog.clone(),
            ),
            set_character_level_handler: SetCharacterLevelHandler::new(session_manager.clone()),
            set_sequence_handler: SetSequenceHandler::new(session_manager.clone()),
            toggle_element_handler: ToggleElementHandler::new(session_manager.clone()),
            select_weapon_handler: SelectWeaponHandler::new(
                session_manager.clone(),
                catalog.clone(),
            ),
            set_weapon_config_handler: SetWeaponConfigHandler::new(session_manager.clone()),
            set_forte_handler: SetForteHandler::new(session_manager.clone()),
            toggle_forte_node_handler: ToggleForteNodeHandler::new(session_manager.clone()),
            set_forte_level_handler: SetForteLevelHandler::new(session_manager.clone()),
            cycle_forte_max_handler: CycleForteMaxHandler::new(session_manager.clone()),
            set_echo_panel_handler: SetEchoPanelHandler::new(session_manager, catalog),
        }
    }
}
