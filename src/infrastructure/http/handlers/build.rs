//! Build Handlers - 配装查询与手动编辑

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{
    CycleForteMaxCommand, EchoPanelInput, GetBuild, SelectCharacterCommand, SelectWeaponCommand,
    SetCharacterLevelCommand, SetEchoPanelCommand, SetForteCommand, SetForteLevelCommand,
    SetSequenceCommand, SetWeaponConfigCommand, ToggleElementCommand, ToggleForteNodeCommand,
};
use crate::domain::build::{
    BuildState, Element, ForteState, ForteTree, NodePosition, NodeState, SkillKey,
};
use crate::domain::stats::BuildStats;
use crate::infrastructure::http::dto::{ApiResponse, SessionRequest, SessionResponseDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BuildDto {
    pub session_id: String,
    pub display_name: Option<String>,
    pub active_element: Option<Element>,
    pub build: BuildState,
    pub stats: BuildStats,
}

#[derive(Debug, Deserialize)]
pub struct SelectCharacterRequest {
    pub session_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetLevelRequest {
    pub session_id: String,
    pub level: u8,
}

#[derive(Debug, Deserialize)]
pub struct SetSequenceRequest {
    pub session_id: String,
    pub node: u8,
}

#[derive(Debug, Serialize)]
pub struct SequenceDto {
    pub sequence: u8,
}

#[derive(Debug, Serialize)]
pub struct ElementDto {
    pub element: Element,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectWeaponRequest {
    pub session_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WeaponConfigRequest {
    pub session_id: String,
    pub level: u8,
    pub rank: u8,
}

#[derive(Debug, Deserialize)]
pub struct SetForteRequest {
    pub session_id: String,
    pub forte: ForteState,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForteNodeRequest {
    pub session_id: String,
    pub tree: ForteTree,
    pub position: NodePosition,
}

#[derive(Debug, Deserialize)]
pub struct SetForteLevelRequest {
    pub session_id: String,
    pub skill: SkillKey,
    pub level: u8,
}

#[derive(Debug, Serialize)]
pub struct ForteMaxDto {
    pub state: u8,
}

#[derive(Debug, Deserialize)]
pub struct SetEchoPanelRequest {
    pub session_id: String,
    pub index: usize,
    #[serde(flatten)]
    pub panel: EchoPanelInput,
}

fn edited(session_id: String) -> Json<ApiResponse<SessionResponseDto>> {
    Json(ApiResponse::success(SessionResponseDto { session_id }))
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取配装与派生属性
pub async fn get_build(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<BuildDto>>, ApiError> {
    let result = state
        .get_build_handler
        .handle(GetBuild {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(BuildDto {
        session_id: result.session_id,
        display_name: result.display_name,
        active_element: result.active_element,
        build: result.build,
        stats: result.stats,
    })))
}

/// 选择角色（`name` 为空时取消选择）
pub async fn select_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectCharacterRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .select_character_handler
        .handle(SelectCharacterCommand {
            session_id: req.session_id,
            name: req.name,
        })
        .await?;

    Ok(edited(result.session_id))
}

pub async fn set_level(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetLevelRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .set_character_level_handler
        .handle(SetCharacterLevelCommand {
            session_id: req.session_id,
            level: req.level,
        })
        .await?;

    Ok(edited(result.session_id))
}

pub async fn set_sequence(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetSequenceRequest>,
) -> Result<Json<ApiResponse<SequenceDto>>, ApiError> {
    let result = state
        .set_sequence_handler
        .handle(SetSequenceCommand {
            session_id: req.session_id,
            node: req.node,
        })
        .await?;

    Ok(Json(ApiResponse::success(SequenceDto {
        sequence: result.sequence,
    })))
}

pub async fn toggle_element(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<ElementDto>>, ApiError> {
    let result = state
        .toggle_element_handler
        .handle(ToggleElementCommand {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ElementDto {
        element: result.element,
        display_name: result.display_name,
    })))
}

pub async fn select_weapon(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectWeaponRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .select_weapon_handler
        .handle(SelectWeaponCommand {
            session_id: req.session_id,
            name: req.name,
        })
        .await?;

    Ok(edited(result.session_id))
}

pub async fn set_weapon_config(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WeaponConfigRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .set_weapon_config_handler
        .handle(SetWeaponConfigCommand {
            session_id: req.session_id,
            level: req.level,
            rank: req.rank,
        })
        .await?;

    Ok(edited(result.session_id))
}

pub async fn set_forte(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetForteRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .set_forte_handler
        .handle(SetForteCommand {
            session_id: req.session_id,
            forte: req.forte,
        })
        .await?;

    Ok(edited(result.session_id))
}

pub async fn toggle_forte_node(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleForteNodeRequest>,
) -> Result<Json<ApiResponse<NodeState>>, ApiError> {
    let result = state
        .toggle_forte_node_handler
        .handle(ToggleForteNodeCommand {
            session_id: req.session_id,
            tree: req.tree,
            position: req.position,
        })
        .await?;

    Ok(Json(ApiResponse::success(result.node)))
}

pub async fn set_forte_level(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetForteLevelRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .set_forte_level_handler
        .handle(SetForteLevelCommand {
            session_id: req.session_id,
            skill: req.skill,
            level: req.level,
        })
        .await?;

    Ok(edited(result.session_id))
}

pub async fn cycle_forte_max(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<ApiResponse<ForteMaxDto>>, ApiError> {
    let result = state
        .cycle_forte_max_handler
        .handle(CycleForteMaxCommand {
            session_id: req.session_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ForteMaxDto {
        state: result.state,
    })))
}

pub async fn set_echo_panel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetEchoPanelRequest>,
) -> Result<Json<ApiResponse<SessionResponseDto>>, ApiError> {
    let result = state
        .set_echo_panel_handler
        .handle(SetEchoPanelCommand {
            session_id: req.session_id,
            index: req.index,
            panel: req.panel,
        })
        .await?;

    Ok(edited(result.session_id))
}
