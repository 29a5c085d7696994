//! Build Commands - 手动编辑配装
//!
//! 与识别结果走同一组 BuildState 方法。

use serde::{Deserialize, Serialize};

use crate::domain::build::{
    Element, ForteState, ForteTree, NodePosition, NodeState, PanelStat, SkillKey, StatName,
};

/// 选择角色，`name` 为空表示取消选择
#[derive(Debug, Clone)]
pub struct SelectCharacterCommand {
    pub session_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SetCharacterLevelCommand {
    pub session_id: String,
    pub level: u8,
}

/// 点击共鸣链第 `node` 个节点
#[derive(Debug, Clone)]
pub struct SetSequenceCommand {
    pub session_id: String,
    pub node: u8,
}

#[derive(Debug, Clone)]
pub struct SetSequenceResponse {
    pub sequence: u8,
}

#[derive(Debug, Clone)]
pub struct ToggleElementCommand {
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct ToggleElementResponse {
    pub element: Element,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SelectWeaponCommand {
    pub session_id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SetWeaponConfigCommand {
    pub session_id: String,
    pub level: u8,
    pub rank: u8,
}

#[derive(Debug, Clone)]
pub struct SetForteCommand {
    pub session_id: String,
    pub forte: ForteState,
}

#[derive(Debug, Clone)]
pub struct ToggleForteNodeCommand {
    pub session_id: String,
    pub tree: ForteTree,
    pub position: NodePosition,
}

#[derive(Debug, Clone)]
pub struct ToggleForteNodeResponse {
    pub node: NodeState,
}

#[derive(Debug, Clone)]
pub struct SetForteLevelCommand {
    pub session_id: String,
    pub skill: SkillKey,
    pub level: u8,
}

#[derive(Debug, Clone)]
pub struct CycleForteMaxCommand {
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct CycleForteMaxResponse {
    /// 0 重置, 1 技能满级, 2 技能满级且节点全亮
    pub state: u8,
}

/// 声骸栏位编辑器提交的内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EchoPanelInput {
    pub echo: Option<String>,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub selected_element: Option<Element>,
    #[serde(default)]
    pub main_stat: Option<StatName>,
    #[serde(default)]
    pub sub_stats: Vec<Option<PanelStat>>,
}

#[derive(Debug, Clone)]
pub struct SetEchoPanelCommand {
    pub session_id: String,
    pub index: usize,
    pub panel: EchoPanelInput,
}

/// 编辑类命令的通用响应
#[derive(Debug, Clone)]
pub struct BuildEditResponse {
    pub session_id: String,
}
