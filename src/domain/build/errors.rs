//! Build Context - Errors

use thiserror::Error;

use super::{StatName, WeaponType};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("尚未选择角色")]
    NoCharacter,

    #[error("无效的角色等级: {0}")]
    InvalidLevel(u8),

    #[error("无效的精炼等级: {0}")]
    InvalidRank(u8),

    #[error("无效的共鸣链: {0}")]
    InvalidSequence(u8),

    #[error("无效的技能等级: {0}")]
    InvalidForteLevel(u8),

    #[error("无效的声骸等级: {0}")]
    InvalidEchoLevel(u8),

    #[error("声骸栏位越界: {0}")]
    PanelOutOfRange(usize),

    #[error("副词条重复: {0}")]
    DuplicateSubstat(StatName),

    #[error("副词条数值不合法: {stat} = {value}")]
    IllegalRoll { stat: StatName, value: f64 },

    #[error("主词条不合法: {0}")]
    IllegalMainStat(StatName),

    #[error("未知属性: {0}")]
    UnknownStat(String),

    #[error("武器类型不匹配: 需要 {expected}, 实际 {actual}")]
    WeaponTypeMismatch {
        expected: WeaponType,
        actual: WeaponType,
    },

    #[error("该角色不是双属性角色")]
    NotDualElement,
}
