//! Build Context - 配装限界上下文
//!
//! 职责:
//! - 角色 / 武器 / 共鸣链 / 五个声骸栏位的编辑状态
//! - 手动编辑与识别结果共用同一套修改方法

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{
    BuildState, EchoPanel, ForteState, NodeState, PanelStat, WeaponConfig, WeaponState,
    ECHO_PANEL_COUNT, MAX_FORTE_LEVEL, MAX_LEVEL, MAX_RANK, MAX_SEQUENCE, SUBSTAT_SLOTS,
};
pub use errors::BuildError;
pub use value_objects::{CostTier, Element, ForteTree, NodePosition, SkillKey, StatName, WeaponType};
