//! Stats - 属性汇总引擎
//!
//! 角色曲线、武器、共鸣链、五个声骸栏位与套装 -> 最终面板 + 暴击值。

mod engine;
mod forte;
mod level_curve;
mod quality;
mod sets;

pub use engine::{compute_stats, BuildStats, StatLine, StatSheet};
pub use level_curve::bracket_key;
pub use quality::{QualityScore, QualityTier};
pub use sets::SetBonus;
