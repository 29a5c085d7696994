//! Recognition Context - 识别结果

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::build::{Element, NodeState, SkillKey, WeaponType};

/// 识别出的截图类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisKind {
    Character,
    Weapon,
    Sequence,
    Forte,
    Echo,
    Unknown,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisKind::Character => "Character",
            AnalysisKind::Weapon => "Weapon",
            AnalysisKind::Sequence => "Sequence",
            AnalysisKind::Forte => "Forte",
            AnalysisKind::Echo => "Echo",
            AnalysisKind::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// 共鸣链单个分支: 技能等级 + 两个节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForteBranch {
    pub skill: SkillKey,
    pub level: u8,
    pub nodes: NodeState,
}

/// 识别到的数值，保留是否带百分号
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatReading {
    pub value: f64,
    pub percent: bool,
}

impl fmt::Display for StatReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.percent {
            write!(f, "{}%", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// 识别到的原始词条（名称尚未对照目录）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStat {
    pub name: String,
    pub reading: StatReading,
}

/// 识别分析结果（封闭和类型）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisVariant {
    Character {
        name: String,
        level: u8,
        element: Option<Element>,
    },
    Weapon {
        name: String,
        weapon_type: WeaponType,
        level: u8,
        rank: u8,
    },
    Sequence {
        slots: [bool; 6],
    },
    Forte {
        branches: [ForteBranch; 5],
    },
    Echo {
        name: String,
        level: u8,
        element: Option<Element>,
        main_stat: RawStat,
        sub_stats: Vec<RawStat>,
    },
    Unknown,
}

impl AnalysisVariant {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisVariant::Character { .. } => AnalysisKind::Character,
            AnalysisVariant::Weapon { .. } => AnalysisKind::Weapon,
            AnalysisVariant::Sequence { .. } => AnalysisKind::Sequence,
            AnalysisVariant::Forte { .. } => AnalysisKind::Forte,
            AnalysisVariant::Echo { .. } => AnalysisKind::Echo,
            AnalysisVariant::Unknown => AnalysisKind::Unknown,
        }
    }

    /// 共鸣链数量 = 从第一个开始连续激活的节点数
    pub fn sequence_count(slots: &[bool; 6]) -> u8 {
        slots.iter().take_while(|active| **active).count() as u8
    }

    /// 截图卡片上展示的简短描述
    pub fn details(&self) -> String {
        match self {
            AnalysisVariant::Character { name, level, .. } => format!("Lv.{} {}", level, name),
            AnalysisVariant::Weapon {
                name,
                weapon_type,
                level,
                rank,
            } => format!("{}: {}\nLv.{} R{}", weapon_type, name, level, rank),
            AnalysisVariant::Sequence { slots } => {
                format!("Sequence {}", Self::sequence_count(slots))
            }
            AnalysisVariant::Forte { .. } => "Forte Tree".to_string(),
            AnalysisVariant::Echo {
                name,
                level,
                element,
                main_stat,
                ..
            } => {
                let element = element.map(|e| e.to_string()).unwrap_or_else(|| "Unknown".to_string());
                format!(
                    "Lv.{} {}\n{} | {}: {}",
                    level, name, element, main_stat.name, main_stat.reading
                )
            }
            AnalysisVariant::Unknown => "Unrecognized image".to_string(),
        }
    }
}

/// 单张截图的识别结果，失败时携带面向用户的错误信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum RecognitionOutcome {
    Recognized(AnalysisVariant),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub image_id: String,
    pub outcome: RecognitionOutcome,
}

impl RecognitionResult {
    pub fn recognized(image_id: impl Into<String>, variant: AnalysisVariant) -> Self {
        Self {
            image_id: image_id.into(),
            outcome: RecognitionOutcome::Recognized(variant),
        }
    }

    pub fn failed(image_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            outcome: RecognitionOutcome::Failed(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RecognitionOutcome::Recognized(_))
    }

    pub fn variant(&self) -> Option<&AnalysisVariant> {
        match &self.outcome {
            RecognitionOutcome::Recognized(variant) => Some(variant),
            RecognitionOutcome::Failed(_) => None,
        }
    }

    pub fn kind(&self) -> Option<AnalysisKind> {
        self.variant().map(AnalysisVariant::kind)
    }
}
