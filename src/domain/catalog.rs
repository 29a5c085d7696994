//! Catalog Records - 只读目录数据
//!
//! 角色、武器、声骸、等级曲线、主词条与副词条表。
//! 字段名沿用数据文件中的写法。

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::build::{CostTier, Element, StatName, WeaponType};

/// 角色记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub element: Element,
    #[serde(rename = "weaponType")]
    pub weapon_type: WeaponType,
    #[serde(rename = "HP")]
    pub hp: f64,
    #[serde(rename = "ATK")]
    pub atk: f64,
    #[serde(rename = "DEF")]
    pub def: f64,
    /// tree1 / tree5 节点加成
    #[serde(rename = "Bonus1")]
    pub bonus1: String,
    /// tree2 / tree4 节点加成
    #[serde(rename = "Bonus2")]
    pub bonus2: String,
}

impl CharacterRecord {
    /// 漂泊者（双属性主角）
    pub fn is_rover(&self) -> bool {
        self.name.starts_with("Rover")
    }
}

/// 武器记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponRecord {
    pub name: String,
    /// 所属类型，由所在的数据文件决定
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_type: Option<WeaponType>,
    #[serde(default = "default_rarity", deserialize_with = "lenient_u8")]
    pub rarity: u8,
    #[serde(rename = "ATK", deserialize_with = "lenient_f64")]
    pub atk: f64,
    pub main_stat: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub base_main: f64,
    #[serde(default)]
    pub passive: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub passive_stat: Option<f64>,
    #[serde(default)]
    pub passive2: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub passive_stat2: Option<f64>,
}

fn default_rarity() -> u8 {
    1
}

/// 声骸记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoRecord {
    pub name: String,
    pub cost: CostTier,
    pub elements: Vec<Element>,
}

impl EchoRecord {
    pub fn is_multi_element(&self) -> bool {
        self.elements.len() > 1
    }
}

/// 等级曲线，键为 `"level/bracket"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCurves {
    #[serde(rename = "ATK_CURVE")]
    pub atk_curve: HashMap<String, f64>,
    #[serde(rename = "STAT_CURVE")]
    pub stat_curve: HashMap<String, f64>,
    /// 角色基础属性曲线，缺省时使用 ATK_CURVE
    #[serde(rename = "CHAR_CURVE", default)]
    pub char_curve: Option<HashMap<String, f64>>,
}

impl LevelCurves {
    pub fn character_curve(&self) -> &HashMap<String, f64> {
        self.char_curve.as_ref().unwrap_or(&self.atk_curve)
    }
}

/// 固定副属性（如 4 Cost 固定攻击）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStat {
    pub stat: StatName,
    pub value: f64,
}

/// 某个 Cost 档位的主词条表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainStatTier {
    /// 主词条 -> [0 级数值, 25 级数值]
    #[serde(rename = "mainStats")]
    pub main_stats: BTreeMap<StatName, [f64; 2]>,
    pub secondary: FixedStat,
}

/// 声骸最高等级
pub const MAX_ECHO_LEVEL: u8 = 25;

impl MainStatTier {
    pub fn allows(&self, stat: StatName) -> bool {
        self.main_stats.contains_key(&stat)
    }

    /// 按声骸等级线性插值
    pub fn value_at(&self, stat: StatName, level: u8) -> Option<f64> {
        let [min, max] = *self.main_stats.get(&stat)?;
        let t = level.min(MAX_ECHO_LEVEL) as f64 / MAX_ECHO_LEVEL as f64;
        Some(min * (1.0 - t) + max * t)
    }
}

/// 主词条表（按 Cost 分档）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MainStatTable {
    #[serde(flatten)]
    tiers: BTreeMap<String, MainStatTier>,
}

impl MainStatTable {
    pub fn new(tiers: impl IntoIterator<Item = (CostTier, MainStatTier)>) -> Self {
        Self {
            tiers: tiers
                .into_iter()
                .map(|(cost, tier)| (cost.table_key(), tier))
                .collect(),
        }
    }

    pub fn tier(&self, cost: CostTier) -> Option<&MainStatTier> {
        self.tiers.get(&cost.table_key())
    }
}

/// 副词条合法档位表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstatTable {
    #[serde(rename = "subStats")]
    pub sub_stats: BTreeMap<StatName, Vec<f64>>,
}

impl SubstatTable {
    pub fn rolls(&self, stat: StatName) -> Option<&[f64]> {
        self.sub_stats.get(&stat).map(|v| v.as_slice())
    }

    pub fn is_legal(&self, stat: StatName, value: f64) -> bool {
        self.rolls(stat)
            .map(|rolls| rolls.iter().any(|r| (r - value).abs() < 1e-6))
            .unwrap_or(false)
    }

    /// 取最接近的合法档位
    pub fn closest_roll(&self, stat: StatName, value: f64) -> Option<f64> {
        self.rolls(stat)?.iter().copied().min_by(|a, b| {
            (a - value)
                .abs()
                .partial_cmp(&(b - value).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

// 数据文件中的数值可能是字符串
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn to_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().trim_end_matches('%').parse().ok(),
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = NumberOrString::deserialize(deserializer)?;
    raw.to_f64()
        .ok_or_else(|| serde::de::Error::custom("expected a number"))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.to_f64()))
}

fn lenient_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = lenient_f64(deserializer)?;
    if (0.0..=u8::MAX as f64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(serde::de::Error::custom("number out of range"))
    }
}
