//! Build Context - Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// 属性（六种元素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Aero,
    Glacio,
    Fusion,
    Electro,
    Havoc,
    Spectro,
}

impl Element {
    pub const ALL: [Element; 6] = [
        Element::Aero,
        Element::Glacio,
        Element::Fusion,
        Element::Electro,
        Element::Havoc,
        Element::Spectro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Aero => "Aero",
            Element::Glacio => "Glacio",
            Element::Fusion => "Fusion",
            Element::Electro => "Electro",
            Element::Havoc => "Havoc",
            Element::Spectro => "Spectro",
        }
    }

    /// 大小写不敏感解析
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
    }

    /// 对应的属性伤害加成
    pub fn dmg_stat(&self) -> StatName {
        match self {
            Element::Aero => StatName::AeroDmg,
            Element::Glacio => StatName::GlacioDmg,
            Element::Fusion => StatName::FusionDmg,
            Element::Electro => StatName::ElectroDmg,
            Element::Havoc => StatName::HavocDmg,
            Element::Spectro => StatName::SpectroDmg,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 武器类型
///
/// 识别服务与目录文件可能使用复数形式（"Swords"），解析时统一去掉末尾的 `s`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeaponType {
    Broadblade,
    Sword,
    Pistol,
    Gauntlet,
    Rectifier,
}

impl WeaponType {
    pub const ALL: [WeaponType; 5] = [
        WeaponType::Broadblade,
        WeaponType::Sword,
        WeaponType::Pistol,
        WeaponType::Gauntlet,
        WeaponType::Rectifier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Broadblade => "Broadblade",
            WeaponType::Sword => "Sword",
            WeaponType::Pistol => "Pistol",
            WeaponType::Gauntlet => "Gauntlet",
            WeaponType::Rectifier => "Rectifier",
        }
    }

    /// 单复数归一化后解析
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let singular = s.strip_suffix('s').unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(singular))
    }

    /// 目录中的武器数据文件名（如 `Swords.json`）
    pub fn catalog_file(&self) -> String {
        format!("{}s.json", self.as_str())
    }
}

impl fmt::Display for WeaponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for WeaponType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown weapon type: {}", value))
    }
}

impl From<WeaponType> for String {
    fn from(value: WeaponType) -> Self {
        value.as_str().to_string()
    }
}

/// 属性名称（封闭集合）
///
/// `HpPercent` / `AtkPercent` / `DefPercent` 只作为输入存在，
/// 最终面板中会折算进 HP / ATK / DEF。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatName {
    Hp,
    Atk,
    Def,
    HpPercent,
    AtkPercent,
    DefPercent,
    CritRate,
    CritDmg,
    EnergyRegen,
    HealingBonus,
    AeroDmg,
    GlacioDmg,
    FusionDmg,
    ElectroDmg,
    HavocDmg,
    SpectroDmg,
    BasicAttackDmg,
    HeavyAttackDmg,
    SkillDmg,
    LiberationDmg,
}

impl StatName {
    pub const ALL: [StatName; 20] = [
        StatName::Hp,
        StatName::Atk,
        StatName::Def,
        StatName::HpPercent,
        StatName::AtkPercent,
        StatName::DefPercent,
        StatName::CritRate,
        StatName::CritDmg,
        StatName::EnergyRegen,
        StatName::HealingBonus,
        StatName::AeroDmg,
        StatName::GlacioDmg,
        StatName::FusionDmg,
        StatName::ElectroDmg,
        StatName::HavocDmg,
        StatName::SpectroDmg,
        StatName::BasicAttackDmg,
        StatName::HeavyAttackDmg,
        StatName::SkillDmg,
        StatName::LiberationDmg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Hp => "HP",
            StatName::Atk => "ATK",
            StatName::Def => "DEF",
            StatName::HpPercent => "HP%",
            StatName::AtkPercent => "ATK%",
            StatName::DefPercent => "DEF%",
            StatName::CritRate => "Crit Rate",
            StatName::CritDmg => "Crit DMG",
            StatName::EnergyRegen => "Energy Regen",
            StatName::HealingBonus => "Healing Bonus",
            StatName::AeroDmg => "Aero DMG",
            StatName::GlacioDmg => "Glacio DMG",
            StatName::FusionDmg => "Fusion DMG",
            StatName::ElectroDmg => "Electro DMG",
            StatName::HavocDmg => "Havoc DMG",
            StatName::SpectroDmg => "Spectro DMG",
            StatName::BasicAttackDmg => "Basic Attack DMG Bonus",
            StatName::HeavyAttackDmg => "Heavy Attack DMG Bonus",
            StatName::SkillDmg => "Resonance Skill DMG Bonus",
            StatName::LiberationDmg => "Resonance Liberation DMG Bonus",
        }
    }

    /// 解析属性名
    ///
    /// 忽略大小写、句点和 "Resonance " 前缀，"Bonus" 后缀可省略。
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = normalize_stat_text(s);
        Self::ALL
            .into_iter()
            .find(|stat| normalize_stat_text(stat.as_str()) == normalized)
    }

    /// HP / ATK / DEF 固定值
    pub fn is_flat(&self) -> bool {
        matches!(self, StatName::Hp | StatName::Atk | StatName::Def)
    }

    /// 仅作为输入的百分比修正项
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            StatName::HpPercent | StatName::AtkPercent | StatName::DefPercent
        )
    }

    /// 同名百分比版本（"HP" -> "HP%"）
    pub fn percent_variant(&self) -> Self {
        match self {
            StatName::Hp => StatName::HpPercent,
            StatName::Atk => StatName::AtkPercent,
            StatName::Def => StatName::DefPercent,
            other => *other,
        }
    }

    pub fn is_crit(&self) -> bool {
        matches!(self, StatName::CritRate | StatName::CritDmg)
    }
}

fn normalize_stat_text(s: &str) -> String {
    let lowered = s.trim().to_lowercase().replace('.', "");
    let lowered = lowered.strip_prefix("resonance ").unwrap_or(&lowered);
    let lowered = lowered.strip_suffix(" bonus").unwrap_or(lowered);
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for StatName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown stat: {}", value))
    }
}

impl From<StatName> for String {
    fn from(value: StatName) -> Self {
        value.as_str().to_string()
    }
}

/// 共鸣链（Forte）分支节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForteTree {
    Tree1,
    Tree2,
    Tree3,
    Tree4,
    Tree5,
}

impl ForteTree {
    pub const ALL: [ForteTree; 5] = [
        ForteTree::Tree1,
        ForteTree::Tree2,
        ForteTree::Tree3,
        ForteTree::Tree4,
        ForteTree::Tree5,
    ];

    /// 该分支下方对应的技能
    pub fn skill(&self) -> SkillKey {
        match self {
            ForteTree::Tree1 => SkillKey::NormalAttack,
            ForteTree::Tree2 => SkillKey::Skill,
            ForteTree::Tree3 => SkillKey::Circuit,
            ForteTree::Tree4 => SkillKey::Liberation,
            ForteTree::Tree5 => SkillKey::Intro,
        }
    }
}

/// 技能键
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillKey {
    NormalAttack,
    Skill,
    Circuit,
    Liberation,
    Intro,
}

impl SkillKey {
    pub const ALL: [SkillKey; 5] = [
        SkillKey::NormalAttack,
        SkillKey::Skill,
        SkillKey::Circuit,
        SkillKey::Liberation,
        SkillKey::Intro,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillKey::NormalAttack => "Normal Attack",
            SkillKey::Skill => "Resonance Skill",
            SkillKey::Circuit => "Forte Circuit",
            SkillKey::Liberation => "Resonance Liberation",
            SkillKey::Intro => "Intro Skill",
        }
    }
}

/// 节点位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodePosition {
    Top,
    Middle,
}

/// 声骸 Cost 档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CostTier {
    One,
    Three,
    Four,
}

impl CostTier {
    /// 最高档位
    pub const HIGHEST: CostTier = CostTier::Four;

    pub fn value(&self) -> u8 {
        match self {
            CostTier::One => 1,
            CostTier::Three => 3,
            CostTier::Four => 4,
        }
    }

    /// 目录主词条表中的键（如 `4cost`）
    pub fn table_key(&self) -> String {
        format!("{}cost", self.value())
    }
}

impl TryFrom<u8> for CostTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CostTier::One),
            3 => Ok(CostTier::Three),
            4 => Ok(CostTier::Four),
            other => Err(format!("invalid echo cost: {}", other)),
        }
    }
}

impl From<CostTier> for u8 {
    fn from(value: CostTier) -> Self {
        value.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_type_plural_normalization() {
        assert_eq!(WeaponType::parse("Swords"), Some(WeaponType::Sword));
        assert_eq!(WeaponType::parse("pistols"), Some(WeaponType::Pistol));
        assert_eq!(WeaponType::parse("Rectifier"), Some(WeaponType::Rectifier));
        assert_eq!(WeaponType::parse("Bow"), None);
    }

    #[test]
    fn test_stat_name_aliases() {
        assert_eq!(StatName::parse("Crit. Rate"), Some(StatName::CritRate));
        assert_eq!(StatName::parse("crit dmg"), Some(StatName::CritDmg));
        assert_eq!(StatName::parse("Skill DMG Bonus"), Some(StatName::SkillDmg));
        assert_eq!(
            StatName::parse("Resonance Liberation DMG Bonus"),
            Some(StatName::LiberationDmg)
        );
        assert_eq!(StatName::parse("ATK%"), Some(StatName::AtkPercent));
        assert_eq!(StatName::parse("Luck"), None);
    }

    #[test]
    fn test_stat_name_serde_uses_display_name() {
        let json = serde_json::to_string(&StatName::CritDmg).unwrap();
        assert_eq!(json, "\"Crit DMG\"");
        let parsed: StatName = serde_json::from_str("\"Energy Regen\"").unwrap();
        assert_eq!(parsed, StatName::EnergyRegen);
    }

    #[test]
    fn test_forte_tree_keys() {
        let json = serde_json::to_string(&ForteTree::Tree3).unwrap();
        assert_eq!(json, "\"tree3\"");
        let json = serde_json::to_string(&SkillKey::NormalAttack).unwrap();
        assert_eq!(json, "\"normal-attack\"");
        assert_eq!(ForteTree::Tree4.skill(), SkillKey::Liberation);
    }

    #[test]
    fn test_cost_tier() {
        assert_eq!(CostTier::try_from(4).unwrap(), CostTier::HIGHEST);
        assert!(CostTier::try_from(2).is_err());
        assert_eq!(CostTier::Three.table_key(), "3cost");
    }
}
