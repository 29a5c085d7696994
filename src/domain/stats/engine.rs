//! StatAggregationEngine
//!
//! `compute_stats` 是输入快照的纯函数: 不缓存、不修改输入，
//! 相同输入得到完全相同的结果。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::forte::forte_contributions;
use super::level_curve::scale;
use super::quality::{compute_quality, QualityScore};
use super::sets::{compute_sets, SetBonus};
use crate::domain::build::{BuildState, Element, StatName, WeaponConfig};
use crate::domain::catalog::{LevelCurves, WeaponRecord};

/// 精炼每级提升 25%
const RANK_STEP: f64 = 0.25;

/// 面板中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub final_value: f64,
    /// 加成前的数值
    pub base_value: f64,
    pub delta: f64,
    pub display: String,
}

impl StatLine {
    fn new(stat: StatName, base_value: f64, final_value: f64) -> Self {
        let display = if stat.is_flat() {
            format!("{}", final_value.round() as i64)
        } else {
            format!("{:.1}%", final_value)
        };
        Self {
            final_value,
            base_value,
            delta: final_value - base_value,
            display,
        }
    }
}

pub type StatSheet = BTreeMap<StatName, StatLine>;

/// 派生结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    pub stats: StatSheet,
    pub sets: Vec<SetBonus>,
    pub quality: QualityScore,
}

/// 非 0 的基础值
fn baseline(stat: StatName) -> f64 {
    match stat {
        StatName::CritRate => 5.0,
        StatName::CritDmg => 150.0,
        StatName::EnergyRegen => 100.0,
        _ => 0.0,
    }
}

/// 精炼缩放，保留一位小数
pub fn scale_passive(value: f64, rank: u8) -> f64 {
    let scaled = value * (1.0 + (rank.max(1) - 1) as f64 * RANK_STEP);
    (scaled * 10.0).round() / 10.0
}

/// 武器词条名称 -> 属性
///
/// "ATK" / "HP" / "DEF" 表示百分比，"Attribute" 表示角色属性伤害。
pub fn resolve_weapon_stat(name: &str, element: Element) -> Option<StatName> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("Attribute") {
        return Some(element.dmg_stat());
    }
    if let Some(element) = Element::parse(name.trim_end_matches(" DMG")) {
        return Some(element.dmg_stat());
    }
    StatName::parse(name).map(|stat| stat.percent_variant())
}

/// 武器提供的攻击与各项加成
pub fn weapon_contributions(
    weapon: &WeaponRecord,
    config: WeaponConfig,
    element: Element,
    curves: &LevelCurves,
) -> (f64, Vec<(StatName, f64)>) {
    let atk = scale(&curves.atk_curve, weapon.atk, config.level);
    let mut bonuses = Vec::new();
    if let Some(stat) = resolve_weapon_stat(&weapon.main_stat, element) {
        bonuses.push((stat, scale(&curves.stat_curve, weapon.base_main, config.level)));
    }
    let passives = [
        (weapon.passive.as_deref(), weapon.passive_stat),
        (weapon.passive2.as_deref(), weapon.passive_stat2),
    ];
    for (name, value) in passives {
        if let (Some(name), Some(value)) = (name, value) {
            if let Some(stat) = resolve_weapon_stat(name, element) {
                bonuses.push((stat, scale_passive(value, config.rank)));
            }
        }
    }
    (atk, bonuses)
}

/// 计算最终面板、套装与暴击值
pub fn compute_stats(build: &BuildState, curves: &LevelCurves) -> BuildStats {
    let panels = build.echo_panels();
    let sets = compute_sets(panels);
    let quality = compute_quality(panels);

    let Some(character) = build.character() else {
        return BuildStats {
            stats: StatSheet::new(),
            sets,
            quality,
        };
    };
    let element = build.active_element().unwrap_or(character.element);

    let char_curve = curves.character_curve();
    let mut base: BTreeMap<StatName, f64> = BTreeMap::from([
        (StatName::Hp, scale(char_curve, character.hp, build.level())),
        (StatName::Atk, scale(char_curve, character.atk, build.level())),
        (StatName::Def, scale(char_curve, character.def, build.level())),
    ]);
    let mut totals: BTreeMap<StatName, f64> = BTreeMap::new();
    let mut add = |stat: StatName, value: f64| *totals.entry(stat).or_default() += value;

    let weapon = build.weapon();
    if let Some(record) = weapon.selected.as_ref() {
        let (atk, bonuses) = weapon_contributions(record, weapon.config, element, curves);
        *base.entry(StatName::Atk).or_default() += atk;
        bonuses.into_iter().for_each(|(stat, value)| add(stat, value));
    }

    for (stat, value) in forte_contributions(character, element, build.forte()) {
        add(stat, value);
    }

    for panel in panels.iter().filter(|p| !p.is_empty()) {
        let stats = panel
            .main_stat
            .iter()
            .chain(panel.secondary.iter())
            .chain(panel.sub_stats.iter().flatten());
        for entry in stats {
            add(entry.stat, entry.value);
        }
    }

    let mut sheet = StatSheet::new();
    for stat in StatName::ALL {
        if stat.is_modifier() {
            continue;
        }
        let bonus = totals.get(&stat).copied().unwrap_or(0.0);
        if stat.is_flat() {
            let base_value = base.get(&stat).copied().unwrap_or(0.0);
            let percent = totals.get(&stat.percent_variant()).copied().unwrap_or(0.0);
            let final_value = base_value * (1.0 + percent / 100.0) + bonus;
            sheet.insert(stat, StatLine::new(stat, base_value, final_value));
        } else {
            let base_value = baseline(stat);
            let final_value = base_value + bonus;
            if final_value != 0.0 {
                sheet.insert(stat, StatLine::new(stat, base_value, final_value));
            }
        }
    }

    BuildStats {
        stats: sheet,
        sets,
        quality,
    }
}
