//! 共鸣链节点加成

use crate::domain::build::{Element, ForteState, ForteTree, StatName};
use crate::domain::catalog::CharacterRecord;

/// 节点加成数值 (middle, top)
pub fn node_values(stat: StatName) -> (f64, f64) {
    match stat {
        StatName::CritRate => (1.2, 2.8),
        StatName::CritDmg => (2.4, 5.6),
        StatName::DefPercent => (2.28, 5.32),
        _ => (1.8, 4.2),
    }
}

/// 角色数据里的加成名称 -> 属性
///
/// "ATK" / "HP" / "DEF" 指百分比加成，属性名指对应属性伤害。
pub fn forte_bonus_stat(bonus: &str) -> Option<StatName> {
    let bonus = bonus.trim();
    if let Some(element) = Element::parse(bonus) {
        return Some(element.dmg_stat());
    }
    if bonus.eq_ignore_ascii_case("Healing") {
        return Some(StatName::HealingBonus);
    }
    StatName::parse(bonus).map(|stat| stat.percent_variant())
}

/// 节点加成明细
///
/// tree1 / tree5 提供 Bonus1，tree2 / tree4 提供 Bonus2，tree3 无属性加成。
/// 漂泊者的 Bonus1 随当前属性变化，Bonus2 固定为攻击百分比。
pub fn forte_contributions(
    character: &CharacterRecord,
    active_element: Element,
    forte: &ForteState,
) -> Vec<(StatName, f64)> {
    let (bonus1, bonus2) = if character.is_rover() {
        (Some(active_element.dmg_stat()), Some(StatName::AtkPercent))
    } else {
        (
            forte_bonus_stat(&character.bonus1),
            forte_bonus_stat(&character.bonus2),
        )
    };

    let mut contributions = Vec::new();
    for tree in ForteTree::ALL {
        let stat = match tree {
            ForteTree::Tree1 | ForteTree::Tree5 => bonus1,
            ForteTree::Tree2 | ForteTree::Tree4 => bonus2,
            ForteTree::Tree3 => None,
        };
        let Some(stat) = stat else { continue };
        let node = forte.node(tree);
        let (middle, top) = node_values(stat);
        if node.middle {
            contributions.push((stat, middle));
        }
        if node.top {
            contributions.push((stat, top));
        }
    }
    contributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::{NodeState, WeaponType};

    fn character(name: &str, bonus1: &str, bonus2: &str) -> CharacterRecord {
        CharacterRecord {
            name: name.to_string(),
            element: Element::Spectro,
            weapon_type: WeaponType::Sword,
            hp: 1.0,
            atk: 1.0,
            def: 1.0,
            bonus1: bonus1.to_string(),
            bonus2: bonus2.to_string(),
        }
    }

    #[test]
    fn test_bonus_names() {
        assert_eq!(forte_bonus_stat("ATK"), Some(StatName::AtkPercent));
        assert_eq!(forte_bonus_stat("Glacio"), Some(StatName::GlacioDmg));
        assert_eq!(forte_bonus_stat("Healing"), Some(StatName::HealingBonus));
        assert_eq!(forte_bonus_stat("Crit DMG"), Some(StatName::CritDmg));
        assert_eq!(forte_bonus_stat("???"), None);
    }

    #[test]
    fn test_full_tree_contributions() {
        let jinhsi = character("Jinhsi", "Crit Rate", "ATK");
        let forte = ForteState::uniform(10, true);
        let total = |stat: StatName| -> f64 {
            forte_contributions(&jinhsi, Element::Spectro, &forte)
                .into_iter()
                .filter(|(s, _)| *s == stat)
                .map(|(_, v)| v)
                .sum()
        };
        assert!((total(StatName::CritRate) - 8.0).abs() < 1e-9);
        assert!((total(StatName::AtkPercent) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_rover_uses_active_element() {
        let rover = character("Rover", "Spectro", "ATK");
        let mut forte = ForteState::default();
        forte.node_states.insert(
            ForteTree::Tree1,
            NodeState {
                top: true,
                middle: false,
            },
        );
        let contributions = forte_contributions(&rover, Element::Havoc, &forte);
        assert_eq!(contributions, vec![(StatName::HavocDmg, 4.2)]);
    }
}
