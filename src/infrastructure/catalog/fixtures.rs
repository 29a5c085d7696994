//! 测试用目录数据

use std::collections::{BTreeMap, HashMap};

use super::JsonCatalog;
use crate::domain::build::{CostTier, Element, StatName, WeaponType};
use crate::domain::catalog::{
    CharacterRecord, EchoRecord, FixedStat, LevelCurves, MainStatTable, MainStatTier,
    SubstatTable, WeaponRecord,
};

fn character(name: &str, element: Element, weapon_type: WeaponType, bonus1: &str) -> CharacterRecord {
    CharacterRecord {
        name: name.to_string(),
        element,
        weapon_type,
        hp: 800.0,
        atk: 20.0,
        def: 100.0,
        bonus1: bonus1.to_string(),
        bonus2: "ATK".to_string(),
    }
}

fn weapon(name: &str, main_stat: &str, passive: &str) -> WeaponRecord {
    WeaponRecord {
        name: name.to_string(),
        weapon_type: None,
        rarity: 5,
        atk: 40.0,
        main_stat: main_stat.to_string(),
        base_main: 4.0,
        passive: Some(passive.to_string()),
        passive_stat: Some(12.0),
        passive2: None,
        passive_stat2: None,
    }
}

fn echo(name: &str, cost: CostTier, elements: &[Element]) -> EchoRecord {
    EchoRecord {
        name: name.to_string(),
        cost,
        elements: elements.to_vec(),
    }
}

fn tier(main: &[(StatName, f64, f64)], secondary: StatName, value: f64) -> MainStatTier {
    MainStatTier {
        main_stats: main
            .iter()
            .map(|(stat, min, max)| (*stat, [*min, *max]))
            .collect(),
        secondary: FixedStat {
            stat: secondary,
            value,
        },
    }
}

/// 小型目录: 三个角色、三把武器、五种声骸
pub fn sample_catalog() -> JsonCatalog {
    let curves = LevelCurves {
        atk_curve: HashMap::from([("90/90".to_string(), 12.5)]),
        stat_curve: HashMap::from([("90/90".to_string(), 4.5)]),
        char_curve: None,
    };

    let main_stats = MainStatTable::new([
        (
            CostTier::Four,
            tier(
                &[
                    (StatName::CritRate, 4.4, 22.0),
                    (StatName::CritDmg, 8.8, 44.0),
                    (StatName::AtkPercent, 6.6, 33.0),
                ],
                StatName::Atk,
                150.0,
            ),
        ),
        (
            CostTier::Three,
            tier(
                &[
                    (StatName::AtkPercent, 6.0, 30.0),
                    (StatName::SpectroDmg, 6.0, 30.0),
                    (StatName::EnergyRegen, 6.4, 32.0),
                ],
                StatName::Atk,
                100.0,
            ),
        ),
        (
            CostTier::One,
            tier(
                &[(StatName::AtkPercent, 3.6, 18.0), (StatName::HpPercent, 4.56, 22.8)],
                StatName::Hp,
                2280.0,
            ),
        ),
    ]);

    let substats = SubstatTable {
        sub_stats: BTreeMap::from([
            (StatName::CritRate, vec![6.3, 6.9, 7.5, 8.1, 8.7, 9.3, 9.9, 10.5]),
            (StatName::CritDmg, vec![12.6, 13.8, 15.0, 16.2, 17.4, 18.6, 19.8, 21.0]),
            (StatName::AtkPercent, vec![6.4, 7.1, 7.9, 8.6, 9.4, 10.1, 10.9, 11.6]),
            (StatName::Atk, vec![30.0, 40.0, 50.0, 60.0]),
            (StatName::SkillDmg, vec![6.4, 7.1, 7.9, 8.6, 9.4, 10.1, 10.9, 11.6]),
        ]),
    };

    JsonCatalog::empty()
        .with_character(character("Jinhsi", Element::Spectro, WeaponType::Broadblade, "Crit Rate"))
        .with_character(character("Changli", Element::Fusion, WeaponType::Sword, "Crit Rate"))
        .with_character(character("Rover", Element::Spectro, WeaponType::Sword, "Spectro"))
        .with_weapon(
            WeaponType::Broadblade,
            weapon("Ages of Harvest", "Crit Rate", "Attribute"),
        )
        .with_weapon(
            WeaponType::Sword,
            weapon("Emerald of Genesis", "Crit Rate", "Energy Regen"),
        )
        .with_weapon(
            WeaponType::Sword,
            weapon("Blazing Brilliance", "Crit DMG", "ATK"),
        )
        .with_echo(echo("Jue", CostTier::Four, &[Element::Spectro]))
        .with_echo(echo("Dreamless", CostTier::Four, &[Element::Havoc]))
        .with_echo(echo("Cruisewing", CostTier::Three, &[Element::Spectro, Element::Havoc]))
        .with_echo(echo("Hoochief", CostTier::One, &[Element::Aero]))
        .with_echo(echo("Zig Zag", CostTier::One, &[Element::Spectro]))
        .with_curves(curves)
        .with_main_stats(main_stats)
        .with_substats(substats)
}
