//! ResultClassifier - 识别服务原始响应 -> AnalysisVariant
//!
//! 纯函数。结构校验失败的载荷统一归为 `Unknown`，下游视为空操作。

use serde_json::Value;

use super::analysis::{AnalysisVariant, ForteBranch, RawStat, StatReading};
use crate::domain::build::{Element, NodeState, SkillKey, WeaponType, MAX_LEVEL, MAX_RANK, MAX_SEQUENCE};
use crate::domain::catalog::MAX_ECHO_LEVEL;

const MAX_FORTE_LEVEL: i64 = 10;

/// 载荷中的分支名与技能键
const FORTE_BRANCHES: [(&str, SkillKey); 5] = [
    ("normal", SkillKey::NormalAttack),
    ("skill", SkillKey::Skill),
    ("circuit", SkillKey::Circuit),
    ("liberation", SkillKey::Liberation),
    ("intro", SkillKey::Intro),
];

/// 分类单个 `analysis` 载荷
pub fn classify(analysis: &Value) -> AnalysisVariant {
    let parsed = match analysis.get("type").and_then(Value::as_str) {
        Some("Character") => parse_character(analysis),
        Some("Weapon") => parse_weapon(analysis),
        Some("Sequences") | Some("Sequence") => parse_sequence(analysis),
        Some("Forte") => parse_forte(analysis),
        Some("Echo") => parse_echo(analysis),
        _ => None,
    };
    parsed.unwrap_or(AnalysisVariant::Unknown)
}

fn parse_character(v: &Value) -> Option<AnalysisVariant> {
    let name = read_name(v.get("name"))?;
    let level = read_ranged(v.get("level"), 1, 1, MAX_LEVEL as i64)?;
    let element = v.get("element").and_then(Value::as_str).and_then(Element::parse);
    Some(AnalysisVariant::Character {
        name,
        level,
        element,
    })
}

fn parse_weapon(v: &Value) -> Option<AnalysisVariant> {
    let name = read_name(v.get("name"))?;
    let weapon_type = v
        .get("weaponType")
        .and_then(Value::as_str)
        .and_then(WeaponType::parse)?;
    let level = read_ranged(v.get("level"), 1, 1, MAX_LEVEL as i64)?;
    let rank = read_ranged(v.get("rank"), 1, 1, MAX_RANK as i64)?;
    Some(AnalysisVariant::Weapon {
        name,
        weapon_type,
        level,
        rank,
    })
}

fn parse_sequence(v: &Value) -> Option<AnalysisVariant> {
    let mut slots = [false; 6];
    if let Some(raw) = v.get("slots").filter(|s| !s.is_null()) {
        let items = raw.as_array().filter(|a| a.len() == slots.len())?;
        for (slot, item) in slots.iter_mut().zip(items) {
            *slot = read_flag(item)?;
        }
    } else {
        let count = read_ranged(v.get("sequence"), 0, 0, MAX_SEQUENCE as i64)?;
        slots.iter_mut().take(count as usize).for_each(|s| *s = true);
    }
    Some(AnalysisVariant::Sequence { slots })
}

fn parse_forte(v: &Value) -> Option<AnalysisVariant> {
    let mut branches = Vec::with_capacity(FORTE_BRANCHES.len());
    for (key, skill) in FORTE_BRANCHES {
        let values = v.get(key)?.as_array().filter(|a| a.len() == 3)?;
        let level = read_int(Some(&values[0]))?;
        if !(1..=MAX_FORTE_LEVEL).contains(&level) {
            return None;
        }
        branches.push(ForteBranch {
            skill,
            level: level as u8,
            nodes: NodeState {
                top: read_flag(&values[1])?,
                middle: read_flag(&values[2])?,
            },
        });
    }
    let branches: [ForteBranch; 5] = branches.try_into().ok()?;
    Some(AnalysisVariant::Forte { branches })
}

fn parse_echo(v: &Value) -> Option<AnalysisVariant> {
    let element_text = v.get("element")?.as_str()?;
    let raw = v.get("raw_texts")?;
    let name = read_name(raw.get("name"))?;
    let level = parse_echo_level(raw.get("level")?.as_str()?)?;
    let main_stat = read_raw_stat(raw.get("main")?)?;
    let sub_stats = raw
        .get("subs")?
        .as_array()?
        .iter()
        .map(read_raw_stat)
        .collect::<Option<Vec<_>>>()?;
    Some(AnalysisVariant::Echo {
        name,
        level,
        element: Element::parse(element_text),
        main_stat,
        sub_stats,
    })
}

/// 解析 "+N" 形式的声骸等级，无法匹配时为 0
fn parse_echo_level(text: &str) -> Option<u8> {
    let digits: String = match text.find('+') {
        Some(pos) => text[pos + 1..].chars().take_while(char::is_ascii_digit).collect(),
        None => return Some(0),
    };
    if digits.is_empty() {
        return Some(0);
    }
    let level: u32 = digits.parse().ok()?;
    (level <= MAX_ECHO_LEVEL as u32).then_some(level as u8)
}

/// 解析词条数值: 非负数，可带百分号
pub fn parse_stat_value(text: &str) -> Option<StatReading> {
    let text = text.trim();
    let (number, percent) = match text.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (text, false),
    };
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(StatReading { value, percent })
}

fn read_raw_stat(v: &Value) -> Option<RawStat> {
    let name = read_name(v.get("name"))?;
    let reading = match v.get("value")? {
        Value::String(s) => parse_stat_value(s)?,
        Value::Number(n) => parse_stat_value(&n.to_string())?,
        _ => return None,
    };
    Some(RawStat { name, reading })
}

fn read_name(v: Option<&Value>) -> Option<String> {
    let name = v?.as_str()?.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// 读取整数，接受数字或数字字符串
fn read_int(v: Option<&Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 缺省取默认值；存在但越界或非数字时返回 None
fn read_ranged(v: Option<&Value>, default: u8, min: i64, max: i64) -> Option<u8> {
    match v {
        None | Some(Value::Null) => Some(default),
        Some(value) => {
            let n = read_int(Some(value))?;
            (min..=max).contains(&n).then_some(n as u8)
        }
    }
}

/// 0 / 1 或布尔
fn read_flag(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        other => match read_int(Some(other))? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recognition::AnalysisKind;
    use serde_json::json;

    #[test]
    fn test_character_with_string_level() {
        let variant = classify(&json!({
            "type": "Character",
            "name": "Jinhsi",
            "level": "90",
            "element": "Spectro"
        }));
        assert_eq!(
            variant,
            AnalysisVariant::Character {
                name: "Jinhsi".to_string(),
                level: 90,
                element: Some(Element::Spectro),
            }
        );
        assert_eq!(variant.details(), "Lv.90 Jinhsi");
    }

    #[test]
    fn test_out_of_range_becomes_unknown() {
        let over_level = json!({"type": "Character", "name": "Jinhsi", "level": 91});
        assert_eq!(classify(&over_level), AnalysisVariant::Unknown);

        let bad_rank = json!({
            "type": "Weapon",
            "name": "Ages of Harvest",
            "weaponType": "Broadblades",
            "level": 90,
            "rank": 6
        });
        assert_eq!(classify(&bad_rank), AnalysisVariant::Unknown);

        let no_name = json!({"type": "Character", "level": 50});
        assert_eq!(classify(&no_name).kind(), AnalysisKind::Unknown);
    }

    #[test]
    fn test_weapon_defaults_and_plural_type() {
        let variant = classify(&json!({
            "type": "Weapon",
            "name": "Ages of Harvest",
            "weaponType": "Broadblades",
            "level": null
        }));
        assert_eq!(
            variant,
            AnalysisVariant::Weapon {
                name: "Ages of Harvest".to_string(),
                weapon_type: WeaponType::Broadblade,
                level: 1,
                rank: 1,
            }
        );
    }

    #[test]
    fn test_sequence_count_and_slots() {
        let by_count = classify(&json!({"type": "Sequences", "sequence": 3}));
        assert_eq!(by_count.details(), "Sequence 3");

        let by_slots = classify(&json!({
            "type": "Sequence",
            "slots": [1, 1, 0, 1, 0, 0]
        }));
        assert_eq!(by_slots.details(), "Sequence 2");

        let too_many = classify(&json!({"type": "Sequences", "sequence": 7}));
        assert_eq!(too_many, AnalysisVariant::Unknown);
    }

    #[test]
    fn test_forte_branches() {
        let payload = json!({
            "type": "Forte",
            "normal": [10, 1, 1],
            "skill": [9, 0, 1],
            "circuit": [10, 1, 1],
            "liberation": ["8", 1, 0],
            "intro": [1, 0, 0]
        });
        match classify(&payload) {
            AnalysisVariant::Forte { branches } => {
                assert_eq!(branches[0].skill, SkillKey::NormalAttack);
                assert_eq!(branches[1].level, 9);
                assert!(branches[1].nodes.middle);
                assert!(!branches[1].nodes.top);
                assert_eq!(branches[3].level, 8);
            }
            other => panic!("expected forte, got {:?}", other),
        }

        let bad_flag = json!({
            "type": "Forte",
            "normal": [10, 2, 1],
            "skill": [9, 0, 1],
            "circuit": [10, 1, 1],
            "liberation": [8, 1, 0],
            "intro": [1, 0, 0]
        });
        assert_eq!(classify(&bad_flag), AnalysisVariant::Unknown);
    }

    #[test]
    fn test_echo_payload() {
        let payload = json!({
            "type": "Echo",
            "element": "Spectro",
            "raw_texts": {
                "name": "Jue",
                "level": "+25",
                "main": {"name": "Crit Rate", "value": "22%"},
                "subs": [
                    {"name": "Crit DMG", "value": "21.0%"},
                    {"name": "ATK", "value": "50"}
                ]
            }
        });
        let variant = classify(&payload);
        match &variant {
            AnalysisVariant::Echo {
                level, sub_stats, ..
            } => {
                assert_eq!(*level, 25);
                assert_eq!(sub_stats.len(), 2);
                assert!(sub_stats[0].reading.percent);
                assert!(!sub_stats[1].reading.percent);
            }
            other => panic!("expected echo, got {:?}", other),
        }
        assert_eq!(variant.details(), "Lv.25 Jue\nSpectro | Crit Rate: 22%");
    }

    #[test]
    fn test_echo_with_negative_value_is_unknown() {
        let payload = json!({
            "type": "Echo",
            "element": "Havoc",
            "raw_texts": {
                "name": "Dreamless",
                "level": "+25",
                "main": {"name": "Crit DMG", "value": "-44%"},
                "subs": []
            }
        });
        assert_eq!(classify(&payload), AnalysisVariant::Unknown);
    }

    #[test]
    fn test_unrecognised_type_tag() {
        assert_eq!(classify(&json!({"type": "unknown"})), AnalysisVariant::Unknown);
        assert_eq!(classify(&json!("nonsense")), AnalysisVariant::Unknown);
    }

    #[test]
    fn test_parse_stat_value() {
        assert_eq!(
            parse_stat_value("10.5%"),
            Some(StatReading {
                value: 10.5,
                percent: true
            })
        );
        assert_eq!(parse_stat_value("abc"), None);
    }
}
