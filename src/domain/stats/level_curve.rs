//! 等级曲线查表
//!
//! 曲线以 `"level/bracket"` 为键，bracket 为不小于等级的最小突破边界。
//! 20 级及以下共用 `"1/20"`。

use std::collections::HashMap;

use crate::domain::build::MAX_LEVEL;

/// 突破边界
pub const LEVEL_BRACKETS: [u8; 7] = [20, 40, 50, 60, 70, 80, 90];

/// 等级 -> 曲线键，如 45 -> "45/50"，10 -> "1/20"
pub fn bracket_key(level: u8) -> String {
    let level = level.clamp(1, MAX_LEVEL);
    if level <= LEVEL_BRACKETS[0] {
        return format!("1/{}", LEVEL_BRACKETS[0]);
    }
    let bracket = LEVEL_BRACKETS
        .iter()
        .copied()
        .find(|b| level <= *b)
        .unwrap_or(MAX_LEVEL);
    format!("{}/{}", level, bracket)
}

/// 曲线倍率，表中缺失时为 1
pub fn multiplier(curve: &HashMap<String, f64>, level: u8) -> f64 {
    let key = bracket_key(level);
    match curve.get(&key) {
        Some(value) => *value,
        None => {
            tracing::warn!(
                level = level,
                key = %key,
                "Level curve entry missing, using base value"
            );
            1.0
        }
    }
}

pub fn scale(curve: &HashMap<String, f64>, base: f64, level: u8) -> f64 {
    base * multiplier(curve, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_key() {
        assert_eq!(bracket_key(45), "45/50");
        assert_eq!(bracket_key(1), "1/20");
        assert_eq!(bracket_key(10), "1/20");
        assert_eq!(bracket_key(20), "1/20");
        assert_eq!(bracket_key(21), "21/40");
        assert_eq!(bracket_key(70), "70/70");
        assert_eq!(bracket_key(90), "90/90");
        assert_eq!(bracket_key(0), "1/20");
    }

    #[test]
    fn test_scale_uses_bracket() {
        let curve = HashMap::from([
            ("45/40".to_string(), 2.0),
            ("45/50".to_string(), 3.0),
            ("45/60".to_string(), 4.0),
        ]);
        assert_eq!(scale(&curve, 10.0, 45), 30.0);
        assert_eq!(scale(&curve, 10.0, 46), 10.0);
    }

    #[test]
    fn test_low_levels_share_first_bracket() {
        let curve = HashMap::from([("1/20".to_string(), 2.0), ("21/40".to_string(), 3.0)]);
        assert_eq!(scale(&curve, 100.0, 10), 200.0);
        assert_eq!(scale(&curve, 100.0, 20), 200.0);
        assert_eq!(scale(&curve, 100.0, 21), 300.0);
    }
}
