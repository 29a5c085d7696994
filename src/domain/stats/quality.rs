//! 暴击值 (CV)

use serde::{Deserialize, Serialize};

use crate::domain::build::{CostTier, EchoPanel, StatName};

/// 恰好两个最高 Cost 声骸时的修正值
pub const DOUBLE_TOP_COST_CORRECTION: f64 = 44.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Goat,
    Excellent,
    High,
    Good,
    Decent,
    Low,
}

impl QualityTier {
    pub fn classify(score: f64) -> Self {
        match score {
            s if s >= 232.0 => QualityTier::Goat,
            s if s >= 220.0 => QualityTier::Excellent,
            s if s >= 205.0 => QualityTier::High,
            s if s >= 195.0 => QualityTier::Good,
            s if s >= 175.0 => QualityTier::Decent,
            _ => QualityTier::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub raw: f64,
    pub adjusted: f64,
    pub tier: QualityTier,
}

/// 副词条暴击率 x2 + 暴击伤害
pub fn compute_quality(panels: &[EchoPanel]) -> QualityScore {
    let raw: f64 = panels
        .iter()
        .flat_map(|panel| panel.sub_stats.iter().flatten())
        .map(|sub| match sub.stat {
            StatName::CritRate => sub.value * 2.0,
            StatName::CritDmg => sub.value,
            _ => 0.0,
        })
        .sum();

    let top_cost = panels
        .iter()
        .filter(|p| p.echo.as_ref().is_some_and(|e| e.cost == CostTier::HIGHEST))
        .count();
    let adjusted = if top_cost == 2 {
        raw - DOUBLE_TOP_COST_CORRECTION
    } else {
        raw
    };

    QualityScore {
        raw,
        adjusted,
        tier: QualityTier::classify(adjusted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::{Element, PanelStat};
    use crate::domain::catalog::EchoRecord;

    fn panel(cost: CostTier, crit_rate: f64, crit_dmg: f64) -> EchoPanel {
        let mut panel = EchoPanel {
            echo: Some(EchoRecord {
                name: format!("echo-{}-{}", cost.value(), crit_rate),
                cost,
                elements: vec![Element::Spectro],
            }),
            level: 25,
            ..Default::default()
        };
        panel.sub_stats[0] = Some(PanelStat::new(StatName::CritRate, crit_rate));
        panel.sub_stats[1] = Some(PanelStat::new(StatName::CritDmg, crit_dmg));
        panel.sub_stats[2] = Some(PanelStat::new(StatName::AtkPercent, 11.6));
        panel
    }

    #[test]
    fn test_double_top_cost_correction() {
        let panels = vec![
            panel(CostTier::Four, 20.5, 21.0),
            panel(CostTier::Four, 20.5, 21.0),
            panel(CostTier::Three, 10.5, 21.0),
            panel(CostTier::Three, 10.5, 21.0),
            panel(CostTier::One, 10.5, 21.0),
        ];
        let score = compute_quality(&panels);
        assert_eq!(score.raw, 250.0);
        assert_eq!(score.adjusted, 206.0);
        assert_eq!(score.tier, QualityTier::High);
    }

    #[test]
    fn test_no_correction_with_single_top_cost() {
        let panels = vec![
            panel(CostTier::Four, 20.5, 21.0),
            panel(CostTier::Three, 20.5, 21.0),
            panel(CostTier::Three, 10.5, 21.0),
            panel(CostTier::One, 10.5, 21.0),
            panel(CostTier::One, 10.5, 21.0),
        ];
        let score = compute_quality(&panels);
        assert_eq!(score.adjusted, 250.0);
        assert_eq!(score.tier, QualityTier::Goat);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(QualityTier::classify(232.0), QualityTier::Goat);
        assert_eq!(QualityTier::classify(219.9), QualityTier::High);
        assert_eq!(QualityTier::classify(195.0), QualityTier::Good);
        assert_eq!(QualityTier::classify(175.0), QualityTier::Decent);
        assert_eq!(QualityTier::classify(174.9), QualityTier::Low);
    }
}
