//! 套装统计

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::build::{EchoPanel, Element};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBonus {
    pub element: Element,
    pub count: u8,
}

/// 按属性统计已装备的声骸（同名只计一次），保留两件及以上
///
/// 排序: 五件套在前，其余按数量降序，数量相同时按属性顺序。
pub fn compute_sets(panels: &[EchoPanel]) -> Vec<SetBonus> {
    let mut counts: BTreeMap<Element, u8> = BTreeMap::new();
    let mut used = HashSet::new();

    for panel in panels {
        let Some(echo) = panel.echo.as_ref() else { continue };
        if used.contains(echo.name.as_str()) {
            continue;
        }
        if let Some(element) = panel.set_element() {
            *counts.entry(element).or_default() += 1;
            used.insert(echo.name.as_str());
        }
    }

    let mut sets: Vec<SetBonus> = counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(element, count)| SetBonus { element, count })
        .collect();
    sets.sort_by(|a, b| {
        (b.count >= 5)
            .cmp(&(a.count >= 5))
            .then(b.count.cmp(&a.count))
    });
    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::CostTier;
    use crate::domain::catalog::EchoRecord;

    fn panel(name: &str, elements: &[Element], selected: Option<Element>) -> EchoPanel {
        EchoPanel {
            echo: Some(EchoRecord {
                name: name.to_string(),
                cost: CostTier::One,
                elements: elements.to_vec(),
            }),
            selected_element: selected,
            ..Default::default()
        }
    }

    #[test]
    fn test_five_piece_before_two_piece() {
        let mut panels: Vec<EchoPanel> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|n| panel(n, &[Element::Spectro], None))
            .collect();
        panels.push(panel("F", &[Element::Havoc], None));
        panels.push(panel("G", &[Element::Havoc], None));

        let sets = compute_sets(&panels);
        assert_eq!(
            sets,
            vec![
                SetBonus {
                    element: Element::Spectro,
                    count: 5
                },
                SetBonus {
                    element: Element::Havoc,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_names_counted_once() {
        let panels = vec![
            panel("Hoochief", &[Element::Aero], None),
            panel("Hoochief", &[Element::Aero], None),
            panel("Cruisewing", &[Element::Spectro], None),
        ];
        assert!(compute_sets(&panels).is_empty());
    }

    #[test]
    fn test_multi_element_uses_selection() {
        let both = [Element::Havoc, Element::Spectro];
        let panels = vec![
            panel("X", &both, Some(Element::Havoc)),
            panel("Y", &[Element::Havoc], None),
            panel("Z", &both, None),
            EchoPanel::default(),
        ];
        assert_eq!(
            compute_sets(&panels),
            vec![SetBonus {
                element: Element::Havoc,
                count: 2
            }]
        );
    }
}
