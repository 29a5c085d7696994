//! Build Context - Aggregate Root

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{BuildError, Element, ForteTree, NodePosition, SkillKey, StatName};
use crate::domain::catalog::{CharacterRecord, EchoRecord, WeaponRecord, MAX_ECHO_LEVEL};

pub const MAX_LEVEL: u8 = 90;
pub const MAX_SEQUENCE: u8 = 6;
pub const MAX_RANK: u8 = 5;
pub const MAX_FORTE_LEVEL: u8 = 10;
pub const ECHO_PANEL_COUNT: usize = 5;
pub const SUBSTAT_SLOTS: usize = 5;

/// 武器等级与精炼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub level: u8,
    pub rank: u8,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self { level: 1, rank: 1 }
    }
}

impl WeaponConfig {
    pub fn validate(&self) -> Result<(), BuildError> {
        if !(1..=MAX_LEVEL).contains(&self.level) {
            return Err(BuildError::InvalidLevel(self.level));
        }
        if !(1..=MAX_RANK).contains(&self.rank) {
            return Err(BuildError::InvalidRank(self.rank));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponState {
    pub selected: Option<WeaponRecord>,
    pub config: WeaponConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    pub top: bool,
    pub middle: bool,
}

impl NodeState {
    pub fn get(&self, position: NodePosition) -> bool {
        match position {
            NodePosition::Top => self.top,
            NodePosition::Middle => self.middle,
        }
    }

    fn toggle(&mut self, position: NodePosition) {
        match position {
            NodePosition::Top => self.top = !self.top,
            NodePosition::Middle => self.middle = !self.middle,
        }
    }
}

/// 共鸣链状态：五个分支的节点与五个技能等级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForteState {
    pub node_states: BTreeMap<ForteTree, NodeState>,
    pub levels: BTreeMap<SkillKey, u8>,
}

impl Default for ForteState {
    fn default() -> Self {
        Self::uniform(1, false)
    }
}

impl ForteState {
    /// 所有技能同一等级、所有节点同一状态
    pub fn uniform(level: u8, active: bool) -> Self {
        Self {
            node_states: ForteTree::ALL
                .into_iter()
                .map(|tree| {
                    (
                        tree,
                        NodeState {
                            top: active,
                            middle: active,
                        },
                    )
                })
                .collect(),
            levels: SkillKey::ALL.into_iter().map(|k| (k, level)).collect(),
        }
    }

    pub fn node(&self, tree: ForteTree) -> NodeState {
        self.node_states.get(&tree).copied().unwrap_or_default()
    }

    pub fn level(&self, skill: SkillKey) -> u8 {
        self.levels.get(&skill).copied().unwrap_or(1)
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        match self.levels.values().find(|l| **l > MAX_FORTE_LEVEL) {
            Some(level) => Err(BuildError::InvalidForteLevel(*level)),
            None => Ok(()),
        }
    }
}

/// 声骸栏位上的一条属性
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelStat {
    pub stat: StatName,
    pub value: f64,
}

impl PanelStat {
    pub fn new(stat: StatName, value: f64) -> Self {
        Self { stat, value }
    }
}

/// 声骸栏位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EchoPanel {
    pub echo: Option<EchoRecord>,
    pub level: u8,
    /// 多属性声骸的套装选择
    pub selected_element: Option<Element>,
    pub main_stat: Option<PanelStat>,
    /// 由 Cost 决定的固定副属性
    pub secondary: Option<PanelStat>,
    pub sub_stats: [Option<PanelStat>; SUBSTAT_SLOTS],
    /// 填充该栏位的截图 id，同一截图重复处理时覆盖而非追加
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
}

impl EchoPanel {
    pub fn is_empty(&self) -> bool {
        self.echo.is_none()
    }

    /// 套装计算使用的属性
    pub fn set_element(&self) -> Option<Element> {
        let echo = self.echo.as_ref()?;
        match echo.elements.as_slice() {
            [single] => Some(*single),
            _ => self.selected_element,
        }
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if self.level > MAX_ECHO_LEVEL {
            return Err(BuildError::InvalidEchoLevel(self.level));
        }
        let mut seen = HashSet::new();
        for sub in self.sub_stats.iter().flatten() {
            if !seen.insert(sub.stat) {
                return Err(BuildError::DuplicateSubstat(sub.stat));
            }
        }
        Ok(())
    }
}

/// Build 聚合根
///
/// 不变量:
/// - 角色变更时清空所有依赖状态（等级、共鸣链、武器、声骸）
/// - 固定五个声骸栏位，顺序有意义
/// - 栏位内副词条类型唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildState {
    character: Option<CharacterRecord>,
    level: u8,
    sequence: u8,
    /// 漂泊者当前属性
    element: Option<Element>,
    weapon: WeaponState,
    forte: ForteState,
    forte_max_clicks: u8,
    echo_panels: [EchoPanel; ECHO_PANEL_COUNT],
}

impl Default for BuildState {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildState {
    pub fn new() -> Self {
        Self {
            character: None,
            level: 1,
            sequence: 0,
            element: None,
            weapon: WeaponState::default(),
            forte: ForteState::default(),
            forte_max_clicks: 0,
            echo_panels: Default::default(),
        }
    }

    /// 选择角色
    ///
    /// 重新选择同一角色时保留现有状态，返回 false。
    pub fn select_character(&mut self, character: CharacterRecord) -> bool {
        if self
            .character
            .as_ref()
            .is_some_and(|current| current.name.eq_ignore_ascii_case(&character.name))
        {
            return false;
        }
        *self = Self::new();
        self.element = Some(character.element);
        self.character = Some(character);
        true
    }

    /// 取消选择角色，清空全部状态
    pub fn clear_character(&mut self) {
        *self = Self::new();
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), BuildError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(BuildError::InvalidLevel(level));
        }
        self.require_character()?;
        self.level = level;
        Ok(())
    }

    pub fn set_sequence(&mut self, sequence: u8) -> Result<(), BuildError> {
        if sequence > MAX_SEQUENCE {
            return Err(BuildError::InvalidSequence(sequence));
        }
        self.require_character()?;
        self.sequence = sequence;
        Ok(())
    }

    /// 点击第 n 个共鸣链节点：点击当前最高节点时降一级
    pub fn toggle_sequence(&mut self, node: u8) -> Result<u8, BuildError> {
        if !(1..=MAX_SEQUENCE).contains(&node) {
            return Err(BuildError::InvalidSequence(node));
        }
        let next = if self.sequence == node { node - 1 } else { node };
        self.set_sequence(next)?;
        Ok(next)
    }

    /// 漂泊者切换 衍射 / 湮灭
    pub fn toggle_element(&mut self) -> Result<Element, BuildError> {
        let character = self.require_character()?;
        if !character.is_rover() {
            return Err(BuildError::NotDualElement);
        }
        let next = match self.active_element() {
            Some(Element::Spectro) => Element::Havoc,
            _ => Element::Spectro,
        };
        self.element = Some(next);
        Ok(next)
    }

    /// 选择武器，类型必须与角色一致
    pub fn select_weapon(&mut self, weapon: WeaponRecord) -> Result<(), BuildError> {
        let character = self.require_character()?;
        if let Some(actual) = weapon.weapon_type {
            if actual != character.weapon_type {
                return Err(BuildError::WeaponTypeMismatch {
                    expected: character.weapon_type,
                    actual,
                });
            }
        }
        self.weapon.selected = Some(weapon);
        Ok(())
    }

    /// 装备武器，不做类型校验（识别结果路径，类型不符只记录提示）
    pub fn equip_weapon(&mut self, weapon: WeaponRecord, config: WeaponConfig) -> Result<(), BuildError> {
        config.validate()?;
        self.weapon.selected = Some(weapon);
        self.weapon.config = config;
        Ok(())
    }

    pub fn set_weapon_config(&mut self, config: WeaponConfig) -> Result<(), BuildError> {
        config.validate()?;
        self.weapon.config = config;
        Ok(())
    }

    pub fn set_forte(&mut self, forte: ForteState) -> Result<(), BuildError> {
        forte.validate()?;
        self.forte = forte;
        Ok(())
    }

    pub fn toggle_forte_node(&mut self, tree: ForteTree, position: NodePosition) -> NodeState {
        let node = self.forte.node_states.entry(tree).or_default();
        node.toggle(position);
        *node
    }

    pub fn set_forte_level(&mut self, skill: SkillKey, level: u8) -> Result<(), BuildError> {
        if level > MAX_FORTE_LEVEL {
            return Err(BuildError::InvalidForteLevel(level));
        }
        self.forte.levels.insert(skill, level);
        Ok(())
    }

    /// "全满" 按钮三态循环: 1 技能满级, 2 技能满级且节点全亮, 0 重置
    pub fn cycle_forte_max(&mut self) -> u8 {
        self.forte_max_clicks = (self.forte_max_clicks + 1) % 3;
        self.forte = match self.forte_max_clicks {
            1 => ForteState::uniform(MAX_FORTE_LEVEL, false),
            2 => ForteState::uniform(MAX_FORTE_LEVEL, true),
            _ => ForteState::uniform(1, false),
        };
        self.forte_max_clicks
    }

    pub fn set_echo_panel(&mut self, index: usize, panel: EchoPanel) -> Result<(), BuildError> {
        panel.validate()?;
        let slot = self
            .echo_panels
            .get_mut(index)
            .ok_or(BuildError::PanelOutOfRange(index))?;
        *slot = panel;
        Ok(())
    }

    /// 放置识别得到的声骸
    ///
    /// 同一截图之前填过的栏位优先覆盖，否则填第一个空栏位；没有可用栏位返回 None。
    pub fn place_scanned_echo(&mut self, image_id: &str, mut panel: EchoPanel) -> Result<Option<usize>, BuildError> {
        panel.source_image = Some(image_id.to_string());
        panel.validate()?;
        let index = self
            .echo_panels
            .iter()
            .position(|p| p.source_image.as_deref() == Some(image_id))
            .or_else(|| self.echo_panels.iter().position(EchoPanel::is_empty));
        if let Some(i) = index {
            self.echo_panels[i] = panel;
        }
        Ok(index)
    }

    fn require_character(&self) -> Result<&CharacterRecord, BuildError> {
        self.character.as_ref().ok_or(BuildError::NoCharacter)
    }

    /// 当前生效属性（漂泊者取切换后的属性）
    pub fn active_element(&self) -> Option<Element> {
        self.element
            .or_else(|| self.character.as_ref().map(|c| c.element))
    }

    /// 展示名，漂泊者带上属性后缀
    pub fn display_name(&self) -> Option<String> {
        let character = self.character.as_ref()?;
        if character.is_rover() {
            let element = self.active_element().unwrap_or(character.element);
            Some(format!("Rover{}", element))
        } else {
            Some(character.name.clone())
        }
    }

    // Getters
    pub fn character(&self) -> Option<&CharacterRecord> {
        self.character.as_ref()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    pub fn weapon(&self) -> &WeaponState {
        &self.weapon
    }

    pub fn forte(&self) -> &ForteState {
        &self.forte
    }

    pub fn echo_panels(&self) -> &[EchoPanel; ECHO_PANEL_COUNT] {
        &self.echo_panels
    }
}
