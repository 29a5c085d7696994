//! ReconciliationSequencer
//!
//! 一批已分类的识别结果按固定顺序落到会话状态:
//! 1. 角色结果按到达顺序逐个应用（可能解锁并取出待处理队列）
//! 2. 记录角色应用后的武器类型，作为武器校验的依据
//! 3. 仍处于锁定时，非角色结果进入队列
//! 4. 否则先按到达顺序应用非武器结果，最后逐个应用武器结果

use std::sync::Arc;

use crate::application::ports::{BuildSession, CatalogPort};
use crate::domain::build::{
    EchoPanel, ForteState, ForteTree, PanelStat, StatName, WeaponConfig, WeaponType,
    SUBSTAT_SLOTS,
};
use crate::domain::catalog::CharacterRecord;
use crate::domain::recognition::{
    AnalysisKind, AnalysisVariant, ForteBranch, RawStat, RecognitionOutcome, RecognitionResult,
};

pub const SELECT_CHARACTER_FIRST: &str = "Select character first";
pub const CHARACTER_NOT_FOUND: &str = "Character not found";
pub const WEAPON_NOT_FOUND: &str = "Weapon not found";
pub const ECHO_NOT_FOUND: &str = "Echo not found";
pub const NO_FREE_ECHO_PANEL: &str = "No empty echo slot available";

pub struct Reconciler {
    catalog: Arc<dyn CatalogPort>,
}

impl Reconciler {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    /// 处理一批识别结果
    pub fn reconcile(&self, session: &mut BuildSession, results: Vec<RecognitionResult>) {
        let mut characters = Vec::new();
        let mut others = Vec::new();

        for result in results {
            // 识别期间截图已被删除
            if session.image_mut(&result.image_id).is_none() {
                tracing::debug!(
                    session_id = %session.id,
                    image_id = %result.image_id,
                    "Dropping result for removed image"
                );
                continue;
            }
            if let RecognitionOutcome::Failed(error) = &result.outcome {
                tracing::warn!(
                    session_id = %session.id,
                    image_id = %result.image_id,
                    error = %error,
                    "Recognition failed"
                );
                let error = error.clone();
                if let Some(task) = session.image_mut(&result.image_id) {
                    task.mark_error(error);
                }
                continue;
            }
            if result.kind() == Some(AnalysisKind::Character) {
                characters.push(result);
            } else {
                others.push(result);
            }
        }

        if characters.len() > 1 {
            tracing::warn!(
                session_id = %session.id,
                count = characters.len(),
                "Multiple character results in one batch, last one wins"
            );
        }

        let mut drained = Vec::new();
        for result in &characters {
            drained.extend(self.apply_character(session, result));
        }
        drained.extend(others);
        let others = drained;

        // 角色已应用，后续武器校验以此为准
        let expected_weapon = session.build.character().map(|c| c.weapon_type);

        if session.gate.is_locked() {
            self.defer(session, others);
            return;
        }

        self.apply_unlocked(session, others, expected_weapon);
    }

    /// 手动选择角色: 重置配装、解锁并回放队列
    pub fn select_character(&self, session: &mut BuildSession, character: CharacterRecord) {
        let name = character.name.clone();
        let changed = session.build.select_character(character);
        let drained = self.unlock(session);
        tracing::info!(
            session_id = %session.id,
            character = %name,
            changed = changed,
            replayed = drained.len(),
            "Character selected"
        );
        let expected_weapon = session.build.character().map(|c| c.weapon_type);
        self.apply_unlocked(session, drained, expected_weapon);
    }

    /// 取消选择角色: 清空配装并重新上锁
    pub fn deselect_character(&self, session: &mut BuildSession) {
        session.build.clear_character();
        session.gate.lock();
        tracing::info!(session_id = %session.id, "Character deselected");
    }

    fn unlock(&self, session: &mut BuildSession) -> Vec<RecognitionResult> {
        let drained = session.gate.unlock();
        session.remove_message(SELECT_CHARACTER_FIRST);
        if !drained.is_empty() {
            tracing::info!(
                session_id = %session.id,
                count = drained.len(),
                "Pending queue drained"
            );
        }
        drained
    }

    /// 应用角色结果，返回解锁时取出的待处理结果
    fn apply_character(
        &self,
        session: &mut BuildSession,
        result: &RecognitionResult,
    ) -> Vec<RecognitionResult> {
        let Some(variant) = result.variant() else {
            return Vec::new();
        };
        let AnalysisVariant::Character {
            name,
            level,
            element,
        } = variant
        else {
            return Vec::new();
        };

        let Some(record) = self.catalog.character(name) else {
            tracing::warn!(session_id = %session.id, name = %name, "Character not found");
            session.push_message(CHARACTER_NOT_FOUND);
            if let Some(task) = session.image_mut(&result.image_id) {
                task.mark_error(CHARACTER_NOT_FOUND);
            }
            return Vec::new();
        };

        let is_rover = record.is_rover();
        session.build.select_character(record);
        if let Err(e) = session.build.set_level(*level) {
            tracing::warn!(session_id = %session.id, error = %e, "Ignoring character level");
        }
        if is_rover {
            if let Some(element) = element {
                if session.build.active_element() != Some(*element) {
                    if let Err(e) = session.build.toggle_element() {
                        tracing::warn!(
                            session_id = %session.id,
                            error = %e,
                            "Ignoring scanned element"
                        );
                    }
                }
            }
        }
        if let Some(task) = session.image_mut(&result.image_id) {
            task.mark_complete(AnalysisKind::Character, variant.details());
        }
        tracing::info!(
            session_id = %session.id,
            character = %name,
            level = level,
            "Character applied"
        );

        self.unlock(session)
    }

    /// 锁定期间把非角色结果放入队列
    fn defer(&self, session: &mut BuildSession, results: Vec<RecognitionResult>) {
        let mut queued = 0usize;
        for result in results {
            let Some(kind) = result.kind() else { continue };
            if kind == AnalysisKind::Unknown {
                self.complete_unknown(session, &result);
                continue;
            }
            let image_id = result.image_id.clone();
            if session.gate.enqueue(result).is_ok() {
                queued += 1;
                if let Some(task) = session.image_mut(&image_id) {
                    task.mark_queued(kind);
                }
            }
        }
        if queued > 0 {
            session.push_message_once(SELECT_CHARACTER_FIRST);
            tracing::info!(
                session_id = %session.id,
                queued = queued,
                pending = session.gate.pending_len(),
                "Results queued until a character is selected"
            );
        }
    }

    fn apply_unlocked(
        &self,
        session: &mut BuildSession,
        results: Vec<RecognitionResult>,
        expected_weapon: Option<WeaponType>,
    ) {
        let (weapons, rest): (Vec<_>, Vec<_>) = results
            .into_iter()
            .partition(|r| r.kind() == Some(AnalysisKind::Weapon));

        for result in &rest {
            self.apply_other(session, result);
        }
        for result in &weapons {
            self.apply_weapon(session, result, expected_weapon);
        }
    }

    fn apply_other(&self, session: &mut BuildSession, result: &RecognitionResult) {
        let Some(variant) = result.variant() else { return };
        let applied = match variant {
            AnalysisVariant::Sequence { slots } => session
                .build
                .set_sequence(AnalysisVariant::sequence_count(slots))
                .map_err(|e| e.to_string()),
            AnalysisVariant::Forte { branches } => session
                .build
                .set_forte(forte_state(branches))
                .map_err(|e| e.to_string()),
            AnalysisVariant::Echo { .. } => self.apply_echo(session, &result.image_id, variant),
            AnalysisVariant::Unknown => {
                self.complete_unknown(session, result);
                return;
            }
            // 角色与武器结果各有专门路径
            AnalysisVariant::Character { .. } | AnalysisVariant::Weapon { .. } => return,
        };

        if let Some(task) = session.image_mut(&result.image_id) {
            match applied {
                Ok(()) => task.mark_complete(variant.kind(), variant.details()),
                Err(error) => task.mark_error(error),
            }
        }
    }

    fn apply_echo(
        &self,
        session: &mut BuildSession,
        image_id: &str,
        variant: &AnalysisVariant,
    ) -> Result<(), String> {
        let AnalysisVariant::Echo {
            name,
            level,
            element,
            main_stat,
            sub_stats,
        } = variant
        else {
            return Ok(());
        };

        let Some(echo) = self.catalog.echo(name) else {
            tracing::warn!(session_id = %session.id, name = %name, "Echo not found");
            session.push_message(format!("{}: {}", ECHO_NOT_FOUND, name));
            return Err(ECHO_NOT_FOUND.to_string());
        };

        let tier = self.catalog.main_stats().tier(echo.cost);
        let main = StatName::parse(&main_stat.name)
            .map(|stat| stat.percent_variant())
            .filter(|stat| tier.is_some_and(|t| t.allows(*stat)));
        if main.is_none() {
            tracing::warn!(
                session_id = %session.id,
                echo = %echo.name,
                main_stat = %main_stat.name,
                "Main stat not legal for echo cost"
            );
        }

        let mut panel = EchoPanel {
            level: *level,
            selected_element: element.filter(|e| echo.is_multi_element() && echo.elements.contains(e)),
            main_stat: main.and_then(|stat| {
                let value = tier.and_then(|t| t.value_at(stat, *level))?;
                Some(PanelStat::new(stat, value))
            }),
            secondary: tier.map(|t| PanelStat::new(t.secondary.stat, t.secondary.value)),
            ..Default::default()
        };
        let mut slot = 0;
        for raw in sub_stats {
            if slot == SUBSTAT_SLOTS {
                break;
            }
            let Some(sub) = self.match_substat(raw) else {
                tracing::debug!(name = %raw.name, "Skipping unmatched substat");
                continue;
            };
            if panel.sub_stats.iter().flatten().any(|s| s.stat == sub.stat) {
                continue;
            }
            panel.sub_stats[slot] = Some(sub);
            slot += 1;
        }
        panel.echo = Some(echo);

        match session.build.place_scanned_echo(image_id, panel) {
            Ok(Some(index)) => {
                tracing::debug!(session_id = %session.id, panel = index, "Echo placed");
                Ok(())
            }
            Ok(None) => {
                session.push_message(NO_FREE_ECHO_PANEL);
                Err(NO_FREE_ECHO_PANEL.to_string())
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// 副词条: 名称归一化后取最接近的合法档位
    fn match_substat(&self, raw: &RawStat) -> Option<PanelStat> {
        let stat = StatName::parse(&raw.name)?;
        let stat = if raw.reading.percent {
            stat.percent_variant()
        } else {
            stat
        };
        let value = self.catalog.substats().closest_roll(stat, raw.reading.value)?;
        Some(PanelStat::new(stat, value))
    }

    fn apply_weapon(
        &self,
        session: &mut BuildSession,
        result: &RecognitionResult,
        expected: Option<WeaponType>,
    ) {
        let Some(variant) = result.variant() else {
            return;
        };
        let AnalysisVariant::Weapon {
            name,
            weapon_type,
            level,
            rank,
        } = variant
        else {
            return;
        };

        let Some(record) = self.catalog.weapon(*weapon_type, name) else {
            tracing::warn!(session_id = %session.id, name = %name, "Weapon not found");
            session.push_message(WEAPON_NOT_FOUND);
            if let Some(task) = session.image_mut(&result.image_id) {
                task.mark_error(WEAPON_NOT_FOUND);
            }
            return;
        };

        if let Some(expected) = expected.filter(|e| e != weapon_type) {
            tracing::warn!(
                session_id = %session.id,
                expected = %expected,
                scanned = %weapon_type,
                "Weapon mismatch"
            );
            session.push_message(format!(
                "Weapon mismatch:\nExpected: {}\nScanned: {}",
                expected, weapon_type
            ));
        }

        let config = WeaponConfig {
            level: *level,
            rank: *rank,
        };
        let applied = session.build.equip_weapon(record, config);
        if let Some(task) = session.image_mut(&result.image_id) {
            match applied {
                Ok(()) => task.mark_complete(AnalysisKind::Weapon, variant.details()),
                Err(e) => task.mark_error(e.to_string()),
            }
        }
    }

    fn complete_unknown(&self, session: &mut BuildSession, result: &RecognitionResult) {
        if let Some(task) = session.image_mut(&result.image_id) {
            task.mark_complete(AnalysisKind::Unknown, AnalysisVariant::Unknown.details());
        }
    }
}

fn forte_state(branches: &[ForteBranch; 5]) -> ForteState {
    let mut forte = ForteState::default();
    for (tree, branch) in ForteTree::ALL.into_iter().zip(branches) {
        forte.node_states.insert(tree, branch.nodes);
        forte.levels.insert(branch.skill, branch.level);
    }
    forte
}
