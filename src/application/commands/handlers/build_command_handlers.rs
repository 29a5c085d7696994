//! Build Command Handlers - 手动编辑配装
//!
//! 所有修改都在会话条目锁内通过 BuildState 方法完成，校验失败时会话保持不变。

use std::sync::Arc;

use crate::application::commands::build_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ingestion::Reconciler;
use crate::application::ports::{modify_session, BuildSession, CatalogPort, SessionManagerPort};
use crate::domain::build::{BuildError, EchoPanel, PanelStat, WeaponConfig, SUBSTAT_SLOTS};
use crate::domain::catalog::MAX_ECHO_LEVEL;

/// 在会话锁内执行一次配装修改
fn edit_build<T>(
    sessions: &dyn SessionManagerPort,
    session_id: &str,
    f: impl FnOnce(&mut BuildSession) -> Result<T, BuildError>,
) -> Result<T, ApplicationError> {
    modify_session(sessions, session_id, f)?.map_err(ApplicationError::from)
}

/// SelectCharacter Handler
///
/// 选择角色会解锁并回放待处理队列；`name` 为空时取消选择并重新上锁。
pub struct SelectCharacterHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    catalog: Arc<dyn CatalogPort>,
    reconciler: Reconciler,
}

impl SelectCharacterHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            session_manager,
            reconciler: Reconciler::new(catalog.clone()),
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: SelectCharacterCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        match cmd.name {
            Some(name) => {
                let record = self
                    .catalog
                    .character(&name)
                    .ok_or_else(|| ApplicationError::not_found("Character", name))?;
                modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
                    self.reconciler.select_character(session, record)
                })?;
            }
            None => {
                modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
                    self.reconciler.deselect_character(session)
                })?;
            }
        }

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }
}

/// SetCharacterLevel Handler
pub struct SetCharacterLevelHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl SetCharacterLevelHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: SetCharacterLevelCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.set_level(cmd.level)
        })?;

        tracing::debug!(session_id = %cmd.session_id, level = cmd.level, "Character level set");

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }
}

/// SetSequence Handler - 点击当前最高节点时降一级
pub struct SetSequenceHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl SetSequenceHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: SetSequenceCommand,
    ) -> Result<SetSequenceResponse, ApplicationError> {
        let sequence = edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.toggle_sequence(cmd.node)
        })?;

        Ok(SetSequenceResponse { sequence })
    }
}

/// ToggleElement Handler - 漂泊者属性切换
pub struct ToggleElementHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl ToggleElementHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: ToggleElementCommand,
    ) -> Result<ToggleElementResponse, ApplicationError> {
        let (element, display_name) =
            edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
                let element = session.build.toggle_element()?;
                Ok((element, session.build.display_name()))
            })?;

        tracing::info!(session_id = %cmd.session_id, element = %element, "Element toggled");

        Ok(ToggleElementResponse {
            element,
            display_name,
        })
    }
}

/// SelectWeapon Handler - 武器类型必须与角色一致
pub struct SelectWeaponHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    catalog: Arc<dyn CatalogPort>,
}

impl SelectWeaponHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            session_manager,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: SelectWeaponCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        let weapon = self
            .catalog
            .find_weapon(&cmd.name)
            .ok_or_else(|| ApplicationError::not_found("Weapon", cmd.name.clone()))?;

        edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.select_weapon(weapon)
        })?;

        tracing::info!(session_id = %cmd.session_id, weapon = %cmd.name, "Weapon selected");

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }
}

/// SetWeaponConfig Handler
pub struct SetWeaponConfigHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl SetWeaponConfigHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: SetWeaponConfigCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        let config = WeaponConfig {
            level: cmd.level,
            rank: cmd.rank,
        };
        edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.set_weapon_config(config)
        })?;

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }
}

/// SetForte Handler
pub struct SetForteHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl SetForteHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: SetForteCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.set_forte(cmd.forte)
        })?;

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }
}

/// ToggleForteNode Handler
pub struct ToggleForteNodeHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl ToggleForteNodeHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: ToggleForteNodeCommand,
    ) -> Result<ToggleForteNodeResponse, ApplicationError> {
        let node = modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.toggle_forte_node(cmd.tree, cmd.position)
        })?;

        Ok(ToggleForteNodeResponse { node })
    }
}

/// SetForteLevel Handler
pub struct SetForteLevelHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl SetForteLevelHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: SetForteLevelCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.set_forte_level(cmd.skill, cmd.level)
        })?;

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }
}

/// CycleForteMax Handler
pub struct CycleForteMaxHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl CycleForteMaxHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub async fn handle(
        &self,
        cmd: CycleForteMaxCommand,
    ) -> Result<CycleForteMaxResponse, ApplicationError> {
        let state = modify_session(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.cycle_forte_max()
        })?;

        Ok(CycleForteMaxResponse { state })
    }
}

/// SetEchoPanel Handler
///
/// 主词条必须属于该 Cost 档位，副词条必须是合法档位值且类型不重复。
/// 主副词条的固定数值由目录表按声骸等级给出。
pub struct SetEchoPanelHandler {
    session_manager: Arc<dyn SessionManagerPort>,
    catalog: Arc<dyn CatalogPort>,
}

impl SetEchoPanelHandler {
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        Self {
            session_manager,
            catalog,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetEchoPanelCommand,
    ) -> Result<BuildEditResponse, ApplicationError> {
        let panel = self.build_panel(cmd.panel)?;

        edit_build(self.session_manager.as_ref(), &cmd.session_id, |session| {
            session.build.set_echo_panel(cmd.index, panel)
        })?;

        tracing::debug!(session_id = %cmd.session_id, index = cmd.index, "Echo panel set");

        Ok(BuildEditResponse {
            session_id: cmd.session_id,
        })
    }

    fn build_panel(&self, input: EchoPanelInput) -> Result<EchoPanel, ApplicationError> {
        // 未选声骸即清空栏位
        let Some(name) = input.echo else {
            return Ok(EchoPanel::default());
        };

        let echo = self
            .catalog
            .echo(&name)
            .ok_or_else(|| ApplicationError::not_found("Echo", name))?;

        if input.level > MAX_ECHO_LEVEL {
            return Err(BuildError::InvalidEchoLevel(input.level).into());
        }
        if input.sub_stats.len() > SUBSTAT_SLOTS {
            return Err(ApplicationError::validation(format!(
                "At most {} sub stats per echo",
                SUBSTAT_SLOTS
            )));
        }

        let tier = self.catalog.main_stats().tier(echo.cost).ok_or_else(|| {
            ApplicationError::internal(format!("No main stat table for {}", echo.cost.table_key()))
        })?;

        let main_stat = match input.main_stat {
            Some(stat) => {
                let value = tier
                    .value_at(stat, input.level)
                    .ok_or(BuildError::IllegalMainStat(stat))?;
                Some(PanelStat::new(stat, value))
            }
            None => None,
        };

        let substats = self.catalog.substats();
        let mut sub_stats: [Option<PanelStat>; SUBSTAT_SLOTS] = Default::default();
        for (slot, sub) in sub_stats.iter_mut().zip(input.sub_stats) {
            if let Some(sub) = sub {
                if !substats.is_legal(sub.stat, sub.value) {
                    return Err(BuildError::IllegalRoll {
                        stat: sub.stat,
                        value: sub.value,
                    }
                    .into());
                }
            }
            *slot = sub;
        }

        let selected_element = input
            .selected_element
            .filter(|e| echo.is_multi_element() && echo.elements.contains(e));

        Ok(EchoPanel {
            level: input.level,
            selected_element,
            main_stat,
            secondary: Some(PanelStat::new(tier.secondary.stat, tier.secondary.value)),
            sub_stats,
            echo: Some(echo),
            source_image: None,
        })
    }
}
