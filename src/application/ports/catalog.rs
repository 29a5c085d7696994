//! Catalog Port - 只读目录查询
//!
//! 名称匹配均不区分大小写

use thiserror::Error;

use crate::domain::build::WeaponType;
use crate::domain::catalog::{
    CharacterRecord, EchoRecord, LevelCurves, MainStatTable, SubstatTable, WeaponRecord,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Catalog entry not found: {0}")]
    NotFound(String),
}

/// Catalog Port
pub trait CatalogPort: Send + Sync {
    fn character(&self, name: &str) -> Option<CharacterRecord>;

    /// 在指定类型的武器列表中查找
    fn weapon(&self, weapon_type: WeaponType, name: &str) -> Option<WeaponRecord>;

    /// 在所有武器类型中查找
    fn find_weapon(&self, name: &str) -> Option<WeaponRecord> {
        WeaponType::ALL
            .into_iter()
            .find_map(|weapon_type| self.weapon(weapon_type, name))
    }

    fn echo(&self, name: &str) -> Option<EchoRecord>;

    fn level_curves(&self) -> &LevelCurves;

    fn main_stats(&self) -> &MainStatTable;

    fn substats(&self) -> &SubstatTable;
}
