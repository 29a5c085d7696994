//! JSON Catalog - 从数据目录加载的只读目录
//!
//! 目录结构:
//! - `Characters.json`
//! - `Broadblades.json` / `Swords.json` / `Pistols.json` / `Gauntlets.json` / `Rectifiers.json`
//! - `Echoes.json`
//! - `LevelCurve.json`
//! - `MainStats.json`
//! - `Substats.json`

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

use crate::application::ports::{CatalogError, CatalogPort};
use crate::domain::build::WeaponType;
use crate::domain::catalog::{
    CharacterRecord, EchoRecord, LevelCurves, MainStatTable, SubstatTable, WeaponRecord,
};

/// 只读目录
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    characters: Vec<CharacterRecord>,
    weapons: HashMap<WeaponType, Vec<WeaponRecord>>,
    echoes: Vec<EchoRecord>,
    curves: LevelCurves,
    main_stats: MainStatTable,
    substats: SubstatTable,
}

impl JsonCatalog {
    /// 从数据目录加载
    ///
    /// 缺少某个武器类型的文件时该类型为空列表，其余文件必须存在。
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = data_dir.as_ref();

        let characters: Vec<CharacterRecord> = read_json(dir, "Characters.json")?;
        let echoes: Vec<EchoRecord> = read_json(dir, "Echoes.json")?;
        let curves: LevelCurves = read_json(dir, "LevelCurve.json")?;
        let main_stats: MainStatTable = read_json(dir, "MainStats.json")?;
        let substats: SubstatTable = read_json(dir, "Substats.json")?;

        let mut catalog = Self::empty()
            .with_curves(curves)
            .with_main_stats(main_stats)
            .with_substats(substats);
        catalog.characters = characters;
        catalog.echoes = echoes;

        for weapon_type in WeaponType::ALL {
            let file = weapon_type.catalog_file();
            if !dir.join(&file).exists() {
                tracing::warn!(file = %file, "Weapon catalog file missing, skipping");
                continue;
            }
            let weapons: Vec<WeaponRecord> = read_json(dir, &file)?;
            for weapon in weapons {
                catalog = catalog.with_weapon(weapon_type, weapon);
            }
        }

        tracing::info!(
            data_dir = %dir.display(),
            characters = catalog.characters.len(),
            weapons = catalog.weapons.values().map(Vec::len).sum::<usize>(),
            echoes = catalog.echoes.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, character: CharacterRecord) -> Self {
        self.characters.push(character);
        self
    }

    /// 武器类型以所在列表为准
    pub fn with_weapon(mut self, weapon_type: WeaponType, mut weapon: WeaponRecord) -> Self {
        weapon.weapon_type = Some(weapon_type);
        self.weapons.entry(weapon_type).or_default().push(weapon);
        self
    }

    pub fn with_echo(mut self, echo: EchoRecord) -> Self {
        self.echoes.push(echo);
        self
    }

    pub fn with_curves(mut self, curves: LevelCurves) -> Self {
        self.curves = curves;
        self
    }

    pub fn with_main_stats(mut self, main_stats: MainStatTable) -> Self {
        self.main_stats = main_stats;
        self
    }

    pub fn with_substats(mut self, substats: SubstatTable) -> Self {
        self.substats = substats;
        self
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(dir.join(file))?;
    serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
        file: file.to_string(),
        message: e.to_string(),
    })
}

impl CatalogPort for JsonCatalog {
    fn character(&self, name: &str) -> Option<CharacterRecord> {
        let name = name.trim();
        self.characters
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn weapon(&self, weapon_type: WeaponType, name: &str) -> Option<WeaponRecord> {
        let name = name.trim();
        self.weapons
            .get(&weapon_type)?
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn echo(&self, name: &str) -> Option<EchoRecord> {
        let name = name.trim();
        self.echoes
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    fn level_curves(&self) -> &LevelCurves {
        &self.curves
    }

    fn main_stats(&self) -> &MainStatTable {
        &self.main_stats
    }

    fn substats(&self) -> &SubstatTable {
        &self.substats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::{CostTier, Element, StatName};
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    fn write_catalog(dir: &Path) {
        write(
            dir,
            "Characters.json",
            r#"[{"name": "Jinhsi", "element": "Spectro", "weaponType": "Broadblade",
                 "HP": 866, "ATK": 33, "DEF": 105, "Bonus1": "Crit Rate", "Bonus2": "ATK"}]"#,
        );
        write(
            dir,
            "Broadblades.json",
            r#"[{"name": "Ages of Harvest", "rarity": 5, "ATK": "47", "main_stat": "Crit Rate",
                 "base_main": 5.4, "passive": "Attribute", "passive_stat": 12}]"#,
        );
        write(
            dir,
            "Echoes.json",
            r#"[{"name": "Jue", "cost": 4, "elements": ["Spectro"]}]"#,
        );
        write(
            dir,
            "LevelCurve.json",
            r#"{"ATK_CURVE": {"90/90": 12.5}, "STAT_CURVE": {"90/90": 4.5}}"#,
        );
        write(
            dir,
            "MainStats.json",
            r#"{"4cost": {"mainStats": {"Crit Rate": [4.4, 22.0]},
                          "secondary": {"stat": "ATK", "value": 150}}}"#,
        );
        write(
            dir,
            "Substats.json",
            r#"{"subStats": {"Crit Rate": [6.3, 6.9, 7.5]}}"#,
        );
    }

    #[test]
    fn test_load_from_directory() {
        let temp = TempDir::new().unwrap();
        write_catalog(temp.path());

        let catalog = JsonCatalog::load(temp.path()).unwrap();

        let jinhsi = catalog.character("JINHSI").unwrap();
        assert_eq!(jinhsi.element, Element::Spectro);
        assert_eq!(jinhsi.weapon_type, WeaponType::Broadblade);

        let weapon = catalog
            .weapon(WeaponType::Broadblade, "ages of harvest")
            .unwrap();
        assert_eq!(weapon.atk, 47.0);
        assert_eq!(weapon.weapon_type, Some(WeaponType::Broadblade));
        assert!(catalog.weapon(WeaponType::Sword, "Ages of Harvest").is_none());
        assert!(catalog.find_weapon("Ages of Harvest").is_some());

        assert_eq!(catalog.echo("jue").unwrap().cost, CostTier::Four);
        assert_eq!(catalog.level_curves().atk_curve["90/90"], 12.5);
        assert!(catalog
            .main_stats()
            .tier(CostTier::Four)
            .unwrap()
            .allows(StatName::CritRate));
        assert!(catalog.substats().is_legal(StatName::CritRate, 6.9));
    }

    #[test]
    fn test_missing_required_file() {
        let temp = TempDir::new().unwrap();
        let err = JsonCatalog::load(temp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        write_catalog(temp.path());
        write(temp.path(), "Echoes.json", "{not json");

        match JsonCatalog::load(temp.path()) {
            Err(CatalogError::Parse { file, .. }) => assert_eq!(file, "Echoes.json"),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }
}
