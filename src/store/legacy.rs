//! Legacy save migration
//!
//! One-shot adapter from the old whole-world progression blob (string
//! skill names, indexed selection list) into the current record format.
//! Runs only for players with no current-format progress; unknown skill
//! names are skipped with a warning, never fatal.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::SkillId;
use crate::error::StoreError;
use crate::progression::record::{PlayerProgressionRecord, NEVER_USED};

fn never_used() -> i64 {
    NEVER_USED
}

/// Per-skill entry in the legacy blob.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySkillEntry {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub xp: f64,
    #[serde(default = "never_used")]
    pub last_ability_use: i64,
    #[serde(default)]
    pub prestige: u32,
}

/// Everything the legacy format stored for one player.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPlayerEntry {
    #[serde(default)]
    pub skills: HashMap<String, LegacySkillEntry>,
    #[serde(default)]
    pub paragon_skill: Option<String>,
    /// Ordered by selection slot index
    #[serde(default)]
    pub selected_skills: Vec<String>,
    #[serde(default)]
    pub toggles: HashMap<String, bool>,
    #[serde(default)]
    pub achievement_stats: HashMap<String, u64>,
}

/// The legacy store: player-id-string to entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LegacyData {
    pub players: HashMap<String, LegacyPlayerEntry>,
}

impl LegacyData {
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn get(&self, player_id: &str) -> Option<&LegacyPlayerEntry> {
        self.players.get(player_id)
    }
}

/// Populate a fresh record from a legacy entry. Returns false (no
/// mutation) when the record already shows current-format progress.
pub fn migrate(record: &mut PlayerProgressionRecord, legacy: &LegacyPlayerEntry) -> bool {
    if record.has_progress() {
        return false;
    }

    for (name, entry) in &legacy.skills {
        match SkillId::parse(name) {
            Some(skill) => {
                let state = record.skill_mut(skill);
                state.level = entry.level;
                state.xp = entry.xp;
                state.prestige = entry.prestige;
                state.last_ability_use_tick = entry.last_ability_use;
            }
            None => log::warn!("Skipping unknown legacy skill '{}'", name),
        }
    }

    if let Some(name) = &legacy.paragon_skill {
        match SkillId::parse(name) {
            Some(skill) => record.set_paragon(Some(skill)),
            None => log::warn!("Skipping unknown legacy paragon skill '{}'", name),
        }
    }

    for name in &legacy.selected_skills {
        match SkillId::parse(name) {
            // select_skill enforces the cap and drops duplicates
            Some(skill) => {
                if !record.select_skill(skill) {
                    log::warn!("Dropping legacy selection '{}' (slot limit)", name);
                }
            }
            None => log::warn!("Skipping unknown legacy selected skill '{}'", name),
        }
    }

    for (key, value) in &legacy.toggles {
        record.set_toggle(key, *value);
    }
    for (key, value) in &legacy.achievement_stats {
        record.achievement_counters.insert(key.clone(), *value);
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LegacyPlayerEntry {
        serde_json::from_str(
            r#"{
                "skills": {
                    "Mining": {"level": 40, "xp": 12.0, "lastAbilityUse": 900, "prestige": 1},
                    "Fishing": {"level": 5, "xp": 3.5},
                    "Sorcery": {"level": 99, "xp": 1.0}
                },
                "paragonSkill": "Mining",
                "selectedSkills": ["Mining", "Fishing"],
                "toggles": {"farming.area_mode": true},
                "achievementStats": {"levels_gained": 45}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_migration_populates_fresh_record() {
        let mut record = PlayerProgressionRecord::new();
        assert!(migrate(&mut record, &sample_entry()));

        let mining = record.skill(SkillId::Mining);
        assert_eq!(mining.level, 40);
        assert_eq!(mining.prestige, 1);
        assert_eq!(mining.last_ability_use_tick, 900);

        // Missing lastAbilityUse defaults to the never-used sentinel
        assert_eq!(record.skill(SkillId::Fishing).last_ability_use_tick, NEVER_USED);

        assert_eq!(record.paragon_skill, Some(SkillId::Mining));
        assert_eq!(
            record.selected_skills,
            vec![SkillId::Mining, SkillId::Fishing]
        );
        assert!(record.toggle("farming.area_mode"));
        assert_eq!(record.achievement_counters["levels_gained"], 45);
    }

    #[test]
    fn test_unknown_skill_names_are_skipped() {
        let mut record = PlayerProgressionRecord::new();
        migrate(&mut record, &sample_entry());

        // "Sorcery" parsed to nothing; every known skill still present
        assert_eq!(record.skills.len(), SkillId::ALL.len());
    }

    #[test]
    fn test_migration_skipped_when_level_progress_exists() {
        let mut record = PlayerProgressionRecord::new();
        record.skill_mut(SkillId::Combat).level = 3;

        assert!(!migrate(&mut record, &sample_entry()));
        assert_eq!(record.skill(SkillId::Mining).level, 0);
        assert!(record.selected_skills.is_empty());
    }

    #[test]
    fn test_migration_skipped_when_selection_exists() {
        let mut record = PlayerProgressionRecord::new();
        record.select_skill(SkillId::Archery);

        assert!(!migrate(&mut record, &sample_entry()));
        assert_eq!(record.selected_skills, vec![SkillId::Archery]);
    }

    #[test]
    fn test_oversized_legacy_selection_is_truncated() {
        let mut entry = sample_entry();
        entry.selected_skills = vec![
            "Mining".into(),
            "Fishing".into(),
            "Combat".into(),
            "Farming".into(),
        ];

        let mut record = PlayerProgressionRecord::new();
        migrate(&mut record, &entry);
        assert_eq!(record.selected_skills.len(), 3);
        assert_eq!(
            record.selected_skills,
            vec![SkillId::Mining, SkillId::Fishing, SkillId::Combat]
        );
    }
}
