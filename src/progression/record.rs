//! Persistent per-player progression state
//!
//! One record per player, covering every known skill. Mutation happens on
//! the owning simulation thread; the store persists after each durable
//! change.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::SkillId;

/// Current record version for compatibility checking
pub const RECORD_VERSION: u32 = 2;

/// Maximum number of simultaneously selected skills
pub const MAX_SELECTED_SKILLS: usize = 3;

/// Sentinel for "ability never used" (first activation bypasses cooldown)
pub const NEVER_USED: i64 = -1;

/// Stable player identifier
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-skill durable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillState {
    pub level: u32,
    pub xp: f64,
    pub prestige: u32,
    /// Tick of the last ability activation; `NEVER_USED` before the first
    pub last_ability_use_tick: i64,
}

impl Default for SkillState {
    fn default() -> Self {
        Self {
            level: 0,
            xp: 0.0,
            prestige: 0,
            last_ability_use_tick: NEVER_USED,
        }
    }
}

/// Everything durable about one player's progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProgressionRecord {
    pub version: u32,
    /// State for every known skill (no missing keys)
    pub skills: BTreeMap<SkillId, SkillState>,
    /// The one skill allowed to reach the hard cap, if any
    pub paragon_skill: Option<SkillId>,
    /// Ordered selection, at most `MAX_SELECTED_SKILLS`
    pub selected_skills: Vec<SkillId>,
    /// Named feature switches, default off
    pub toggles: BTreeMap<String, bool>,
    /// Monotonically non-decreasing counters
    pub achievement_counters: BTreeMap<String, u64>,
    /// Achievement IDs already granted
    pub achievements: BTreeSet<String>,
}

impl Default for PlayerProgressionRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProgressionRecord {
    /// Fresh record with zeroed state for every skill.
    pub fn new() -> Self {
        let mut skills = BTreeMap::new();
        for skill in SkillId::ALL {
            skills.insert(skill, SkillState::default());
        }
        Self {
            version: RECORD_VERSION,
            skills,
            paragon_skill: None,
            selected_skills: Vec::new(),
            toggles: BTreeMap::new(),
            achievement_counters: BTreeMap::new(),
            achievements: BTreeSet::new(),
        }
    }

    /// Fill in any skills missing from an older save.
    pub fn ensure_all_skills(&mut self) {
        for skill in SkillId::ALL {
            self.skills.entry(skill).or_default();
        }
    }

    pub fn skill(&self, skill: SkillId) -> &SkillState {
        &self.skills[&skill]
    }

    pub fn skill_mut(&mut self, skill: SkillId) -> &mut SkillState {
        self.skills.entry(skill).or_default()
    }

    pub fn is_selected(&self, skill: SkillId) -> bool {
        self.selected_skills.contains(&skill)
    }

    /// Add a skill to the selection. Returns false when already selected
    /// or the selection is full.
    pub fn select_skill(&mut self, skill: SkillId) -> bool {
        if self.is_selected(skill) || self.selected_skills.len() >= MAX_SELECTED_SKILLS {
            return false;
        }
        self.selected_skills.push(skill);
        true
    }

    /// Remove a skill from the selection. Returns false when it was not
    /// selected.
    pub fn deselect_skill(&mut self, skill: SkillId) -> bool {
        let before = self.selected_skills.len();
        self.selected_skills.retain(|s| *s != skill);
        self.selected_skills.len() < before
    }

    /// The paragon skill does not have to be selected.
    pub fn set_paragon(&mut self, skill: Option<SkillId>) {
        self.paragon_skill = skill;
    }

    pub fn toggle(&self, key: &str) -> bool {
        self.toggles.get(key).copied().unwrap_or(false)
    }

    pub fn set_toggle(&mut self, key: &str, value: bool) {
        self.toggles.insert(key.to_string(), value);
    }

    /// Whether this record shows any current-format progress. Controls
    /// whether legacy migration runs at all.
    pub fn has_progress(&self) -> bool {
        self.skills.values().any(|s| s.level > 0) || !self.selected_skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_covers_all_skills() {
        let record = PlayerProgressionRecord::new();
        assert_eq!(record.skills.len(), SkillId::ALL.len());
        for skill in SkillId::ALL {
            let state = record.skill(skill);
            assert_eq!(state.level, 0);
            assert_eq!(state.last_ability_use_tick, NEVER_USED);
        }
        assert!(!record.has_progress());
    }

    #[test]
    fn test_selection_is_capped_at_three() {
        let mut record = PlayerProgressionRecord::new();
        assert!(record.select_skill(SkillId::Mining));
        assert!(record.select_skill(SkillId::Fishing));
        assert!(record.select_skill(SkillId::Combat));
        assert!(!record.select_skill(SkillId::Farming));
        assert!(!record.select_skill(SkillId::Mining)); // duplicate

        assert!(record.deselect_skill(SkillId::Fishing));
        assert!(!record.deselect_skill(SkillId::Fishing));
        assert!(record.select_skill(SkillId::Farming));
        assert_eq!(record.selected_skills.len(), 3);
    }

    #[test]
    fn test_toggles_default_off() {
        let mut record = PlayerProgressionRecord::new();
        assert!(!record.toggle("farming.area_mode"));
        record.set_toggle("farming.area_mode", true);
        assert!(record.toggle("farming.area_mode"));
    }

    #[test]
    fn test_selection_counts_as_progress() {
        let mut record = PlayerProgressionRecord::new();
        record.select_skill(SkillId::Archery);
        assert!(record.has_progress());
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let mut record = PlayerProgressionRecord::new();
        record.select_skill(SkillId::Mining);
        record.set_paragon(Some(SkillId::Mining));
        record.skill_mut(SkillId::Mining).level = 42;
        record.skill_mut(SkillId::Mining).xp = 17.5;

        let json = serde_json::to_string(&record).unwrap();
        let back: PlayerProgressionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.skill(SkillId::Mining).level, 42);
        assert_eq!(back.skill(SkillId::Mining).xp, 17.5);
        assert_eq!(back.paragon_skill, Some(SkillId::Mining));
    }
}
