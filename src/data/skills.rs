//! Skill identities and per-skill behavior descriptors
//!
//! Every per-skill constant (display metadata, ability timings, curve
//! overrides) lives in one descriptor registry so no component needs its
//! own switch over skill identity.

use serde::{Deserialize, Serialize};

/// The eight known skills. Every progression record carries state for
/// all of them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SkillId {
    Mining,
    Woodcutting,
    Fishing,
    Farming,
    Combat,
    Archery,
    Alchemy,
    Enchanting,
}

impl SkillId {
    pub const ALL: [SkillId; 8] = [
        SkillId::Mining,
        SkillId::Woodcutting,
        SkillId::Fishing,
        SkillId::Farming,
        SkillId::Combat,
        SkillId::Archery,
        SkillId::Alchemy,
        SkillId::Enchanting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SkillId::Mining => "Mining",
            SkillId::Woodcutting => "Woodcutting",
            SkillId::Fishing => "Fishing",
            SkillId::Farming => "Farming",
            SkillId::Combat => "Combat",
            SkillId::Archery => "Archery",
            SkillId::Alchemy => "Alchemy",
            SkillId::Enchanting => "Enchanting",
        }
    }

    /// Parse a skill name, case-insensitively. Used by the legacy
    /// migration adapter where unknown names are skipped, not fatal.
    pub fn parse(name: &str) -> Option<SkillId> {
        SkillId::ALL
            .iter()
            .copied()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing and gating parameters for a skill's master ability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityDef {
    /// Display name of the ability
    pub name: String,
    /// Skill level required to activate
    pub unlock_level: u32,
    /// Cooldown between activations, in simulation ticks
    pub cooldown_ticks: i64,
    /// Length of the active window, in simulation ticks
    pub duration_ticks: i64,
    /// Whether the active window can be paused and resumed
    pub pausable: bool,
}

/// XP curve coefficients: `base + level * multiplier + exponent * level²`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct XpCurveDef {
    pub base: f64,
    pub multiplier: f64,
    pub exponent: f64,
}

impl Default for XpCurveDef {
    fn default() -> Self {
        Self {
            base: 60.0,
            multiplier: 15.0,
            exponent: 2.0,
        }
    }
}

/// Everything skill-specific in one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillBehaviorDescriptor {
    pub skill: SkillId,
    pub display_name: String,
    pub icon: char,
    pub color: (u8, u8, u8),
    pub ability: AbilityDef,
    /// Per-skill curve override; the shared default applies when absent
    pub curve: Option<XpCurveDef>,
}

/// The full descriptor registry, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefs {
    pub descriptors: Vec<SkillBehaviorDescriptor>,
}

impl SkillDefs {
    /// Look up the descriptor for a skill.
    ///
    /// The default registry covers every skill; a registry that does not
    /// is rejected at config load, so this cannot miss afterwards.
    pub fn descriptor(&self, skill: SkillId) -> &SkillBehaviorDescriptor {
        self.descriptors
            .iter()
            .find(|d| d.skill == skill)
            .unwrap_or_else(|| panic!("no descriptor for {}", skill))
    }

    pub fn has_all_skills(&self) -> bool {
        SkillId::ALL
            .iter()
            .all(|s| self.descriptors.iter().any(|d| d.skill == *s))
    }
}

/// Title shown next to a skill's level.
pub fn level_title(level: u32) -> &'static str {
    match level {
        0..=9 => "Novice",
        10..=24 => "Apprentice",
        25..=49 => "Journeyman",
        50..=74 => "Adept",
        75..=89 => "Expert",
        90..=99 => "Master",
        _ => "Paragon",
    }
}

fn descriptor(
    skill: SkillId,
    icon: char,
    color: (u8, u8, u8),
    ability_name: &str,
    unlock_level: u32,
    cooldown_secs: i64,
    duration_secs: i64,
    pausable: bool,
) -> SkillBehaviorDescriptor {
    use crate::clock::TICKS_PER_SECOND;

    SkillBehaviorDescriptor {
        skill,
        display_name: skill.name().to_string(),
        icon,
        color,
        ability: AbilityDef {
            name: ability_name.to_string(),
            unlock_level,
            cooldown_ticks: cooldown_secs * TICKS_PER_SECOND,
            duration_ticks: duration_secs * TICKS_PER_SECOND,
            pausable,
        },
        curve: None,
    }
}

/// Create the default descriptor registry (hardcoded fallback).
pub fn default_skill_defs() -> SkillDefs {
    SkillDefs {
        descriptors: vec![
            descriptor(SkillId::Mining, '⛏', (140, 140, 150), "Vein Ripper", 10, 120, 20, false),
            descriptor(SkillId::Woodcutting, '🪓', (120, 90, 40), "Timber Fury", 10, 120, 15, false),
            descriptor(SkillId::Fishing, '🎣', (60, 140, 220), "Tide Caller", 15, 180, 30, true),
            descriptor(SkillId::Farming, '🌾', (110, 190, 60), "Field Bloom", 15, 180, 25, true),
            descriptor(SkillId::Combat, '⚔', (200, 50, 50), "Berserk", 20, 240, 10, false),
            descriptor(SkillId::Archery, '🏹', (90, 170, 90), "Eagle Eye", 20, 240, 15, false),
            descriptor(SkillId::Alchemy, '⚗', (163, 53, 238), "Catalyst Rush", 25, 300, 20, true),
            descriptor(SkillId::Enchanting, '✨', (255, 165, 0), "Arcane Overflow", 25, 300, 15, false),
        ],
    }
}
