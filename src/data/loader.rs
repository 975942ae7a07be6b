//! RON data loader
//!
//! Loads engine data from external RON files, with fallback to hardcoded
//! defaults. Everything is validated once here so bad coefficients are a
//! startup failure, never a mid-game surprise.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;

use super::challenges::{default_challenge_defs, ChallengeDefs};
use super::skills::{default_skill_defs, SkillDefs, SkillId, XpCurveDef};
use super::synergies::{default_synergy_defs, SynergyDefs};
use super::tuning::TuningDefs;

/// Manages all static engine data
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Per-skill behavior descriptors
    pub skills: SkillDefs,
    /// Synergy rule table
    pub synergies: SynergyDefs,
    /// Daily challenge pool
    pub challenges: ChallengeDefs,
    /// Numeric tuning (curve, caps, prestige)
    pub tuning: TuningDefs,
}

impl DataManager {
    /// Create a new DataManager, loading from files or using defaults.
    /// Fails only on invalid data, not on missing files.
    pub fn new() -> Result<Self, ConfigError> {
        let manager = Self::load_from_assets();
        manager.validate()?;
        Ok(manager)
    }

    /// Load data from assets/data/, falling back per file.
    fn load_from_assets() -> Self {
        let base_path = Path::new("assets/data");

        Self {
            skills: load_or_default(base_path, "skills.ron", default_skill_defs),
            synergies: load_or_default(base_path, "synergies.ron", default_synergy_defs),
            challenges: load_or_default(base_path, "challenges.ron", default_challenge_defs),
            tuning: load_or_default(base_path, "tuning.ron", TuningDefs::default),
        }
    }

    /// The XP curve for a skill: its override, or the shared default.
    pub fn curve(&self, skill: SkillId) -> XpCurveDef {
        self.skills
            .descriptor(skill)
            .curve
            .unwrap_or(self.tuning.curve)
    }

    /// Reject configurations that would stall or corrupt progression.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_curve(None, &self.tuning.curve)?;

        if self.tuning.leveling.hard_cap == 0 {
            return Err(ConfigError::ZeroLevelCap);
        }

        for skill in SkillId::ALL {
            if !self.skills.descriptors.iter().any(|d| d.skill == skill) {
                return Err(ConfigError::MissingSkillDescriptor { skill });
            }
        }

        for desc in &self.skills.descriptors {
            if let Some(curve) = &desc.curve {
                validate_curve(Some(desc.skill), curve)?;
            }
            if desc.ability.cooldown_ticks <= 0 {
                return Err(ConfigError::InvalidAbilityTiming {
                    skill: desc.skill,
                    field: "cooldown_ticks",
                    value: desc.ability.cooldown_ticks,
                });
            }
            if desc.ability.duration_ticks <= 0 {
                return Err(ConfigError::InvalidAbilityTiming {
                    skill: desc.skill,
                    field: "duration_ticks",
                    value: desc.ability.duration_ticks,
                });
            }
        }

        for rule in &self.synergies.rules {
            if rule.skills[0] == rule.skills[1] {
                return Err(ConfigError::DegenerateSynergyRule {
                    id: rule.id.clone(),
                    skill: rule.skills[0],
                });
            }
        }

        if self.challenges.per_day == 0 {
            return Err(ConfigError::ZeroChallengesPerDay);
        }
        for (index, t) in self.challenges.types.iter().enumerate() {
            if t.target_min == 0 || t.target_min > t.target_max {
                return Err(ConfigError::EmptyChallengeRange {
                    index,
                    min: t.target_min,
                    max: t.target_max,
                });
            }
        }

        Ok(())
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            skills: default_skill_defs(),
            synergies: default_synergy_defs(),
            challenges: default_challenge_defs(),
            tuning: TuningDefs::default(),
        }
    }
}

fn validate_curve(skill: Option<SkillId>, curve: &XpCurveDef) -> Result<(), ConfigError> {
    if curve.base <= 0.0 {
        return Err(ConfigError::NonPositiveCurveBase {
            skill,
            base: curve.base,
        });
    }
    if curve.multiplier < 0.0 {
        return Err(ConfigError::NegativeCurveCoefficient {
            skill,
            value: curve.multiplier,
        });
    }
    if curve.exponent < 0.0 {
        return Err(ConfigError::NegativeCurveCoefficient {
            skill,
            value: curve.exponent,
        });
    }
    Ok(())
}

/// Load one RON file, or fall back to the hardcoded default.
fn load_or_default<T, F>(base_path: &Path, file: &str, fallback: F) -> T
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> T,
{
    let path = base_path.join(file);
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str(&content) {
                Ok(parsed) => return parsed,
                Err(e) => log::warn!("Failed to parse {}: {}", file, e),
            },
            Err(e) => log::warn!("Failed to read {}: {}", file, e),
        }
    }
    fallback()
}

/// Export all default data to RON files for easy editing.
pub fn export_default_data() -> Result<(), String> {
    let base_path = Path::new("assets/data");

    if !base_path.exists() {
        fs::create_dir_all(base_path)
            .map_err(|e| format!("Failed to create assets/data directory: {}", e))?;
    }

    export(base_path, "skills.ron", &default_skill_defs())?;
    export(base_path, "synergies.ron", &default_synergy_defs())?;
    export(base_path, "challenges.ron", &default_challenge_defs())?;
    export(base_path, "tuning.ron", &TuningDefs::default())?;

    Ok(())
}

fn export<T: serde::Serialize>(base_path: &Path, file: &str, value: &T) -> Result<(), String> {
    let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .map_err(|e| format!("Failed to serialize {}: {}", file, e))?;
    fs::write(base_path.join(file), text).map_err(|e| format!("Failed to write {}: {}", file, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_validates() {
        let manager = DataManager::default();
        assert!(manager.validate().is_ok());
    }

    #[test]
    fn test_bad_curve_is_rejected() {
        let mut manager = DataManager::default();
        manager.tuning.curve.base = 0.0;
        assert!(matches!(
            manager.validate(),
            Err(ConfigError::NonPositiveCurveBase { .. })
        ));

        let mut manager = DataManager::default();
        manager.skills.descriptors[0].curve = Some(XpCurveDef {
            base: 50.0,
            multiplier: -1.0,
            exponent: 2.0,
        });
        assert!(matches!(
            manager.validate(),
            Err(ConfigError::NegativeCurveCoefficient { .. })
        ));
    }

    #[test]
    fn test_bad_ability_timing_is_rejected() {
        let mut manager = DataManager::default();
        manager.skills.descriptors[2].ability.duration_ticks = 0;
        assert!(matches!(
            manager.validate(),
            Err(ConfigError::InvalidAbilityTiming { .. })
        ));
    }

    #[test]
    fn test_missing_descriptor_is_rejected() {
        let mut manager = DataManager::default();
        manager.skills.descriptors.pop();
        assert!(matches!(
            manager.validate(),
            Err(ConfigError::MissingSkillDescriptor { .. })
        ));
    }

    #[test]
    fn test_defaults_round_trip_through_ron() {
        let text = ron::ser::to_string_pretty(
            &default_skill_defs(),
            ron::ser::PrettyConfig::default(),
        )
        .unwrap();
        let parsed: SkillDefs = ron::from_str(&text).unwrap();
        assert!(parsed.has_all_skills());

        let text = ron::ser::to_string_pretty(
            &default_challenge_defs(),
            ron::ser::PrettyConfig::default(),
        )
        .unwrap();
        let parsed: ChallengeDefs = ron::from_str(&text).unwrap();
        assert_eq!(parsed.per_day, 3);
    }

    #[test]
    fn test_curve_override_wins() {
        let mut manager = DataManager::default();
        let custom = XpCurveDef {
            base: 80.0,
            multiplier: 10.0,
            exponent: 1.0,
        };
        manager.skills.descriptors[0].curve = Some(custom);

        let skill = manager.skills.descriptors[0].skill;
        assert_eq!(manager.curve(skill).base, 80.0);
        assert_eq!(manager.curve(SkillId::Combat).base, 60.0);
    }
}
