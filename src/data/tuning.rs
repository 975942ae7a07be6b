//! Numeric tuning: level caps, milestones, prestige economy
//!
//! The shared XP curve lives here too; per-skill overrides sit on the
//! skill descriptors.

use serde::{Deserialize, Serialize};

use super::skills::XpCurveDef;

/// Level cap and milestone configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelingConfig {
    /// Absolute level ceiling. Only the paragon skill may reach it;
    /// every other skill stops one below.
    pub hard_cap: u32,
    /// Levels that fire a one-time milestone event when crossed
    pub milestones: Vec<u32>,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            hard_cap: 100,
            milestones: vec![10, 25, 50, 75, 100],
        }
    }
}

/// Prestige caps and per-rank bonuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrestigeConfig {
    /// Maximum prestige rank per skill
    pub max_prestige: u32,
    /// Additive XP multiplier per rank (0.05 = +5%)
    pub xp_bonus_per_prestige: f64,
    /// Additive passive-output multiplier per rank
    pub passive_bonus_per_prestige: f64,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self {
            max_prestige: 10,
            xp_bonus_per_prestige: 0.05,
            passive_bonus_per_prestige: 0.02,
        }
    }
}

impl PrestigeConfig {
    /// XP multiplier at a given prestige rank.
    pub fn xp_multiplier(&self, prestige: u32) -> f64 {
        1.0 + prestige as f64 * self.xp_bonus_per_prestige
    }

    /// Passive-output multiplier at a given prestige rank. Usable by
    /// external attribute calculators.
    pub fn passive_multiplier(&self, prestige: u32) -> f64 {
        1.0 + prestige as f64 * self.passive_bonus_per_prestige
    }
}

/// All numeric tuning in one loadable block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuningDefs {
    /// Shared XP curve, applied where a skill has no override
    pub curve: XpCurveDef,
    pub leveling: LevelingConfig,
    pub prestige: PrestigeConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prestige_multipliers() {
        let cfg = PrestigeConfig::default();
        assert_eq!(cfg.xp_multiplier(0), 1.0);
        assert_eq!(cfg.xp_multiplier(3), 1.15);
        assert_eq!(cfg.passive_multiplier(5), 1.1);
    }
}
