//! Synergy rule definitions
//!
//! Static pair rules loaded once at startup. Each rule names exactly two
//! skills and the bonus it grants when both are in a player's selection.

use serde::{Deserialize, Serialize};

use super::skills::SkillId;

/// What a synergy bonus applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SynergyBonusKind {
    /// Multiplies XP gains
    XpGain,
    /// Multiplies passive yields (gathering output, regen, etc.)
    PassiveYield,
    /// Multiplies rare drop chance
    RareFind,
}

/// A single pair rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyRuleDef {
    /// Unique rule ID
    pub id: String,
    /// Display name of the synergy
    pub name: String,
    /// The two skills that must both be selected
    pub skills: [SkillId; 2],
    /// Bonus category
    pub bonus: SynergyBonusKind,
    /// Additive multiplier contribution (0.10 = +10%)
    pub multiplier: f64,
}

impl SynergyRuleDef {
    /// True when both required skills are in the selection.
    pub fn is_active(&self, selected: &[SkillId]) -> bool {
        self.skills.iter().all(|s| selected.contains(s))
    }
}

/// Collection of synergy rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynergyDefs {
    pub rules: Vec<SynergyRuleDef>,
}

impl SynergyDefs {
    /// Find a rule by ID.
    pub fn find(&self, id: &str) -> Option<&SynergyRuleDef> {
        self.rules.iter().find(|r| r.id == id)
    }
}

fn rule(
    id: &str,
    name: &str,
    skills: [SkillId; 2],
    bonus: SynergyBonusKind,
    multiplier: f64,
) -> SynergyRuleDef {
    SynergyRuleDef {
        id: id.to_string(),
        name: name.to_string(),
        skills,
        bonus,
        multiplier,
    }
}

/// Create default synergy rules (hardcoded fallback).
pub fn default_synergy_defs() -> SynergyDefs {
    use SkillId::*;
    use SynergyBonusKind::*;

    SynergyDefs {
        rules: vec![
            rule("prospectors_instinct", "Prospector's Instinct", [Mining, Woodcutting], XpGain, 0.10),
            rule("harvest_rhythm", "Harvest Rhythm", [Farming, Fishing], XpGain, 0.10),
            rule("groundskeeper", "Groundskeeper", [Woodcutting, Farming], XpGain, 0.06),
            rule("warriors_focus", "Warrior's Focus", [Combat, Archery], PassiveYield, 0.05),
            rule("herbal_tonic", "Herbal Tonic", [Farming, Alchemy], PassiveYield, 0.08),
            rule("runic_edge", "Runic Edge", [Enchanting, Combat], RareFind, 0.05),
            rule("transmuters_eye", "Transmuter's Eye", [Alchemy, Enchanting], RareFind, 0.07),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_activation_requires_both_skills() {
        let defs = default_synergy_defs();
        let rule = defs.find("prospectors_instinct").unwrap();

        assert!(rule.is_active(&[SkillId::Mining, SkillId::Woodcutting, SkillId::Combat]));
        assert!(!rule.is_active(&[SkillId::Mining, SkillId::Combat]));
        assert!(!rule.is_active(&[]));
    }

    #[test]
    fn test_default_rules_are_well_formed() {
        let defs = default_synergy_defs();
        assert_eq!(defs.rules.len(), 7);
        for rule in &defs.rules {
            assert_ne!(rule.skills[0], rule.skills[1], "rule {} is degenerate", rule.id);
            assert!(rule.multiplier > 0.0);
        }
    }
}
