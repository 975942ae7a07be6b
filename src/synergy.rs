//! Synergy evaluation
//!
//! Aggregates the static rule table against a player's selected-skill
//! set. Pure and cheap; recomputed on demand, never cached.

use crate::data::{SkillId, SynergyBonusKind, SynergyDefs, SynergyRuleDef};

/// Evaluator over a loaded rule table.
#[derive(Debug, Clone, Copy)]
pub struct SynergyEvaluator<'a> {
    defs: &'a SynergyDefs,
}

impl<'a> SynergyEvaluator<'a> {
    pub fn new(defs: &'a SynergyDefs) -> Self {
        Self { defs }
    }

    /// Rules whose skill pair is fully contained in the selection.
    pub fn active_synergies(&self, selected: &[SkillId]) -> Vec<&'a SynergyRuleDef> {
        self.defs
            .rules
            .iter()
            .filter(|r| r.is_active(selected))
            .collect()
    }

    /// Sum of multipliers over active rules of one bonus kind.
    pub fn total_bonus(&self, selected: &[SkillId], kind: SynergyBonusKind) -> f64 {
        self.defs
            .rules
            .iter()
            .filter(|r| r.bonus == kind && r.is_active(selected))
            .map(|r| r.multiplier)
            .sum()
    }

    /// `base * (1 + total_bonus)`.
    pub fn apply_bonus(&self, base: f64, selected: &[SkillId], kind: SynergyBonusKind) -> f64 {
        base * (1.0 + self.total_bonus(selected, kind))
    }
}
