//! Daily challenge type definitions
//!
//! The candidate pool the generator draws from, plus reward tuning.
//! Skill-bound kinds only enter a player's pool while that skill is
//! selected; the skill-agnostic kinds form the fallback pool.

use serde::{Deserialize, Serialize};

use super::skills::SkillId;

/// What a challenge asks the player to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// Earn XP in a specific skill
    GainXp(SkillId),
    /// Activate a specific skill's ability
    UseAbility(SkillId),
    /// Earn XP in any selected skill
    GainAnyXp,
    /// Activate any ability
    UseAnyAbility,
    /// Gain levels in any selected skill
    EarnLevels,
}

impl ChallengeKind {
    /// The skill this kind is bound to, if any.
    pub fn related_skill(&self) -> Option<SkillId> {
        match self {
            ChallengeKind::GainXp(s) | ChallengeKind::UseAbility(s) => Some(*s),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ChallengeKind::GainXp(s) => format!("Earn XP in {}", s),
            ChallengeKind::UseAbility(s) => format!("Use your {} ability", s),
            ChallengeKind::GainAnyXp => "Earn XP in any skill".to_string(),
            ChallengeKind::UseAnyAbility => "Use any ability".to_string(),
            ChallengeKind::EarnLevels => "Gain levels".to_string(),
        }
    }
}

/// One entry in the candidate pool: a kind plus its target range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeTypeDef {
    pub kind: ChallengeKind,
    /// Inclusive target range the generator draws from
    pub target_min: u64,
    pub target_max: u64,
}

/// Candidate pool and reward tuning for daily challenges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeDefs {
    pub types: Vec<ChallengeTypeDef>,
    /// Challenges generated per player per day
    pub per_day: usize,
    /// XP paid into the related skill when one challenge completes
    pub completion_reward_xp: f64,
    /// XP split across selected skills when the whole set completes
    pub full_set_reward_xp: f64,
}

impl ChallengeDefs {
    /// Candidate types for a player's current selection. Skill-bound
    /// kinds require their skill to be selected; with nothing selected
    /// only the skill-agnostic fallback pool remains.
    pub fn candidate_pool(&self, selected: &[SkillId]) -> Vec<&ChallengeTypeDef> {
        if selected.is_empty() {
            self.types
                .iter()
                .filter(|t| t.kind.related_skill().is_none())
                .collect()
        } else {
            self.types
                .iter()
                .filter(|t| match t.kind.related_skill() {
                    Some(skill) => selected.contains(&skill),
                    None => true,
                })
                .collect()
        }
    }
}

fn entry(kind: ChallengeKind, target_min: u64, target_max: u64) -> ChallengeTypeDef {
    ChallengeTypeDef {
        kind,
        target_min,
        target_max,
    }
}

/// Create the default challenge pool (hardcoded fallback).
pub fn default_challenge_defs() -> ChallengeDefs {
    let mut types = Vec::new();
    for skill in SkillId::ALL {
        types.push(entry(ChallengeKind::GainXp(skill), 400, 1200));
        types.push(entry(ChallengeKind::UseAbility(skill), 2, 5));
    }
    // Fallback pool for players with no selection
    types.push(entry(ChallengeKind::GainAnyXp, 600, 1500));
    types.push(entry(ChallengeKind::UseAnyAbility, 3, 6));
    types.push(entry(ChallengeKind::EarnLevels, 2, 4));

    ChallengeDefs {
        types,
        per_day: 3,
        completion_reward_xp: 250.0,
        full_set_reward_xp: 600.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_pool_when_nothing_selected() {
        let defs = default_challenge_defs();
        let pool = defs.candidate_pool(&[]);
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|t| t.kind.related_skill().is_none()));
    }

    #[test]
    fn test_pool_filtered_by_selection() {
        let defs = default_challenge_defs();
        let pool = defs.candidate_pool(&[SkillId::Mining]);

        // Mining-bound kinds plus the three skill-agnostic ones
        assert_eq!(pool.len(), 5);
        assert!(pool
            .iter()
            .any(|t| t.kind == ChallengeKind::GainXp(SkillId::Mining)));
        assert!(!pool
            .iter()
            .any(|t| t.kind == ChallengeKind::GainXp(SkillId::Combat)));
    }
}
