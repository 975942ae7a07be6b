//! XP grants and level resolution
//!
//! Applies a grant to a skill record: selection gating, prestige
//! multiplier, multi-level-up resolution and the cap rule. XP left over
//! at the cap is discarded, not banked.

use crate::data::{DataManager, SkillId};

use super::record::PlayerProgressionRecord;
use super::xp::xp_for_level;

/// What an XP grant did to the skill.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantOutcome {
    pub leveled_up: bool,
    pub old_level: u32,
    pub new_level: u32,
    /// Prestige-adjusted XP actually applied; 0 when the grant was gated
    pub applied_xp: f64,
    /// Milestone levels crossed by this grant, in ascending order
    pub milestones: Vec<u32>,
}

impl GrantOutcome {
    fn no_change(level: u32) -> Self {
        Self {
            leveled_up: false,
            old_level: level,
            new_level: level,
            applied_xp: 0.0,
            milestones: Vec::new(),
        }
    }
}

/// Highest level this skill may currently reach: one under the hard cap,
/// or the cap itself for the player's paragon skill.
pub fn max_level_allowed(
    data: &DataManager,
    record: &PlayerProgressionRecord,
    skill: SkillId,
) -> u32 {
    let cap = data.tuning.leveling.hard_cap;
    if record.paragon_skill == Some(skill) {
        cap
    } else {
        cap.saturating_sub(1)
    }
}

/// Apply an XP grant.
///
/// No-ops (without mutation) when nothing is selected, the skill is not
/// selected, or the skill already sits at its allowed maximum. One large
/// grant can resolve several level-ups.
pub fn grant_xp(
    data: &DataManager,
    record: &mut PlayerProgressionRecord,
    skill: SkillId,
    amount: f64,
) -> GrantOutcome {
    let current_level = record.skill(skill).level;

    if record.selected_skills.is_empty() || !record.is_selected(skill) {
        return GrantOutcome::no_change(current_level);
    }

    let max_allowed = max_level_allowed(data, record, skill);
    if current_level >= max_allowed {
        return GrantOutcome::no_change(current_level);
    }

    let prestige = record.skill(skill).prestige;
    let adjusted = (amount * data.tuning.prestige.xp_multiplier(prestige)).round();
    let curve = data.curve(skill);

    let state = record.skill_mut(skill);
    let old_level = state.level;
    state.xp += adjusted;

    while state.level < max_allowed {
        let threshold = xp_for_level(&curve, state.level);
        if state.xp < threshold {
            break;
        }
        state.xp -= threshold;
        state.level += 1;
    }

    // Excess XP beyond the cap is discarded
    if state.level >= max_allowed {
        state.xp = 0.0;
    }

    let new_level = state.level;
    let milestones = data
        .tuning
        .leveling
        .milestones
        .iter()
        .copied()
        .filter(|m| old_level < *m && *m <= new_level)
        .collect();

    GrantOutcome {
        leveled_up: new_level > old_level,
        old_level,
        new_level,
        applied_xp: adjusted,
        milestones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SkillId;

    fn setup() -> (DataManager, PlayerProgressionRecord) {
        let data = DataManager::default();
        let mut record = PlayerProgressionRecord::new();
        record.select_skill(SkillId::Mining);
        (data, record)
    }

    #[test]
    fn test_grant_to_unselected_skill_is_a_noop() {
        let (data, mut record) = setup();
        let outcome = grant_xp(&data, &mut record, SkillId::Combat, 500.0);
        assert!(!outcome.leveled_up);
        assert_eq!(record.skill(SkillId::Combat).xp, 0.0);

        record.selected_skills.clear();
        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 500.0);
        assert!(!outcome.leveled_up);
        assert_eq!(record.skill(SkillId::Mining).xp, 0.0);
    }

    #[test]
    fn test_single_level_up_keeps_remainder() {
        // Curve 60/15/2: threshold at level 0 is 60
        let (data, mut record) = setup();
        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 70.0);

        assert!(outcome.leveled_up);
        assert_eq!(outcome.old_level, 0);
        assert_eq!(outcome.new_level, 1);
        assert_eq!(record.skill(SkillId::Mining).level, 1);
        assert_eq!(record.skill(SkillId::Mining).xp, 10.0);
    }

    #[test]
    fn test_one_large_grant_resolves_multiple_levels() {
        let (data, mut record) = setup();
        // Thresholds: 60 (0->1), 77 (1->2), 98 (2->3)
        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 140.0);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(record.skill(SkillId::Mining).xp, 3.0);
    }

    #[test]
    fn test_split_grants_match_single_grant_below_cap() {
        let (data, mut record_a) = setup();
        let (_, mut record_b) = setup();

        grant_xp(&data, &mut record_a, SkillId::Mining, 40.0);
        grant_xp(&data, &mut record_a, SkillId::Mining, 30.0);
        grant_xp(&data, &mut record_b, SkillId::Mining, 70.0);

        assert_eq!(
            record_a.skill(SkillId::Mining).level,
            record_b.skill(SkillId::Mining).level
        );
        assert_eq!(
            record_a.skill(SkillId::Mining).xp,
            record_b.skill(SkillId::Mining).xp
        );
    }

    #[test]
    fn test_capped_skill_ignores_grants() {
        let (data, mut record) = setup();
        record.skill_mut(SkillId::Mining).level = 99;

        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 10_000.0);
        assert!(!outcome.leveled_up);
        assert_eq!(record.skill(SkillId::Mining).level, 99);
        assert_eq!(record.skill(SkillId::Mining).xp, 0.0);
    }

    #[test]
    fn test_paragon_raises_the_cap_and_discards_overflow() {
        let (data, mut record) = setup();
        record.skill_mut(SkillId::Mining).level = 99;
        record.set_paragon(Some(SkillId::Mining));

        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 10_000.0);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.new_level, 100);
        assert_eq!(record.skill(SkillId::Mining).xp, 0.0);
    }

    #[test]
    fn test_prestige_multiplier_applies_rounded() {
        let (data, mut record) = setup();
        record.skill_mut(SkillId::Mining).prestige = 2;

        // 50 * 1.10 = 55
        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 50.0);
        assert_eq!(outcome.applied_xp, 55.0);
        assert_eq!(record.skill(SkillId::Mining).xp, 55.0);
    }

    #[test]
    fn test_milestones_cross_once() {
        let (data, mut record) = setup();
        record.skill_mut(SkillId::Mining).level = 9;

        // Threshold at level 9: 60 + 135 + 162 = 357
        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 400.0);
        assert_eq!(outcome.new_level, 10);
        assert_eq!(outcome.milestones, vec![10]);

        // Already past 10: a further small grant crosses nothing
        let outcome = grant_xp(&data, &mut record, SkillId::Mining, 10.0);
        assert!(outcome.milestones.is_empty());
    }
}
