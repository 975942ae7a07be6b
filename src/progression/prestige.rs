//! Prestige resets
//!
//! A maxed skill can be reset for a permanent per-rank multiplier.
//! Eligibility requires the hard cap itself, so only a paragon skill
//! ever qualifies.

use crate::data::{DataManager, SkillId};
use crate::error::PrestigeError;

use super::record::PlayerProgressionRecord;

/// Whether `do_prestige` would succeed right now.
pub fn can_prestige(
    data: &DataManager,
    record: &PlayerProgressionRecord,
    skill: SkillId,
) -> bool {
    let state = record.skill(skill);
    state.level >= data.tuning.leveling.hard_cap
        && state.prestige < data.tuning.prestige.max_prestige
}

/// Execute a prestige reset. On success the skill restarts at level 1
/// with zero XP and one more prestige rank; cooldown bookkeeping is left
/// untouched. No mutation on failure.
pub fn do_prestige(
    data: &DataManager,
    record: &mut PlayerProgressionRecord,
    skill: SkillId,
) -> Result<u32, PrestigeError> {
    let hard_cap = data.tuning.leveling.hard_cap;
    let max_prestige = data.tuning.prestige.max_prestige;

    let state = record.skill(skill);
    if state.level < hard_cap {
        return Err(PrestigeError::LevelTooLow {
            required: hard_cap,
            actual: state.level,
        });
    }
    if state.prestige >= max_prestige {
        return Err(PrestigeError::RankCapReached { max: max_prestige });
    }

    let state = record.skill_mut(skill);
    state.prestige += 1;
    state.level = 1;
    state.xp = 0.0;

    log::info!("{} prestiged to rank {}", skill, state.prestige);
    Ok(state.prestige)
}
