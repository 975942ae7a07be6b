//! Ability lifecycle
//!
//! One generic cooldown/active-window state machine serves every skill's
//! master ability, parameterized by the skill's descriptor. Activation
//! failures are result values; failed calls never mutate anything.

pub mod effects;

use serde::{Deserialize, Serialize};

use crate::data::{DataManager, SkillId};
use crate::error::ActivationError;
use crate::progression::record::{PlayerProgressionRecord, NEVER_USED};

pub use effects::{AbilityEffect, EffectContext, EffectRegistry, EffectScratch, NoopEffect};

/// Where a window currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityPhase {
    Idle,
    Active,
    Paused,
}

/// Ephemeral per-(player, skill) lifecycle state. Not persisted; evicted
/// on disconnect.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityLifecycleState {
    pub phase: AbilityPhase,
    /// Valid only while `Active`
    pub active_start_tick: i64,
    /// Valid only while `Paused`
    pub paused_remaining_ticks: i64,
    /// Per-window effect scratch, opaque to the controller
    pub scratch: EffectScratch,
}

impl Default for AbilityLifecycleState {
    fn default() -> Self {
        Self {
            phase: AbilityPhase::Idle,
            active_start_tick: 0,
            paused_remaining_ticks: 0,
            scratch: EffectScratch::default(),
        }
    }
}

impl AbilityLifecycleState {
    /// Ticks left in the current window, if one is running.
    pub fn remaining_ticks(&self, duration_ticks: i64, now_tick: i64) -> Option<i64> {
        match self.phase {
            AbilityPhase::Active => {
                Some((duration_ticks - (now_tick - self.active_start_tick)).max(0))
            }
            AbilityPhase::Paused => Some(self.paused_remaining_ticks),
            AbilityPhase::Idle => None,
        }
    }
}

/// Outcome of a pause/resume request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseAction {
    Paused { remaining_ticks: i64 },
    Resumed,
}

/// Ticks of cooldown left before the ability can fire again. Zero when
/// ready; the first activation ever bypasses cooldown entirely.
pub fn cooldown_remaining(
    data: &DataManager,
    record: &PlayerProgressionRecord,
    skill: SkillId,
    now_tick: i64,
) -> i64 {
    let last = record.skill(skill).last_ability_use_tick;
    if last == NEVER_USED {
        return 0;
    }
    let cooldown = data.skills.descriptor(skill).ability.cooldown_ticks;
    (cooldown - (now_tick - last)).max(0)
}

/// Try to start the skill's ability window at `now_tick`.
///
/// Checks, in order: level gate (a prestiged skill keeps its unlock),
/// double activation, cooldown. On success the durable
/// `last_ability_use_tick` is stamped and the window opens.
pub fn activate(
    data: &DataManager,
    record: &mut PlayerProgressionRecord,
    lifecycle: &mut AbilityLifecycleState,
    skill: SkillId,
    now_tick: i64,
) -> Result<(), ActivationError> {
    let ability = &data.skills.descriptor(skill).ability;
    let state = record.skill(skill);

    if state.level < ability.unlock_level && state.prestige == 0 {
        return Err(ActivationError::LevelRequirementNotMet {
            required: ability.unlock_level,
            actual: state.level,
        });
    }

    if lifecycle.phase != AbilityPhase::Idle {
        return Err(ActivationError::AlreadyActive);
    }

    if state.last_ability_use_tick != NEVER_USED {
        let elapsed = now_tick - state.last_ability_use_tick;
        if elapsed < ability.cooldown_ticks {
            return Err(ActivationError::OnCooldown {
                remaining_ticks: ability.cooldown_ticks - elapsed,
            });
        }
    }

    record.skill_mut(skill).last_ability_use_tick = now_tick;
    lifecycle.phase = AbilityPhase::Active;
    lifecycle.active_start_tick = now_tick;
    lifecycle.paused_remaining_ticks = 0;
    lifecycle.scratch = EffectScratch::default();

    log::debug!("{} ability activated at tick {}", skill, now_tick);
    Ok(())
}

/// Pause a running window, or resume a paused one. Resuming rebuilds a
/// synthetic start tick so total active time equals the configured
/// duration; cooldown is not re-checked on resume.
pub fn pause_or_resume(
    data: &DataManager,
    lifecycle: &mut AbilityLifecycleState,
    skill: SkillId,
    now_tick: i64,
) -> Result<PauseAction, ActivationError> {
    let ability = &data.skills.descriptor(skill).ability;
    if !ability.pausable {
        return Err(ActivationError::NotPausable);
    }

    match lifecycle.phase {
        AbilityPhase::Active => {
            let remaining = ability.duration_ticks - (now_tick - lifecycle.active_start_tick);
            if remaining <= 0 {
                // Window already elapsed; the next tick will expire it
                return Err(ActivationError::NothingToResume);
            }
            lifecycle.phase = AbilityPhase::Paused;
            lifecycle.paused_remaining_ticks = remaining;
            Ok(PauseAction::Paused {
                remaining_ticks: remaining,
            })
        }
        AbilityPhase::Paused if lifecycle.paused_remaining_ticks > 0 => {
            let remaining = lifecycle.paused_remaining_ticks;
            lifecycle.active_start_tick = now_tick - (ability.duration_ticks - remaining);
            lifecycle.phase = AbilityPhase::Active;
            lifecycle.paused_remaining_ticks = 0;
            Ok(PauseAction::Resumed)
        }
        _ => Err(ActivationError::NothingToResume),
    }
}

/// Advance the window at `now_tick`. Returns true when the window just
/// expired (the caller emits the ability-end event and runs the effect's
/// `on_end`). No-op unless `Active`.
pub fn tick(
    data: &DataManager,
    lifecycle: &mut AbilityLifecycleState,
    skill: SkillId,
    now_tick: i64,
) -> bool {
    if lifecycle.phase != AbilityPhase::Active {
        return false;
    }
    let duration = data.skills.descriptor(skill).ability.duration_ticks;
    if now_tick - lifecycle.active_start_tick >= duration {
        lifecycle.phase = AbilityPhase::Idle;
        lifecycle.paused_remaining_ticks = 0;
        return true;
    }
    false
}
