//! Pluggable ability effects
//!
//! What actually happens while a window is active (periodic healing,
//! area scans, damage bonuses) is the host's business. Effects register
//! here per skill; the lifecycle controller stays effect-agnostic.

use std::collections::HashMap;

use crate::data::SkillId;
use crate::progression::record::PlayerId;

/// Transient per-window scratch data, owned by the lifecycle state but
/// opaque to the controller. Area-fill effects remember their first
/// corner here; incremental scans keep their resume cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectScratch {
    /// First corner of an area selection, if one has been placed
    pub first_corner: Option<(i32, i32, i32)>,
    /// Where an incremental scan resumes next tick
    pub cursor: u64,
}

/// Everything an effect callback may look at or touch.
pub struct EffectContext<'a> {
    pub player: &'a PlayerId,
    pub skill: SkillId,
    pub now_tick: i64,
    pub scratch: &'a mut EffectScratch,
    /// Maximum units of work this tick; unfinished work resumes via the
    /// scratch cursor on the next tick
    pub work_budget: u32,
}

/// Per-skill ability behavior while a window runs.
///
/// `on_tick` must respect `work_budget` and park leftover work in the
/// scratch cursor rather than finishing unboundedly in one step.
pub trait AbilityEffect: Send + Sync {
    fn on_start(&self, _ctx: &mut EffectContext<'_>) {}
    fn on_tick(&self, _ctx: &mut EffectContext<'_>) {}
    fn on_end(&self, _ctx: &mut EffectContext<'_>) {}
}

/// Effect that does nothing. Skills without a registered effect behave
/// as pure buff windows.
#[derive(Debug, Default)]
pub struct NoopEffect;

impl AbilityEffect for NoopEffect {}

/// Registry of effect strategies, keyed by skill.
#[derive(Default)]
pub struct EffectRegistry {
    effects: HashMap<SkillId, Box<dyn AbilityEffect>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: SkillId, effect: Box<dyn AbilityEffect>) {
        self.effects.insert(skill, effect);
    }

    pub fn get(&self, skill: SkillId) -> Option<&dyn AbilityEffect> {
        self.effects.get(&skill).map(|e| e.as_ref())
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("skills", &self.effects.keys().collect::<Vec<_>>())
            .finish()
    }
}
