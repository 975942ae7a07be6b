//! Engine facade
//!
//! Wires the clock, data, store, caches and event sink behind the entry
//! points the host calls. Per-player record mutation stays on the host's
//! simulation thread; the two cross-player caches (ability lifecycles,
//! daily challenges) are lock-guarded so a parallelized host cannot
//! corrupt them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::abilities::{
    self, AbilityEffect, AbilityLifecycleState, AbilityPhase, EffectContext, EffectRegistry,
    PauseAction,
};
use crate::achievements::{self, counters};
use crate::challenges::{DailyChallengeEngine, PlayerChallengeSet};
use crate::clock::Clock;
use crate::data::{ChallengeKind, DataManager, SkillId, SynergyBonusKind};
use crate::error::{ActivationError, PrestigeError, StoreError};
use crate::events::{EventSink, ProgressionEvent};
use crate::progression::leveling::{self, GrantOutcome};
use crate::progression::prestige;
use crate::progression::record::{PlayerId, PlayerProgressionRecord};
use crate::store::ProgressionStore;
use crate::synergy::SynergyEvaluator;

/// Units of effect work allowed per tick before a scan must park and
/// resume on the next tick.
pub const DEFAULT_EFFECT_WORK_BUDGET: u32 = 64;

type LifecycleKey = (PlayerId, SkillId);

/// The host-facing progression engine.
pub struct ProgressionEngine {
    data: DataManager,
    store: ProgressionStore,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    effects: EffectRegistry,
    lifecycles: RwLock<HashMap<LifecycleKey, AbilityLifecycleState>>,
    challenges: DailyChallengeEngine,
    effect_work_budget: u32,
}

impl ProgressionEngine {
    pub fn new(
        data: DataManager,
        store: ProgressionStore,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            data,
            store,
            clock,
            sink,
            effects: EffectRegistry::new(),
            lifecycles: RwLock::new(HashMap::new()),
            challenges: DailyChallengeEngine::new(),
            effect_work_budget: DEFAULT_EFFECT_WORK_BUDGET,
        }
    }

    /// Install the host's effect strategy for a skill's ability.
    pub fn register_effect(&mut self, skill: SkillId, effect: Box<dyn AbilityEffect>) {
        self.effects.register(skill, effect);
    }

    pub fn data(&self) -> &DataManager {
        &self.data
    }

    /// Read-only view of a player's record (created on first contact).
    pub fn with_record<R>(
        &self,
        player: &PlayerId,
        f: impl FnOnce(&PlayerProgressionRecord) -> R,
    ) -> R {
        self.store.read(player, f)
    }

    // ------------------------------------------------------------------
    // XP and leveling
    // ------------------------------------------------------------------

    /// Apply an XP grant from an external source. Gating (no selection,
    /// unselected skill, capped skill) yields a no-change outcome, not an
    /// error; only a persistence failure is an `Err`, and the in-memory
    /// record keeps the progress either way.
    pub fn grant_xp(
        &self,
        player: &PlayerId,
        skill: SkillId,
        amount: f64,
        source: &str,
    ) -> Result<GrantOutcome, StoreError> {
        let ((outcome, events), persisted) = self.store.update(player, |record| {
            let outcome = leveling::grant_xp(&self.data, record, skill, amount);
            let mut events = Vec::new();

            if outcome.applied_xp > 0.0 {
                log::debug!(
                    "{} gained {} xp in {} from {}",
                    player,
                    outcome.applied_xp,
                    skill,
                    source
                );
                self.collect_achievements(
                    record,
                    counters::XP_EARNED,
                    outcome.applied_xp as u64,
                    &mut events,
                );
            }

            self.collect_level_events(&outcome, skill, record, &mut events);

            if outcome.applied_xp > 0.0 {
                let applied = outcome.applied_xp as u64;
                self.apply_challenge_progress(
                    record,
                    player,
                    ChallengeKind::GainXp(skill),
                    applied,
                    &mut events,
                );
                self.apply_challenge_progress(
                    record,
                    player,
                    ChallengeKind::GainAnyXp,
                    applied,
                    &mut events,
                );
            }
            if outcome.leveled_up {
                let levels = (outcome.new_level - outcome.old_level) as u64;
                self.apply_challenge_progress(
                    record,
                    player,
                    ChallengeKind::EarnLevels,
                    levels,
                    &mut events,
                );
            }

            (outcome, events)
        });

        self.emit_all(player, events);
        persisted?;
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Abilities
    // ------------------------------------------------------------------

    /// Key-press entry point: try to start the skill's ability now.
    pub fn activate_ability(
        &self,
        player: &PlayerId,
        skill: SkillId,
    ) -> Result<(), ActivationError> {
        let now = self.clock.now_tick();
        let mut lifecycles = self.lifecycles.write();
        let lifecycle = lifecycles
            .entry((player.clone(), skill))
            .or_default();

        // Reborrow so the lifecycle stays usable for the effect hook below
        let lc = &mut *lifecycle;
        let ((result, mut events), _persisted) = self.store.update(player, |record| {
            let result = abilities::activate(&self.data, record, lc, skill, now);
            let mut events = Vec::new();
            if result.is_ok() {
                self.collect_achievements(record, counters::ABILITIES_USED, 1, &mut events);
                self.apply_challenge_progress(
                    record,
                    player,
                    ChallengeKind::UseAbility(skill),
                    1,
                    &mut events,
                );
                self.apply_challenge_progress(
                    record,
                    player,
                    ChallengeKind::UseAnyAbility,
                    1,
                    &mut events,
                );
            }
            (result, events)
        });

        if result.is_ok() {
            if let Some(effect) = self.effects.get(skill) {
                let mut ctx = EffectContext {
                    player,
                    skill,
                    now_tick: now,
                    scratch: &mut lifecycle.scratch,
                    work_budget: self.effect_work_budget,
                };
                effect.on_start(&mut ctx);
            }
            events.insert(0, ProgressionEvent::AbilityStarted { skill });
        }

        drop(lifecycles);
        self.emit_all(player, events);
        result
    }

    /// Pause a running window or resume a paused one.
    pub fn pause_or_resume_ability(
        &self,
        player: &PlayerId,
        skill: SkillId,
    ) -> Result<PauseAction, ActivationError> {
        let now = self.clock.now_tick();
        let mut lifecycles = self.lifecycles.write();
        let lifecycle = lifecycles
            .get_mut(&(player.clone(), skill))
            .ok_or(ActivationError::NothingToResume)?;
        abilities::pause_or_resume(&self.data, lifecycle, skill, now)
    }

    /// Fixed-cadence driver entry point: run the active effect (within
    /// its work budget) and expire the window when its time is up.
    pub fn tick(&self, player: &PlayerId, skill: SkillId, now_tick: i64) {
        let mut ended = false;
        {
            let mut lifecycles = self.lifecycles.write();
            let Some(lifecycle) = lifecycles.get_mut(&(player.clone(), skill)) else {
                return;
            };
            if lifecycle.phase != AbilityPhase::Active {
                return;
            }

            if let Some(effect) = self.effects.get(skill) {
                let mut ctx = EffectContext {
                    player,
                    skill,
                    now_tick,
                    scratch: &mut lifecycle.scratch,
                    work_budget: self.effect_work_budget,
                };
                effect.on_tick(&mut ctx);
            }

            if abilities::tick(&self.data, lifecycle, skill, now_tick) {
                ended = true;
                if let Some(effect) = self.effects.get(skill) {
                    let mut ctx = EffectContext {
                        player,
                        skill,
                        now_tick,
                        scratch: &mut lifecycle.scratch,
                        work_budget: self.effect_work_budget,
                    };
                    effect.on_end(&mut ctx);
                }
            }
        }

        if ended {
            self.sink
                .emit(player, ProgressionEvent::AbilityEnded { skill });
        }
    }

    /// Current lifecycle snapshot, if the player has one for this skill.
    pub fn ability_state(
        &self,
        player: &PlayerId,
        skill: SkillId,
    ) -> Option<AbilityLifecycleState> {
        self.lifecycles
            .read()
            .get(&(player.clone(), skill))
            .cloned()
    }

    // ------------------------------------------------------------------
    // Prestige
    // ------------------------------------------------------------------

    /// Reset a capped skill for a permanent rank bonus.
    pub fn prestige(&self, player: &PlayerId, skill: SkillId) -> Result<u32, PrestigeError> {
        let ((result, events), _persisted) = self.store.update(player, |record| {
            match prestige::do_prestige(&self.data, record, skill) {
                Ok(rank) => {
                    let mut events = vec![ProgressionEvent::Prestige {
                        skill,
                        new_rank: rank,
                    }];
                    self.collect_achievements(record, counters::PRESTIGES, 1, &mut events);
                    (Ok(rank), events)
                }
                Err(e) => (Err(e), Vec::new()),
            }
        });

        self.emit_all(player, events);
        result
    }

    /// Prestige- and synergy-scaled passive multiplier for external
    /// attribute calculators.
    pub fn passive_multiplier(&self, player: &PlayerId, skill: SkillId) -> f64 {
        self.store.read(player, |record| {
            let base = self
                .data
                .tuning
                .prestige
                .passive_multiplier(record.skill(skill).prestige);
            SynergyEvaluator::new(&self.data.synergies).apply_bonus(
                base,
                &record.selected_skills,
                SynergyBonusKind::PassiveYield,
            )
        })
    }

    // ------------------------------------------------------------------
    // Selection, paragon, toggles
    // ------------------------------------------------------------------

    /// Add a skill to the player's selection. A change discards the
    /// cached daily challenge set so new draws reflect the selection.
    pub fn select_skill(&self, player: &PlayerId, skill: SkillId) -> bool {
        let (changed, _persisted) = self.store.update(player, |r| r.select_skill(skill));
        if changed {
            self.challenges.force_regenerate(player);
        }
        changed
    }

    pub fn deselect_skill(&self, player: &PlayerId, skill: SkillId) -> bool {
        let (changed, _persisted) = self.store.update(player, |r| r.deselect_skill(skill));
        if changed {
            self.challenges.force_regenerate(player);
        }
        changed
    }

    pub fn set_paragon(&self, player: &PlayerId, skill: Option<SkillId>) {
        let (_, _persisted) = self.store.update(player, |r| r.set_paragon(skill));
    }

    pub fn set_toggle(&self, player: &PlayerId, key: &str, value: bool) {
        let (_, _persisted) = self.store.update(player, |r| r.set_toggle(key, value));
    }

    // ------------------------------------------------------------------
    // Daily challenges
    // ------------------------------------------------------------------

    /// The player's challenge set for today, generating it if needed.
    pub fn challenge_set(&self, player: &PlayerId) -> PlayerChallengeSet {
        let today = self.clock.today();
        self.store.read(player, |record| {
            self.challenges
                .challenge_set(&self.data.challenges, record, player, today)
        })
    }

    /// External progress report (world-interaction layers call this for
    /// signals the engine cannot observe itself).
    pub fn challenge_progress(&self, player: &PlayerId, kind: ChallengeKind, amount: u64) {
        let (events, _persisted) = self.store.update(player, |record| {
            let mut events = Vec::new();
            self.apply_challenge_progress(record, player, kind, amount, &mut events);
            events
        });
        self.emit_all(player, events);
    }

    /// Drop ephemeral state for a disconnecting player. The durable
    /// record stays persisted.
    pub fn evict(&self, player: &PlayerId) {
        self.lifecycles.write().retain(|(p, _), _| p != player);
        self.challenges.evict(player);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn emit_all(&self, player: &PlayerId, events: Vec<ProgressionEvent>) {
        for event in events {
            self.sink.emit(player, event);
        }
    }

    fn collect_achievements(
        &self,
        record: &mut PlayerProgressionRecord,
        key: &str,
        amount: u64,
        events: &mut Vec<ProgressionEvent>,
    ) {
        for def in achievements::increment_and_check(record, key, amount) {
            events.push(ProgressionEvent::AchievementGranted {
                id: def.id.to_string(),
            });
        }
    }

    fn collect_level_events(
        &self,
        outcome: &GrantOutcome,
        skill: SkillId,
        record: &mut PlayerProgressionRecord,
        events: &mut Vec<ProgressionEvent>,
    ) {
        if !outcome.leveled_up {
            return;
        }
        events.push(ProgressionEvent::LevelUp {
            skill,
            old_level: outcome.old_level,
            new_level: outcome.new_level,
        });
        for level in &outcome.milestones {
            events.push(ProgressionEvent::MilestoneReached {
                skill,
                level: *level,
            });
        }
        let levels = (outcome.new_level - outcome.old_level) as u64;
        self.collect_achievements(record, counters::LEVELS_GAINED, levels, events);
    }

    fn apply_challenge_progress(
        &self,
        record: &mut PlayerProgressionRecord,
        player: &PlayerId,
        kind: ChallengeKind,
        amount: u64,
        events: &mut Vec<ProgressionEvent>,
    ) {
        let today = self.clock.today();
        let outcome = self
            .challenges
            .record_progress(&self.data, record, player, today, kind, amount);

        for kind in &outcome.completed {
            events.push(ProgressionEvent::ChallengeCompleted { kind: *kind });
        }
        if !outcome.completed.is_empty() {
            self.collect_achievements(
                record,
                counters::CHALLENGES_COMPLETED,
                outcome.completed.len() as u64,
                events,
            );
        }
        if outcome.set_completed {
            events.push(ProgressionEvent::AllChallengesCompleted);
        }
        // Reward grants resolve leveling like any other XP
        for (skill, grant) in &outcome.rewards {
            self.collect_level_events(grant, *skill, record, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::EventBuffer;
    use crate::store::InMemoryAdapter;

    fn build() -> (ProgressionEngine, Arc<ManualClock>, Arc<EventBuffer>) {
        let clock = Arc::new(ManualClock::default());
        let buffer = Arc::new(EventBuffer::new());
        let engine = ProgressionEngine::new(
            DataManager::default(),
            ProgressionStore::new(Box::new(InMemoryAdapter::new())),
            clock.clone(),
            buffer.clone(),
        );
        (engine, clock, buffer)
    }

    fn events_of(buffer: &EventBuffer) -> Vec<ProgressionEvent> {
        buffer.drain().into_iter().map(|(_, e)| e).collect()
    }

    #[test]
    fn test_grant_flow_emits_level_up_and_feeds_counters() {
        let (engine, _, buffer) = build();
        let player = PlayerId::from("p1");
        engine.select_skill(&player, SkillId::Mining);

        let outcome = engine
            .grant_xp(&player, SkillId::Mining, 70.0, "block_break")
            .unwrap();
        assert_eq!(outcome.new_level, 1);

        let events = events_of(&buffer);
        assert!(events.contains(&ProgressionEvent::LevelUp {
            skill: SkillId::Mining,
            old_level: 0,
            new_level: 1
        }));
        assert!(events.contains(&ProgressionEvent::AchievementGranted {
            id: "first_steps".to_string()
        }));

        engine.with_record(&player, |r| {
            assert_eq!(r.achievement_counters[counters::LEVELS_GAINED], 1);
            assert_eq!(r.achievement_counters[counters::XP_EARNED], 70);
        });
    }

    #[test]
    fn test_grant_to_unselected_skill_emits_nothing() {
        let (engine, _, buffer) = build();
        let player = PlayerId::from("p1");

        let outcome = engine
            .grant_xp(&player, SkillId::Mining, 500.0, "test")
            .unwrap();
        assert!(!outcome.leveled_up);
        assert!(events_of(&buffer).is_empty());
    }

    #[test]
    fn test_ability_round_trip_with_tick_expiry() {
        let (engine, clock, buffer) = build();
        let player = PlayerId::from("p1");
        engine.select_skill(&player, SkillId::Mining);

        let unlock = engine.data().skills.descriptor(SkillId::Mining).ability.unlock_level;
        let (_, _) = engine.store.update(&player, |r| {
            r.skill_mut(SkillId::Mining).level = unlock;
        });

        clock.set_tick(1000);
        engine.activate_ability(&player, SkillId::Mining).unwrap();

        let events = events_of(&buffer);
        assert!(events.contains(&ProgressionEvent::AbilityStarted {
            skill: SkillId::Mining
        }));

        // Double activation is rejected without mutation
        clock.set_tick(1001);
        assert_eq!(
            engine.activate_ability(&player, SkillId::Mining),
            Err(ActivationError::AlreadyActive)
        );

        // Expire the window via the tick driver
        let duration = engine.data().skills.descriptor(SkillId::Mining).ability.duration_ticks;
        engine.tick(&player, SkillId::Mining, 1000 + duration);

        let events = events_of(&buffer);
        assert!(events.contains(&ProgressionEvent::AbilityEnded {
            skill: SkillId::Mining
        }));
        assert_eq!(
            engine.ability_state(&player, SkillId::Mining).unwrap().phase,
            AbilityPhase::Idle
        );
    }

    #[test]
    fn test_selection_change_regenerates_challenges() {
        let (engine, _, _) = build();
        let player = PlayerId::from("p1");

        engine.select_skill(&player, SkillId::Mining);
        let first = engine.challenge_set(&player);

        engine.select_skill(&player, SkillId::Combat);
        let second = engine.challenge_set(&player);

        // Regenerated from the widened pool: progress reset and every
        // skill-bound draw respects the new selection
        assert!(second.challenges.iter().all(|c| c.progress == 0));
        for challenge in &second.challenges {
            if let Some(skill) = challenge.related_skill {
                assert!(engine.with_record(&player, |r| r.is_selected(skill)));
            }
        }
        // Same day, so a repeat lookup is stable
        assert_eq!(engine.challenge_set(&player), second);
        let _ = first;
    }

    #[test]
    fn test_prestige_emits_event_and_counts() {
        let (engine, _, buffer) = build();
        let player = PlayerId::from("p1");

        let (_, _) = engine.store.update(&player, |r| {
            r.set_paragon(Some(SkillId::Combat));
            r.skill_mut(SkillId::Combat).level = 100;
        });

        let rank = engine.prestige(&player, SkillId::Combat).unwrap();
        assert_eq!(rank, 1);
        assert_eq!(
            engine.prestige(&player, SkillId::Combat),
            Err(PrestigeError::LevelTooLow {
                required: 100,
                actual: 1
            })
        );

        let events = events_of(&buffer);
        assert!(events.contains(&ProgressionEvent::Prestige {
            skill: SkillId::Combat,
            new_rank: 1
        }));
        assert!(events.contains(&ProgressionEvent::AchievementGranted {
            id: "reborn".to_string()
        }));
    }

    #[test]
    fn test_passive_multiplier_combines_prestige_and_synergy() {
        let (engine, _, _) = build();
        let player = PlayerId::from("p1");

        engine.select_skill(&player, SkillId::Combat);
        engine.select_skill(&player, SkillId::Archery);
        let (_, _) = engine.store.update(&player, |r| {
            r.skill_mut(SkillId::Combat).prestige = 2;
        });

        // (1 + 2 * 0.02) * (1 + 0.05) from Warrior's Focus
        let multiplier = engine.passive_multiplier(&player, SkillId::Combat);
        assert!((multiplier - 1.04 * 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_evict_drops_ephemeral_state_only() {
        let (engine, clock, _) = build();
        let player = PlayerId::from("p1");
        engine.select_skill(&player, SkillId::Mining);

        let unlock = engine.data().skills.descriptor(SkillId::Mining).ability.unlock_level;
        let (_, _) = engine.store.update(&player, |r| {
            r.skill_mut(SkillId::Mining).level = unlock;
        });
        clock.set_tick(10);
        engine.activate_ability(&player, SkillId::Mining).unwrap();
        assert!(engine.ability_state(&player, SkillId::Mining).is_some());

        engine.evict(&player);
        assert!(engine.ability_state(&player, SkillId::Mining).is_none());
        // Durable progress survives eviction
        assert!(engine.with_record(&player, |r| r.is_selected(SkillId::Mining)));
    }
}
