//! Daily challenges
//!
//! Deterministic per-player-per-day challenge sets. The generator is
//! seeded from player and date, so identical inputs always reproduce the
//! same set; the cache is shared across players and lock-guarded in case
//! the host parallelizes per-player work.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{ChallengeDefs, ChallengeKind, DataManager, SkillId};
use crate::progression::leveling::{grant_xp, GrantOutcome};
use crate::progression::record::{PlayerId, PlayerProgressionRecord};

/// One challenge in a player's daily set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub kind: ChallengeKind,
    pub target: u64,
    pub related_skill: Option<SkillId>,
    pub progress: u64,
    pub completed: bool,
}

/// A player's set for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerChallengeSet {
    pub date_key: NaiveDate,
    pub challenges: Vec<DailyChallenge>,
    /// Whether the full-set bonus has been paid out (never twice)
    pub bonus_awarded: bool,
}

impl PlayerChallengeSet {
    pub fn all_completed(&self) -> bool {
        !self.challenges.is_empty() && self.challenges.iter().all(|c| c.completed)
    }
}

/// What one progress report changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeOutcome {
    /// Kinds that just completed
    pub completed: Vec<ChallengeKind>,
    /// True when this report finished the whole set (bonus paid now)
    pub set_completed: bool,
    /// Reward XP grants applied, with their leveling outcomes
    pub rewards: Vec<(SkillId, GrantOutcome)>,
}

/// Generator and tracker for daily challenge sets.
#[derive(Debug, Default)]
pub struct DailyChallengeEngine {
    cache: RwLock<HashMap<PlayerId, PlayerChallengeSet>>,
}

impl DailyChallengeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The player's set for `today`, generating (and caching) a fresh one
    /// when none exists or the cached one is from another day.
    pub fn challenge_set(
        &self,
        defs: &ChallengeDefs,
        record: &PlayerProgressionRecord,
        player: &PlayerId,
        today: NaiveDate,
    ) -> PlayerChallengeSet {
        {
            let cache = self.cache.read();
            if let Some(set) = cache.get(player) {
                if set.date_key == today {
                    return set.clone();
                }
            }
        }

        let set = generate_set(defs, record, player, today);
        log::debug!(
            "Generated {} challenges for {} on {}",
            set.challenges.len(),
            player,
            today
        );
        self.cache.write().insert(player.clone(), set.clone());
        set
    }

    /// Report progress of `amount` toward every open challenge of `kind`.
    /// Completion pays the per-challenge reward into the related skill
    /// (subject to normal XP gating); finishing the whole set pays the
    /// full-set bonus once, split across the current selection.
    pub fn record_progress(
        &self,
        data: &DataManager,
        record: &mut PlayerProgressionRecord,
        player: &PlayerId,
        today: NaiveDate,
        kind: ChallengeKind,
        amount: u64,
    ) -> ChallengeOutcome {
        // Make sure today's set exists before mutating it
        self.challenge_set(&data.challenges, record, player, today);

        let mut outcome = ChallengeOutcome::default();
        let mut cache = self.cache.write();
        let set = match cache.get_mut(player) {
            Some(set) => set,
            None => return outcome,
        };

        for challenge in set.challenges.iter_mut() {
            if challenge.completed || challenge.kind != kind {
                continue;
            }
            challenge.progress += amount;
            if challenge.progress >= challenge.target {
                challenge.progress = challenge.target;
                challenge.completed = true;
                outcome.completed.push(challenge.kind);

                if let Some(skill) = challenge.related_skill {
                    let grant =
                        grant_xp(data, record, skill, data.challenges.completion_reward_xp);
                    outcome.rewards.push((skill, grant));
                }
            }
        }

        if set.all_completed() && !set.bonus_awarded {
            set.bonus_awarded = true;
            outcome.set_completed = true;

            let selected = record.selected_skills.clone();
            if !selected.is_empty() {
                let share = data.challenges.full_set_reward_xp / selected.len() as f64;
                for skill in selected {
                    let grant = grant_xp(data, record, skill, share);
                    outcome.rewards.push((skill, grant));
                }
            }
        }

        outcome
    }

    /// Throw away the cached set so the next lookup regenerates it.
    /// Called when the skill selection changes mid-day.
    pub fn force_regenerate(&self, player: &PlayerId) {
        self.cache.write().remove(player);
    }

    /// Drop cached state for a disconnecting player.
    pub fn evict(&self, player: &PlayerId) {
        self.cache.write().remove(player);
    }
}

/// Seed derived from player identity and calendar day only.
fn seed_for(player: &PlayerId, date: NaiveDate) -> u64 {
    let mut hasher = DefaultHasher::new();
    player.0.hash(&mut hasher);
    let player_hash = hasher.finish();

    let mut hasher = DefaultHasher::new();
    date.hash(&mut hasher);
    player_hash.wrapping_add(hasher.finish())
}

fn generate_set(
    defs: &ChallengeDefs,
    record: &PlayerProgressionRecord,
    player: &PlayerId,
    today: NaiveDate,
) -> PlayerChallengeSet {
    let mut rng = StdRng::seed_from_u64(seed_for(player, today));
    let pool = defs.candidate_pool(&record.selected_skills);
    let count = defs.per_day.min(pool.len());

    let mut challenges = Vec::with_capacity(count);
    for index in rand::seq::index::sample(&mut rng, pool.len(), count) {
        let def = pool[index];
        let target = rng.gen_range(def.target_min..=def.target_max);
        challenges.push(DailyChallenge {
            kind: def.kind,
            target,
            related_skill: def.kind.related_skill(),
            progress: 0,
            completed: false,
        });
    }

    PlayerChallengeSet {
        date_key: today,
        challenges,
        bonus_awarded: false,
    }
}
