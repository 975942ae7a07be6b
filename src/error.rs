//! Error taxonomy
//!
//! Gating failures (activation, prestige) are ordinary result values
//! returned to the caller. Only configuration and persistence problems
//! surface as errors that propagate upward.

use thiserror::Error;

use crate::data::skills::SkillId;

/// Rejected configuration, caught at load time before the engine runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("xp curve for {skill:?} has non-positive base {base}")]
    NonPositiveCurveBase { skill: Option<SkillId>, base: f64 },

    #[error("xp curve for {skill:?} has negative coefficient {value}")]
    NegativeCurveCoefficient { skill: Option<SkillId>, value: f64 },

    #[error("hard level cap must be at least 1")]
    ZeroLevelCap,

    #[error("no behavior descriptor for {skill:?}")]
    MissingSkillDescriptor { skill: SkillId },

    #[error("ability for {skill:?} has non-positive {field} ({value})")]
    InvalidAbilityTiming {
        skill: SkillId,
        field: &'static str,
        value: i64,
    },

    #[error("synergy rule '{id}' pairs {skill:?} with itself")]
    DegenerateSynergyRule { id: String, skill: SkillId },

    #[error("challenge type {index} has empty target range {min}..{max}")]
    EmptyChallengeRange { index: usize, min: u64, max: u64 },

    #[error("challenges per day must be at least 1")]
    ZeroChallengesPerDay,
}

/// Persistence adapter failure. The in-memory record is retained when a
/// save fails, so no progress is lost for the running session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Why an ability activation (or pause/resume request) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("requires level {required}, currently {actual}")]
    LevelRequirementNotMet { required: u32, actual: u32 },

    #[error("ability is already active")]
    AlreadyActive,

    #[error("on cooldown for {remaining_ticks} more ticks")]
    OnCooldown { remaining_ticks: i64 },

    #[error("ability does not support pause")]
    NotPausable,

    #[error("no active or paused window to toggle")]
    NothingToResume,
}

/// Why a prestige request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrestigeError {
    #[error("requires level {required}, currently {actual}")]
    LevelTooLow { required: u32, actual: u32 },

    #[error("already at maximum prestige rank {max}")]
    RankCapReached { max: u32 },
}
