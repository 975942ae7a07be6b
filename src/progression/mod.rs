//! Progression core
//!
//! The numeric heart of the engine: records, the XP curve, level
//! resolution and prestige resets.

pub mod leveling;
pub mod prestige;
pub mod record;
pub mod xp;

pub use leveling::{grant_xp, max_level_allowed, GrantOutcome};
pub use prestige::{can_prestige, do_prestige};
pub use record::{
    PlayerId, PlayerProgressionRecord, SkillState, MAX_SELECTED_SKILLS, NEVER_USED,
    RECORD_VERSION,
};
pub use xp::{total_xp_for_level, xp_for_level};
