//! Static engine data
//!
//! Definition tables and tuning loaded once at startup from RON files,
//! with hardcoded defaults as fallback. Constructed-once objects passed
//! by reference into the components that need them; no global lookups.

pub mod challenges;
pub mod loader;
pub mod skills;
pub mod synergies;
pub mod tuning;

pub use challenges::{ChallengeDefs, ChallengeKind, ChallengeTypeDef};
pub use loader::{export_default_data, DataManager};
pub use skills::{level_title, AbilityDef, SkillBehaviorDescriptor, SkillDefs, SkillId, XpCurveDef};
pub use synergies::{SynergyBonusKind, SynergyDefs, SynergyRuleDef};
pub use tuning::{LevelingConfig, PrestigeConfig, TuningDefs};
