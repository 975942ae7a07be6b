//! Skillforge - an RPG skill progression engine
//!
//! Players accumulate experience in independent skills, level through a
//! configurable curve, unlock time-gated abilities, and prestige maxed
//! skills for permanent multipliers. Rendering, world triggers and wire
//! formats live on the far side of narrow interfaces.

pub mod abilities;
pub mod achievements;
pub mod challenges;
pub mod clock;
pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod progression;
pub mod store;
pub mod synergy;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock, TICKS_PER_SECOND};
pub use data::{DataManager, SkillId};
pub use engine::ProgressionEngine;
pub use events::{EventBuffer, EventSink, LogSink, ProgressionEvent};
pub use progression::{PlayerId, PlayerProgressionRecord};
pub use store::{InMemoryAdapter, JsonFileAdapter, ProgressionStore};
