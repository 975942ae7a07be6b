//! Outbound progression events
//!
//! The engine reports transitions through an `EventSink`; notification,
//! sync and sound layers live on the other side of the trait and are
//! none of the engine's business.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::data::{ChallengeKind, SkillId};
use crate::progression::record::PlayerId;

/// Everything the engine announces to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    LevelUp {
        skill: SkillId,
        old_level: u32,
        new_level: u32,
    },
    MilestoneReached {
        skill: SkillId,
        level: u32,
    },
    Prestige {
        skill: SkillId,
        new_rank: u32,
    },
    AbilityStarted {
        skill: SkillId,
    },
    AbilityEnded {
        skill: SkillId,
    },
    ChallengeCompleted {
        kind: ChallengeKind,
    },
    AllChallengesCompleted,
    AchievementGranted {
        id: String,
    },
}

/// Consumer of outbound events.
pub trait EventSink: Send + Sync {
    fn emit(&self, player: &PlayerId, event: ProgressionEvent);
}

/// Sink that logs every event. Used by the demo driver.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, player: &PlayerId, event: ProgressionEvent) {
        log::info!("[{}] {:?}", player, event);
    }
}

/// Buffering sink for tests and polling hosts.
#[derive(Debug, Default)]
pub struct EventBuffer {
    events: Mutex<Vec<(PlayerId, ProgressionEvent)>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything buffered so far.
    pub fn drain(&self) -> Vec<(PlayerId, ProgressionEvent)> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventBuffer {
    fn emit(&self, player: &PlayerId, event: ProgressionEvent) {
        self.events.lock().push((player.clone(), event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_buffer_drains() {
        let buffer = EventBuffer::new();
        let player = PlayerId::from("p1");

        buffer.emit(
            &player,
            ProgressionEvent::AbilityStarted {
                skill: SkillId::Mining,
            },
        );
        assert_eq!(buffer.len(), 1);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert!(buffer.is_empty());
        assert_eq!(drained[0].0, player);
    }
}
