//! Achievements
//!
//! Monotonic counters with one-time threshold grants. A grant fires only
//! when an increment crosses its threshold (old < threshold ≤ new), so
//! sitting above a threshold indefinitely never re-fires it.

use crate::progression::record::PlayerProgressionRecord;

/// Counter keys the engine feeds.
pub mod counters {
    pub const LEVELS_GAINED: &str = "levels_gained";
    pub const XP_EARNED: &str = "xp_earned";
    pub const ABILITIES_USED: &str = "abilities_used";
    pub const CHALLENGES_COMPLETED: &str = "challenges_completed";
    pub const PRESTIGES: &str = "prestiges";
}

/// Achievement definition
#[derive(Debug, Clone)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Counter this achievement watches
    pub counter: &'static str,
    /// Value at which it is granted
    pub threshold: u64,
}

/// Get all achievement definitions
pub fn all_achievements() -> &'static [AchievementDef] {
    use counters::*;

    static TABLE: &[AchievementDef] = &[
        AchievementDef {
            id: "first_steps",
            name: "First Steps",
            description: "Gain your first level",
            counter: LEVELS_GAINED,
            threshold: 1,
        },
        AchievementDef {
            id: "quick_study",
            name: "Quick Study",
            description: "Gain 10 levels",
            counter: LEVELS_GAINED,
            threshold: 10,
        },
        AchievementDef {
            id: "dedicated",
            name: "Dedicated",
            description: "Gain 100 levels",
            counter: LEVELS_GAINED,
            threshold: 100,
        },
        AchievementDef {
            id: "unstoppable",
            name: "Unstoppable",
            description: "Gain 500 levels",
            counter: LEVELS_GAINED,
            threshold: 500,
        },
        AchievementDef {
            id: "grinder",
            name: "Grinder",
            description: "Earn 10,000 XP total",
            counter: XP_EARNED,
            threshold: 10_000,
        },
        AchievementDef {
            id: "million_club",
            name: "Million Club",
            description: "Earn 1,000,000 XP total",
            counter: XP_EARNED,
            threshold: 1_000_000,
        },
        AchievementDef {
            id: "first_spark",
            name: "First Spark",
            description: "Use an ability for the first time",
            counter: ABILITIES_USED,
            threshold: 1,
        },
        AchievementDef {
            id: "practiced_hand",
            name: "Practiced Hand",
            description: "Use abilities 100 times",
            counter: ABILITIES_USED,
            threshold: 100,
        },
        AchievementDef {
            id: "day_one",
            name: "Day One",
            description: "Complete a daily challenge",
            counter: CHALLENGES_COMPLETED,
            threshold: 1,
        },
        AchievementDef {
            id: "habitual",
            name: "Habitual",
            description: "Complete 50 daily challenges",
            counter: CHALLENGES_COMPLETED,
            threshold: 50,
        },
        AchievementDef {
            id: "reborn",
            name: "Reborn",
            description: "Prestige a skill",
            counter: PRESTIGES,
            threshold: 1,
        },
        AchievementDef {
            id: "renaissance",
            name: "Renaissance",
            description: "Prestige 8 times",
            counter: PRESTIGES,
            threshold: 8,
        },
    ];
    TABLE
}

/// Add `amount` to a counter and return the achievements whose threshold
/// this increment crossed. The granted set on the record is updated so
/// listings stay consistent even if a crossing somehow repeats.
pub fn increment_and_check(
    record: &mut PlayerProgressionRecord,
    key: &str,
    amount: u64,
) -> Vec<&'static AchievementDef> {
    if amount == 0 {
        return Vec::new();
    }

    let entry = record
        .achievement_counters
        .entry(key.to_string())
        .or_insert(0);
    let old = *entry;
    let new = old + amount;
    *entry = new;

    let mut crossed = Vec::new();
    for def in all_achievements() {
        if def.counter == key && old < def.threshold && def.threshold <= new {
            if record.achievements.insert(def.id.to_string()) {
                log::info!("Achievement unlocked: {}", def.id);
                crossed.push(def);
            }
        }
    }
    crossed
}
