//! Skillforge - Demo Driver
//!
//! Headless host loop: builds the engine with default data, simulates a
//! player grinding skills at the reference tick rate, and logs the
//! events the engine emits. Stands in for the game-engine integration.

use std::sync::Arc;

use anyhow::Result;

use skillforge::clock::{SystemClock, TICKS_PER_SECOND};
use skillforge::data::{level_title, DataManager, SkillId};
use skillforge::engine::ProgressionEngine;
use skillforge::events::LogSink;
use skillforge::store::{JsonFileAdapter, ProgressionStore};
use skillforge::{Clock, PlayerId};

/// Simulated seconds of play
const SIMULATED_SECONDS: i64 = 300;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Skillforge demo v{}", env!("CARGO_PKG_VERSION"));

    let data = DataManager::new()?;
    let store = ProgressionStore::new(Box::new(JsonFileAdapter::new(
        JsonFileAdapter::default_dir(),
    )));
    let clock = Arc::new(SystemClock::new());
    let engine = ProgressionEngine::new(data, store, clock.clone(), Arc::new(LogSink));

    run_simulation(&engine, &clock);

    log::info!("Skillforge demo finished");
    Ok(())
}

/// Fixed-rate host loop at the reference cadence.
fn run_simulation(engine: &ProgressionEngine, clock: &SystemClock) {
    let player = PlayerId::from("demo-player");

    engine.select_skill(&player, SkillId::Mining);
    engine.select_skill(&player, SkillId::Woodcutting);
    engine.select_skill(&player, SkillId::Fishing);
    engine.set_paragon(&player, Some(SkillId::Mining));

    for challenge in engine.challenge_set(&player).challenges {
        log::info!(
            "Today's challenge: {} (target {})",
            challenge.kind.describe(),
            challenge.target
        );
    }

    for second in 0..SIMULATED_SECONDS {
        for _ in 0..TICKS_PER_SECOND {
            clock.advance();
        }
        let now = clock.now_tick();

        // World-interaction stand-ins: steady gathering XP
        let _ = engine.grant_xp(&player, SkillId::Mining, 35.0, "block_break");
        let _ = engine.grant_xp(&player, SkillId::Woodcutting, 25.0, "tree_felled");
        if second % 5 == 0 {
            let _ = engine.grant_xp(&player, SkillId::Fishing, 60.0, "fish_caught");
        }

        // Mash the ability key now and then; rejections are ordinary
        if second % 30 == 0 {
            match engine.activate_ability(&player, SkillId::Mining) {
                Ok(()) => {}
                Err(e) => log::debug!("Mining ability not available: {}", e),
            }
        }

        // Ability expiry runs at the reference cadence of once a second
        for skill in SkillId::ALL {
            engine.tick(&player, skill, now);
        }
    }

    engine.with_record(&player, |record| {
        for skill in SkillId::ALL {
            let state = record.skill(skill);
            if state.level > 0 {
                log::info!(
                    "{}: level {} {} ({} xp banked, prestige {})",
                    skill,
                    state.level,
                    level_title(state.level),
                    state.xp,
                    state.prestige
                );
            }
        }
    });

    let set = engine.challenge_set(&player);
    let done = set.challenges.iter().filter(|c| c.completed).count();
    log::info!("Challenges completed today: {}/{}", done, set.challenges.len());

    engine.evict(&player);
}
