//! Progression store
//!
//! Owns the in-memory record set and writes through to the persistence
//! adapter after every durable mutation. Single-writer-per-player
//! semantics: the host never mutates one player concurrently, the map
//! itself is lock-guarded for parallel hosts.

pub mod legacy;
pub mod persist;

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::progression::record::{PlayerId, PlayerProgressionRecord};

pub use legacy::{migrate, LegacyData, LegacyPlayerEntry, LegacySkillEntry};
pub use persist::{InMemoryAdapter, JsonFileAdapter, PersistenceAdapter};

/// Record store with write-through persistence and one-shot legacy
/// migration on first contact.
pub struct ProgressionStore {
    adapter: Box<dyn PersistenceAdapter>,
    records: RwLock<HashMap<PlayerId, PlayerProgressionRecord>>,
    legacy: Option<LegacyData>,
}

impl ProgressionStore {
    pub fn new(adapter: Box<dyn PersistenceAdapter>) -> Self {
        Self {
            adapter,
            records: RwLock::new(HashMap::new()),
            legacy: None,
        }
    }

    /// Attach a legacy blob to migrate players from on first contact.
    pub fn with_legacy(mut self, legacy: LegacyData) -> Self {
        self.legacy = Some(legacy);
        self
    }

    /// Load (or create) the player's record into the in-memory map.
    /// Legacy migration runs here, exactly once, and only when the
    /// current-format record shows no progress.
    fn ensure_loaded(&self, player: &PlayerId) {
        if self.records.read().contains_key(player) {
            return;
        }

        let mut record = match self.adapter.load(player) {
            Ok(Some(mut existing)) => {
                existing.ensure_all_skills();
                existing
            }
            Ok(None) => PlayerProgressionRecord::new(),
            Err(e) => {
                log::warn!("Failed to load record for {}: {}; starting fresh", player, e);
                PlayerProgressionRecord::new()
            }
        };

        if let Some(legacy) = &self.legacy {
            if let Some(entry) = legacy.get(&player.0) {
                if migrate(&mut record, entry) {
                    log::info!("Migrated legacy progression for {}", player);
                    if let Err(e) = self.adapter.save(player, &record) {
                        log::warn!("Failed to persist migrated record for {}: {}", player, e);
                    }
                }
            }
        }

        self.records.write().entry(player.clone()).or_insert(record);
    }

    /// Read access to the player's record, creating it on first contact.
    pub fn read<R>(&self, player: &PlayerId, f: impl FnOnce(&PlayerProgressionRecord) -> R) -> R {
        self.ensure_loaded(player);
        let records = self.records.read();
        f(&records[player])
    }

    /// Read-modify-write on the owning thread, then write through to the
    /// adapter. On save failure the mutation is retained in memory (no
    /// session progress is lost) and the error is handed back alongside
    /// the closure's result.
    pub fn update<R>(
        &self,
        player: &PlayerId,
        f: impl FnOnce(&mut PlayerProgressionRecord) -> R,
    ) -> (R, Result<(), StoreError>) {
        self.ensure_loaded(player);

        let mut records = self.records.write();
        let record = records
            .entry(player.clone())
            .or_insert_with(PlayerProgressionRecord::new);
        let value = f(record);
        let persisted = self.adapter.save(player, record);
        if let Err(e) = &persisted {
            log::warn!("Failed to save record for {}: {}", player, e);
        }
        (value, persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SkillId;

    #[test]
    fn test_first_contact_creates_zeroed_record() {
        let store = ProgressionStore::new(Box::new(InMemoryAdapter::new()));
        let player = PlayerId::from("p1");

        let level = store.read(&player, |r| r.skill(SkillId::Mining).level);
        assert_eq!(level, 0);
    }

    #[test]
    fn test_update_writes_through() {
        let store = ProgressionStore::new(Box::new(InMemoryAdapter::new()));
        let player = PlayerId::from("p1");

        let (_, persisted) = store.update(&player, |r| {
            r.skill_mut(SkillId::Mining).level = 12;
        });
        assert!(persisted.is_ok());

        // A fresh store over the same adapter would see it, and the
        // in-memory copy agrees
        let level = store.read(&player, |r| r.skill(SkillId::Mining).level);
        assert_eq!(level, 12);
    }

    #[test]
    fn test_legacy_migration_runs_once_on_first_contact() {
        let legacy: LegacyData = serde_json::from_str(
            r#"{"steve": {"skills": {"Mining": {"level": 30, "xp": 5.0}}, "selectedSkills": ["Mining"]}}"#,
        )
        .unwrap();

        let store =
            ProgressionStore::new(Box::new(InMemoryAdapter::new())).with_legacy(legacy);
        let player = PlayerId::from("steve");

        let level = store.read(&player, |r| r.skill(SkillId::Mining).level);
        assert_eq!(level, 30);
        assert!(store.read(&player, |r| r.is_selected(SkillId::Mining)));
    }

    #[test]
    fn test_legacy_migration_skipped_over_existing_progress() {
        let adapter = InMemoryAdapter::new();
        let player = PlayerId::from("steve");

        // Current-format progress already exists
        let mut existing = PlayerProgressionRecord::new();
        existing.skill_mut(SkillId::Combat).level = 2;
        adapter.save(&player, &existing).unwrap();

        let legacy: LegacyData = serde_json::from_str(
            r#"{"steve": {"skills": {"Mining": {"level": 30, "xp": 5.0}}}}"#,
        )
        .unwrap();

        let store = ProgressionStore::new(Box::new(adapter)).with_legacy(legacy);
        assert_eq!(store.read(&player, |r| r.skill(SkillId::Mining).level), 0);
        assert_eq!(store.read(&player, |r| r.skill(SkillId::Combat).level), 2);
    }
}
