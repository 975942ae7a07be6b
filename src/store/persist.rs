//! Persistence adapters
//!
//! The store talks to a synchronous key-value interface; storage format
//! is the adapter's concern. Ships with a JSON-file adapter for real use
//! and an in-memory one for tests.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::progression::record::{PlayerId, PlayerProgressionRecord};

/// Synchronous load/save for progression records.
pub trait PersistenceAdapter: Send + Sync {
    fn load(&self, player: &PlayerId) -> Result<Option<PlayerProgressionRecord>, StoreError>;
    fn save(&self, player: &PlayerId, record: &PlayerProgressionRecord) -> Result<(), StoreError>;
}

/// One pretty-printed JSON file per player.
#[derive(Debug, Clone)]
pub struct JsonFileAdapter {
    dir: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Default data directory for the host platform.
    pub fn default_dir() -> PathBuf {
        use directories::ProjectDirs;

        if let Some(proj_dirs) = ProjectDirs::from("com", "skillforge", "Skillforge") {
            let mut path = proj_dirs.data_local_dir().to_path_buf();
            path.push("progression");
            path
        } else {
            PathBuf::from("./progression")
        }
    }

    fn path_for(&self, player: &PlayerId) -> PathBuf {
        // Player IDs come from the host; keep the filename filesystem-safe
        let safe: String = player
            .0
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl PersistenceAdapter for JsonFileAdapter {
    fn load(&self, player: &PlayerId) -> Result<Option<PlayerProgressionRecord>, StoreError> {
        let path = self.path_for(player);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&data)?;
        log::debug!("Loaded record for {} from {:?}", player, path);
        Ok(Some(record))
    }

    fn save(&self, player: &PlayerId, record: &PlayerProgressionRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.path_for(player), json)?;
        Ok(())
    }
}

/// Adapter backed by a plain map. Used in tests and headless simulations.
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    records: Mutex<HashMap<PlayerId, PlayerProgressionRecord>>,
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for InMemoryAdapter {
    fn load(&self, player: &PlayerId) -> Result<Option<PlayerProgressionRecord>, StoreError> {
        Ok(self.records.lock().get(player).cloned())
    }

    fn save(&self, player: &PlayerId, record: &PlayerProgressionRecord) -> Result<(), StoreError> {
        self.records.lock().insert(player.clone(), record.clone());
        Ok(())
    }
}
