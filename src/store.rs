//! Persistence adapter: whole-document load/replace over named
//! collections. No partial updates, no cross-collection transactions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

/// A stored document: one JSON object per collection.
pub type Document = serde_json::Map<String, Value>;

/// Collection names match the historical data files on disk.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ROOMS: &str = "rooms";
    pub const STAFF: &str = "staff";
}

/// Durable mapping from collection name to a JSON document.
///
/// A missing or unparseable document loads as empty: availability is
/// preferred over durability-strictness, so corrupt state degrades to
/// a fresh document instead of taking the service down.
pub trait Storage: Send + Sync + 'static {
    fn load(&self, collection: &str) -> Document;
    fn save(&self, collection: &str, doc: &Document) -> std::io::Result<()>;
}

/// One pretty-printed JSON file per collection under a data directory.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }
}

impl Storage for JsonFileStore {
    fn load(&self, collection: &str) -> Document {
        let path = self.path(collection);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Document::new(),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(collection, "stored document is malformed, loading as empty");
                Document::new()
            }
        }
    }

    fn save(&self, collection: &str, doc: &Document) -> std::io::Result<()> {
        let pretty = serde_json::to_string_pretty(doc)?;
        std::fs::write(self.path(collection), pretty)
    }
}

/// In-memory storage with the same contract, for tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn load(&self, collection: &str) -> Document {
        self.collections
            .lock()
            .expect("store poisoned")
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, collection: &str, doc: &Document) -> std::io::Result<()> {
        self.collections
            .lock()
            .expect("store poisoned")
            .insert(collection.to_string(), doc.clone());
        Ok(())
    }
}
