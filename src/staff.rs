//! Staff Roster: one flat id→record mapping shared across all
//! accounts. Deliberately unpartitioned and ungated; see DESIGN.md.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::store::{collections::STAFF, Document, Storage};

pub struct StaffRoster {
    store: Arc<dyn Storage>,
    lock: Mutex<()>,
}

impl StaffRoster {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// The full roster mapping.
    pub async fn list(&self) -> Document {
        self.store.load(STAFF)
    }

    /// Store a new record under a time-based id. Ids stay ordered by
    /// creation time; a same-millisecond collision bumps to the next
    /// free value instead of overwriting.
    pub async fn create(&self, record: Value) -> ApiResult<(String, Value)> {
        let _guard = self.lock.lock().await;
        let mut staff = self.store.load(STAFF);
        let mut millis = Utc::now().timestamp_millis();
        while staff.contains_key(&millis.to_string()) {
            millis += 1;
        }
        let id = millis.to_string();
        staff.insert(id.clone(), record.clone());
        self.store.save(STAFF, &staff)?;
        info!(%id, "staff record created");
        Ok((id, record))
    }

    /// Wholesale replace of one record.
    pub async fn update(&self, id: &str, record: Value) -> ApiResult<Value> {
        let _guard = self.lock.lock().await;
        let mut staff = self.store.load(STAFF);
        if !staff.contains_key(id) {
            return Err(ApiError::NotFound("Employee"));
        }
        staff.insert(id.to_string(), record.clone());
        self.store.save(STAFF, &staff)?;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        let mut staff = self.store.load(STAFF);
        if staff.remove(id).is_none() {
            return Err(ApiError::NotFound("Employee"));
        }
        self.store.save(STAFF, &staff)?;
        info!(%id, "staff record deleted");
        Ok(())
    }
}
