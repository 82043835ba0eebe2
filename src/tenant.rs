//! Tenant Data Store: room/bed/resident profiles partitioned by
//! account id.
//!
//! Profiles survive in two historical container shapes: a flat
//! id→room mapping (oldest) and the canonical four-key structure.
//! Writes land in whichever shape is already stored, so old data
//! keeps working without a migration; `normalize` concentrates the
//! shape branching in one pure function.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::store::{collections::ROOMS, Document, Storage};

/// Canonical empty profile: absence of data is valid, empty state.
pub fn empty_profile() -> Value {
    json!({
        "rooms": [],
        "bedsState": {},
        "residents": [],
        "bedNumbers": {}
    })
}

/// A bulk payload carries the whole profile at once; its presence is
/// signalled by any of these top-level keys.
fn is_bulk(payload: &Value) -> bool {
    payload.as_object().map_or(false, |o| {
        o.contains_key("rooms") || o.contains_key("bedsState") || o.contains_key("residents")
    })
}

/// Normalize any stored profile shape to the canonical four-key
/// structure. Lossless: flat room mappings move under `rooms`, every
/// other key is preserved, and missing canonical keys are filled
/// with empty defaults.
pub fn normalize(profile: &Value) -> Value {
    let Some(obj) = profile.as_object() else {
        return empty_profile();
    };
    if obj.is_empty() {
        return empty_profile();
    }
    if is_bulk(profile) {
        let mut out = obj.clone();
        out.entry("rooms").or_insert(json!([]));
        out.entry("bedsState").or_insert(json!({}));
        out.entry("residents").or_insert(json!([]));
        out.entry("bedNumbers").or_insert(json!({}));
        return Value::Object(out);
    }
    // Flat legacy shape: the object itself is the room mapping
    json!({
        "rooms": obj.clone(),
        "bedsState": {},
        "residents": [],
        "bedNumbers": {}
    })
}

/// Result of a profile save.
pub enum SaveOutcome {
    /// Whole profile replaced wholesale.
    Bulk,
    /// Single room inserted under the given id (legacy payload).
    Room { id: String, room: Value },
}

pub struct TenantStore {
    store: Arc<dyn Storage>,
    lock: Mutex<()>,
}

impl TenantStore {
    pub fn new(store: Arc<dyn Storage>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// The caller's stored profile, or the canonical empty profile.
    /// Never an error: absent data is empty data.
    pub async fn get_profile(&self, owner: &str) -> Value {
        let doc = self.store.load(ROOMS);
        match doc.get(owner) {
            Some(stored) if !stored.as_object().map_or(true, |o| o.is_empty()) => {
                debug!(owner, "loaded room profile");
                stored.clone()
            }
            _ => empty_profile(),
        }
    }

    /// Store a payload for the caller. Bulk payloads replace the
    /// profile wholesale; anything else is treated as one room object
    /// and inserted into the existing container shape.
    pub async fn save_profile(&self, owner: &str, payload: Value) -> ApiResult<SaveOutcome> {
        let _guard = self.lock.lock().await;
        let mut doc = self.store.load(ROOMS);

        if is_bulk(&payload) {
            info!(owner, "storing full room profile");
            doc.insert(owner.to_string(), payload);
            self.store.save(ROOMS, &doc)?;
            return Ok(SaveOutcome::Bulk);
        }

        // Legacy single-room payload
        let entry = doc.entry(owner.to_string()).or_insert(json!({}));
        if !entry.is_object() {
            *entry = json!({});
        }
        if entry.as_object().map_or(false, |o| o.is_empty()) {
            // Brand-new profile starts in the canonical shape
            *entry = json!({"rooms": {}, "bedsState": {}, "residents": {}, "bedNumbers": {}});
        }

        let canonical = entry.get("rooms").is_some();
        let room_count = if canonical {
            match entry.get("rooms") {
                Some(Value::Object(m)) => m.len(),
                Some(Value::Array(a)) => a.len(),
                _ => 0,
            }
        } else {
            entry.as_object().map_or(0, |o| o.len())
        };
        let room_id = room_id_of(&payload).unwrap_or_else(|| (room_count + 1).to_string());

        if canonical {
            match entry.get_mut("rooms") {
                Some(Value::Object(rooms)) => {
                    rooms.insert(room_id.clone(), payload.clone());
                }
                Some(Value::Array(rooms)) => {
                    rooms.push(payload.clone());
                }
                Some(other) => {
                    let mut rooms = Map::new();
                    rooms.insert(room_id.clone(), payload.clone());
                    *other = Value::Object(rooms);
                }
                None => unreachable!("canonical entry has a rooms key"),
            }
        } else {
            // unwrap is safe: non-objects were replaced above
            entry
                .as_object_mut()
                .expect("profile entry is an object")
                .insert(room_id.clone(), payload.clone());
        }

        self.store.save(ROOMS, &doc)?;
        info!(owner, room_id, "stored room");
        Ok(SaveOutcome::Room {
            id: room_id,
            room: payload,
        })
    }

    /// Replace one room wholesale. No field-level merge.
    pub async fn update_room(&self, owner: &str, room_id: &str, payload: Value) -> ApiResult<Value> {
        let _guard = self.lock.lock().await;
        let mut doc = self.store.load(ROOMS);
        let entry = doc.get_mut(owner).ok_or(ApiError::NotFound("Room"))?;
        let slot = find_room_slot(entry, room_id).ok_or(ApiError::NotFound("Room"))?;
        *slot = payload.clone();
        self.store.save(ROOMS, &doc)?;
        Ok(payload)
    }

    pub async fn delete_room(&self, owner: &str, room_id: &str) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.store.load(ROOMS);
        let entry = doc.get_mut(owner).ok_or(ApiError::NotFound("Room"))?;
        if !remove_room(entry, room_id) {
            return Err(ApiError::NotFound("Room"));
        }
        self.store.save(ROOMS, &doc)?;
        Ok(())
    }

    /// Global reset: wipes every account's rooms, not just the
    /// caller's. Admin-gated at the route.
    pub async fn delete_all(&self) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        self.store.save(ROOMS, &Document::new())?;
        info!("room store wiped");
        Ok(())
    }
}

fn room_id_of(payload: &Value) -> Option<String> {
    match payload.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn id_matches(id_field: &Value, room_id: &str) -> bool {
    match id_field {
        Value::String(s) => s == room_id,
        Value::Number(n) => n.to_string() == room_id,
        _ => false,
    }
}

/// Locate a room in whichever container shape the profile uses.
fn find_room_slot<'a>(entry: &'a mut Value, room_id: &str) -> Option<&'a mut Value> {
    if entry.get("rooms").is_some() {
        match entry.get_mut("rooms") {
            Some(Value::Object(rooms)) => rooms.get_mut(room_id),
            Some(Value::Array(rooms)) => rooms
                .iter_mut()
                .find(|r| r.get("id").map_or(false, |id| id_matches(id, room_id))),
            _ => None,
        }
    } else {
        entry.as_object_mut()?.get_mut(room_id)
    }
}

fn remove_room(entry: &mut Value, room_id: &str) -> bool {
    if entry.get("rooms").is_some() {
        match entry.get_mut("rooms") {
            Some(Value::Object(rooms)) => rooms.remove(room_id).is_some(),
            Some(Value::Array(rooms)) => {
                let before = rooms.len();
                rooms.retain(|r| !r.get("id").map_or(false, |id| id_matches(id, room_id)));
                rooms.len() != before
            }
            _ => false,
        }
    } else {
        entry
            .as_object_mut()
            .map_or(false, |o| o.remove(room_id).is_some())
    }
}
