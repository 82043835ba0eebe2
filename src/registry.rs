//! Account Registry: account records, status transitions, expiry
//! evaluation.

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::BootstrapAdmin;
use crate::error::{ApiError, ApiResult};
use crate::models::{is_past_expiry, now_iso, Account, AccountPatch, AccountStatus, Role};
use crate::store::{collections::USERS, Document, Storage};

pub struct AccountRegistry {
    store: Arc<dyn Storage>,
    bootstrap: BootstrapAdmin,
    // Held across every load-modify-save span; concurrent writers to
    // the accounts document would otherwise lose updates.
    lock: Mutex<()>,
}

impl AccountRegistry {
    pub fn new(store: Arc<dyn Storage>, bootstrap: BootstrapAdmin) -> Self {
        Self {
            store,
            bootstrap,
            lock: Mutex::new(()),
        }
    }

    /// Decode one stored entry, skipping records that no longer parse.
    fn decode(username: &str, entry: &Value) -> Option<Account> {
        match serde_json::from_value(entry.clone()) {
            Ok(account) => Some(account),
            Err(err) => {
                warn!(%username, "skipping malformed account record: {err}");
                None
            }
        }
    }

    /// Look up a single account by id.
    pub async fn get(&self, username: &str) -> Option<Account> {
        let users = self.store.load(USERS);
        users.get(username).and_then(|e| Self::decode(username, e))
    }

    /// Seed the bootstrap admin into an empty accounts document.
    pub async fn ensure_bootstrap(&self) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        let mut users = self.store.load(USERS);
        if !users.is_empty() {
            return Ok(());
        }
        let admin = Account {
            password: self.bootstrap.password.clone(),
            role: Role::Admin,
            status: AccountStatus::Active,
            access_expires: Some(self.bootstrap.access_expires.clone()),
            created_at: now_iso(),
            residents_count: 0,
        };
        users.insert(
            self.bootstrap.username.clone(),
            serde_json::to_value(&admin)?,
        );
        self.store.save(USERS, &users)?;
        info!(username = %self.bootstrap.username, "seeded bootstrap admin account");
        Ok(())
    }

    /// Self-registration: new accounts start pending until an admin
    /// activates them.
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<String> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput(
                "Username and password are required",
            ));
        }
        let _guard = self.lock.lock().await;
        let mut users = self.store.load(USERS);
        if users.contains_key(username) {
            return Err(ApiError::DuplicateAccount);
        }
        let account = Account {
            password: password.to_string(),
            role: Role::User,
            status: AccountStatus::Pending,
            access_expires: None,
            created_at: now_iso(),
            residents_count: 0,
        };
        users.insert(username.to_string(), serde_json::to_value(&account)?);
        self.store.save(USERS, &users)?;
        info!(%username, "registered new account");
        Ok(username.to_string())
    }

    /// Mark every active account whose expiry has passed as expired.
    /// Run once at startup; idempotent. Returns the number corrected.
    pub async fn sweep_expired(&self) -> ApiResult<usize> {
        let _guard = self.lock.lock().await;
        let mut users = self.store.load(USERS);
        let now = Local::now().naive_local();
        let mut changed = 0;
        for (username, entry) in users.iter_mut() {
            let Some(account) = Self::decode(username, entry) else {
                continue;
            };
            if account.status == AccountStatus::Active && is_past_expiry(&account, now) {
                entry["status"] = json!("expired");
                warn!(%username, "account access expired, blocking");
                changed += 1;
            }
        }
        if changed > 0 {
            self.store.save(USERS, &users)?;
        }
        Ok(changed)
    }

    /// Persist a lazily-observed expiry (login found a stale status).
    pub async fn mark_expired(&self, username: &str) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        let mut users = self.store.load(USERS);
        if let Some(entry) = users.get_mut(username) {
            entry["status"] = json!("expired");
            self.store.save(USERS, &users)?;
            warn!(%username, "account access expired, blocking");
        }
        Ok(())
    }

    /// Apply an admin patch. Only status, accessExpires and role can
    /// change; the returned value is the full updated record.
    pub async fn update_account(&self, username: &str, patch: AccountPatch) -> ApiResult<Value> {
        let _guard = self.lock.lock().await;
        let mut users = self.store.load(USERS);
        let entry = users
            .get_mut(username)
            .ok_or(ApiError::NotFound("User"))?;
        if let Some(status) = patch.status {
            entry["status"] = serde_json::to_value(status)?;
        }
        if let Some(expires) = patch.access_expires {
            entry["accessExpires"] = serde_json::to_value(expires)?;
        }
        if let Some(role) = patch.role {
            entry["role"] = serde_json::to_value(role)?;
        }
        let updated = entry.clone();
        self.store.save(USERS, &users)?;
        info!(%username, "account updated");
        Ok(updated)
    }

    /// Remove an account. The bootstrap admin can never be deleted.
    pub async fn delete_account(&self, username: &str) -> ApiResult<()> {
        let _guard = self.lock.lock().await;
        let mut users = self.store.load(USERS);
        if !users.contains_key(username) {
            return Err(ApiError::NotFound("User"));
        }
        if username == self.bootstrap.username {
            return Err(ApiError::Protected);
        }
        users.remove(username);
        self.store.save(USERS, &users)?;
        info!(%username, "account deleted");
        Ok(())
    }

    /// The full account map, secrets included (admin-only surface).
    pub async fn list_accounts(&self) -> Document {
        self.store.load(USERS)
    }
}
