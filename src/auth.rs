//! Authorization Gate: credential resolution, the login state
//! machine, and role checks.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Local;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::models::{is_past_expiry, AccountStatus, Role};
use crate::registry::AccountRegistry;
use crate::AppState;

/// Maps a raw Authorization header value to an account id.
///
/// The current credential is the account id itself; a hardened
/// deployment can swap in a signed-token resolver without touching
/// the login state machine below.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, raw: &str) -> Option<String>;
}

/// Strips an optional literal `Bearer ` prefix; the remainder is the
/// account id.
pub struct PlainIdResolver;

impl CredentialResolver for PlainIdResolver {
    fn resolve(&self, raw: &str) -> Option<String> {
        let id = raw.strip_prefix("Bearer ").unwrap_or(raw);
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }
}

/// Successful login outcome.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub username: String,
    pub role: Role,
    pub status: AccountStatus,
}

pub struct AuthGate {
    registry: Arc<AccountRegistry>,
    resolver: Box<dyn CredentialResolver>,
}

impl AuthGate {
    pub fn new(registry: Arc<AccountRegistry>) -> Self {
        Self {
            registry,
            resolver: Box::new(PlainIdResolver),
        }
    }

    pub fn with_resolver(
        registry: Arc<AccountRegistry>,
        resolver: Box<dyn CredentialResolver>,
    ) -> Self {
        Self { registry, resolver }
    }

    /// Resolve a bearer credential to a known account id.
    ///
    /// Status is deliberately not re-checked here: the gate enforces
    /// it at login only, so an account expiring mid-session keeps
    /// working until its next login attempt.
    pub async fn authenticate(&self, header: Option<&str>) -> ApiResult<String> {
        let raw = header
            .filter(|h| !h.is_empty())
            .ok_or(ApiError::MissingCredential)?;
        let id = self
            .resolver
            .resolve(raw)
            .ok_or(ApiError::MissingCredential)?;
        match self.registry.get(&id).await {
            Some(_) => Ok(id),
            None => Err(ApiError::InvalidCredential("Invalid token")),
        }
    }

    /// The login state machine. Terminal outcomes only; the single
    /// persisted side effect is the lazy expiry correction.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginOutcome> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput(
                "Username and password are required",
            ));
        }
        let account = self
            .registry
            .get(username)
            .await
            .ok_or(ApiError::NotFound("User"))?;
        if account.password != password {
            warn!(%username, "login failed: incorrect password");
            return Err(ApiError::InvalidCredential("Incorrect password"));
        }
        match account.status {
            AccountStatus::Pending => Err(ApiError::AwaitingApproval),
            AccountStatus::Suspended => Err(ApiError::Suspended),
            AccountStatus::Expired => Err(ApiError::Expired),
            AccountStatus::Active => {
                if is_past_expiry(&account, Local::now().naive_local()) {
                    // Stored status is stale; correct it now.
                    self.registry.mark_expired(username).await?;
                    return Err(ApiError::Expired);
                }
                info!(%username, role = ?account.role, "login successful");
                Ok(LoginOutcome {
                    username: username.to_string(),
                    role: account.role,
                    status: account.status,
                })
            }
        }
    }

    /// Gate for admin-only operations.
    pub async fn require_admin(&self, username: &str) -> ApiResult<()> {
        match self.registry.get(username).await {
            Some(account) if account.role == Role::Admin => Ok(()),
            Some(_) => Err(ApiError::Forbidden),
            None => Err(ApiError::InvalidCredential("Invalid token")),
        }
    }
}

/// Extractor: the authenticated account id of the caller.
pub struct AuthUser(pub String);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> ApiResult<Self> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let id = state.auth.authenticate(header).await?;
        Ok(AuthUser(id))
    }
}
