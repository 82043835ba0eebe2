//! Hostel Manager API Backend
//!
//! Multi-tenant management backend for a hostel operator: account
//! lifecycle (pending/active/expired/suspended), per-account room
//! data, and a shared staff roster over whole-document JSON
//! persistence.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod routes;
pub mod staff;
pub mod store;
pub mod tenant;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthGate;
use crate::config::BootstrapAdmin;
use crate::registry::AccountRegistry;
use crate::staff::StaffRoster;
use crate::store::Storage;
use crate::tenant::TenantStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<AccountRegistry>,
    pub auth: Arc<AuthGate>,
    pub tenants: Arc<TenantStore>,
    pub staff: Arc<StaffRoster>,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>, bootstrap: BootstrapAdmin) -> Self {
        let registry = Arc::new(AccountRegistry::new(store.clone(), bootstrap));
        let auth = Arc::new(AuthGate::new(registry.clone()));
        let tenants = Arc::new(TenantStore::new(store.clone()));
        let staff = Arc::new(StaffRoster::new(store));
        Self {
            registry,
            auth,
            tenants,
            staff,
        }
    }
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(routes::health::health_check))
        // Auth
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/users", get(routes::auth::list_users))
        .route(
            "/api/auth/users/:username",
            put(routes::auth::update_user).delete(routes::auth::delete_user),
        )
        // Rooms
        .route(
            "/api/rooms",
            get(routes::rooms::get_rooms).post(routes::rooms::create_room),
        )
        .route("/api/rooms/all", delete(routes::rooms::delete_all_rooms))
        .route(
            "/api/rooms/:room_id",
            put(routes::rooms::update_room).delete(routes::rooms::delete_room),
        )
        // Staff
        .route(
            "/api/staff",
            get(routes::staff::list_staff).post(routes::staff::create_staff),
        )
        .route(
            "/api/staff/:employee_id",
            put(routes::staff::update_staff).delete(routes::staff::delete_staff),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
