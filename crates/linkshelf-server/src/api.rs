use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{Method, StatusCode},
    routing::get,
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use linkshelf_shared::protocol::{AddLinkRequest, AssignRoleRequest, HealthResponse};
use linkshelf_shared::{
    validate_id, validate_link, validate_profile, Link, LinkRecord, Principal, UserProfile,
    UserRole,
};
use linkshelf_store::{Database, StoreError};

use crate::auth::Caller;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::extract::{Json, Path};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/links", get(get_all_links).post(add_link))
        .route(
            "/links/:id",
            get(get_link).put(update_link).delete(delete_link),
        )
        .route(
            "/profile",
            get(get_caller_user_profile).put(save_caller_user_profile),
        )
        .route("/users/:principal/profile", get(get_user_profile))
        .route("/users/:principal/role", axum::routing::put(assign_user_role))
        .route("/role", get(get_caller_user_role))
        .route("/role/admin", get(is_caller_admin))
        .fallback(unknown_route)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn unknown_route() -> ServerError {
    ServerError::NotFound("Not found".into())
}

// ─── Links ───

async fn get_all_links(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<LinkRecord>>, ServerError> {
    let db = state.db.lock().await;
    let owner = caller.require_user(&db)?;
    Ok(Json(db.list_links(&owner)?))
}

async fn get_link(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Link>, ServerError> {
    let db = state.db.lock().await;
    let owner = caller.require_user(&db)?;
    let link = db.get_link(&owner, &id).map_err(link_not_found)?;
    Ok(Json(link))
}

async fn add_link(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<AddLinkRequest>,
) -> Result<StatusCode, ServerError> {
    validate_id(&req.id)?;
    let link = validate_link(&req.link)?;

    let db = state.db.lock().await;
    let owner = caller.require_user(&db)?;
    db.put_link(&owner, &req.id, &link)?;

    info!(owner = %owner.short(), id = %req.id, "link added");
    Ok(StatusCode::NO_CONTENT)
}

async fn update_link(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Json(link): Json<Link>,
) -> Result<StatusCode, ServerError> {
    let link = validate_link(&link)?;

    let db = state.db.lock().await;
    let owner = caller.require_user(&db)?;
    if !db.update_link(&owner, &id, &link)? {
        return Err(ServerError::NotFound("Link not found".into()));
    }

    info!(owner = %owner.short(), id = %id, "link updated");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_link(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let db = state.db.lock().await;
    let owner = caller.require_user(&db)?;
    if !db.delete_link(&owner, &id)? {
        return Err(ServerError::NotFound("Link not found".into()));
    }

    info!(owner = %owner.short(), id = %id, "link deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn link_not_found(err: StoreError) -> ServerError {
    match err {
        StoreError::NotFound => ServerError::NotFound("Link not found".into()),
        other => other.into(),
    }
}

// ─── Profiles ───

async fn get_caller_user_profile(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Option<UserProfile>>, ServerError> {
    let db = state.db.lock().await;
    let principal = caller.require_user(&db)?;
    Ok(Json(db.get_profile(&principal)?))
}

async fn save_caller_user_profile(
    State(state): State<AppState>,
    caller: Caller,
    Json(profile): Json<UserProfile>,
) -> Result<StatusCode, ServerError> {
    let profile = validate_profile(&profile)?;

    let db = state.db.lock().await;
    let principal = caller.require_user(&db)?;
    db.save_profile(&principal, &profile)?;

    info!(principal = %principal.short(), "profile saved");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_user_profile(
    State(state): State<AppState>,
    caller: Caller,
    Path(user): Path<Principal>,
) -> Result<Json<Option<UserProfile>>, ServerError> {
    let db = state.db.lock().await;
    let principal = caller.require_user(&db)?;
    if principal != user && caller.role(&db)? != UserRole::Admin {
        return Err(ServerError::Forbidden("Can only view your own profile".into()));
    }
    Ok(Json(db.get_profile(&user)?))
}

// ─── Roles ───

async fn get_caller_user_role(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<UserRole>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(caller.role(&db)?))
}

async fn is_caller_admin(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<bool>, ServerError> {
    let db = state.db.lock().await;
    Ok(Json(caller.role(&db)? == UserRole::Admin))
}

async fn assign_user_role(
    State(state): State<AppState>,
    caller: Caller,
    Path(user): Path<Principal>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<StatusCode, ServerError> {
    let db = state.db.lock().await;
    let admin = caller.require_admin(&db)?;
    db.set_role(&user, req.role)?;

    info!(admin = %admin.short(), user = %user.short(), role = %req.role, "role assigned");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
