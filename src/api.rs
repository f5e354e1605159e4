//! HTTP surface for the todo service.
//!
//! Axum router bridging the REST routes to the query engine and store:
//!
//! ```text
//! GET    /api/health
//! GET    /api/todos                     # filtered, paginated listing
//! POST   /api/todos
//! GET    /api/todos/stats
//! PUT    /api/todos/{id}
//! DELETE /api/todos/{id}
//! POST   /api/todos/{id}/attachments
//! GET    /api/categories
//! POST   /api/categories
//! DELETE /api/categories/{id}
//! ```
//!
//! Every route except health requires a resolved owner. Identity arrives as
//! an opaque bearer token; an absent or unknown token fails closed as 401.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::attachments::{self, AttachmentSink, AttachmentUpload};
use crate::error::{Error, ErrorBody, Result};
use crate::identity::IdentityProvider;
use crate::model::{Category, Todo};
use crate::query::{self, ListQuery, TodoPage};
use crate::stats::{self, TodoStats};
use crate::store::{NewCategory, NewTodo, Store, TodoUpdate};

/// Shared per-process state, constructed once at startup and injected into
/// every handler.
pub struct AppContext {
    pub store: Arc<Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub attachments: Arc<dyn AttachmentSink>,
    pub default_limit: usize,
}

pub async fn serve(ctx: Arc<AppContext>, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|_| Error::Validation(format!("invalid bind address '{bind}'")))?;

    let router = build_router(ctx);

    info!("todod API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (no auth)
        .route("/api/health", get(health))
        // Todos
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/stats", get(get_stats))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/api/todos/{id}/attachments", axum::routing::post(attach))
        // Categories
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/{id}", axum::routing::delete(delete_category))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(ctx)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

/// The resolved owner of the current request. Extraction fails closed: no
/// header, malformed header, or unknown token all reject with 401.
pub struct Owner(pub String);

impl FromRequestParts<Arc<AppContext>> for Owner {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token.and_then(|token| ctx.identity.resolve(token)) {
            Some(user) => Ok(Owner(user)),
            None => Err(Error::Unauthenticated),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// =============================================================================
// Todos
// =============================================================================

async fn list_todos(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Query(mut query): Query<ListQuery>,
) -> Result<Json<TodoPage>> {
    if query.limit.is_none() {
        query.limit = Some(ctx.default_limit);
    }
    let page = query::run_query(&ctx.store, &owner, &query)?;
    Ok(Json(page))
}

#[derive(Deserialize)]
struct CreateTodoRequest {
    #[serde(flatten)]
    todo: NewTodo,
    /// Inline attachment payloads, stored best-effort: a failed upload is
    /// logged and skipped, never a reason to reject the todo.
    #[serde(default)]
    attachments: Vec<AttachmentUpload>,
}

async fn create_todo(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Json(body): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    let locations = attachments::store_best_effort(ctx.attachments.as_ref(), &body.attachments);
    let todo = ctx.store.create_todo(&owner, body.todo, locations)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_stats(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
) -> Result<Json<TodoStats>> {
    let stats = stats::compute(&ctx.store, &owner)?;
    Ok(Json(stats))
}

async fn update_todo(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(update): Json<TodoUpdate>,
) -> Result<Json<Todo>> {
    let todo = ctx.store.update_todo(&owner, &id, update)?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    ctx.store.delete_todo(&owner, &id)?;
    Ok(Json(json!({ "id": id })))
}

async fn attach(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(upload): Json<AttachmentUpload>,
) -> Result<Json<Todo>> {
    // Guard runs before the sink write so a forbidden caller cannot park
    // payloads on disk.
    ctx.store.find_todo(&owner, &id)?;
    let location = ctx.attachments.store(&upload)?;
    let todo = ctx.store.push_attachment(&owner, &id, location)?;
    Ok(Json(todo))
}

// =============================================================================
// Categories
// =============================================================================

async fn list_categories(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(ctx.store.categories_for_owner(&owner)))
}

async fn create_category(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Json(body): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = ctx.store.create_category(&owner, body)?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn delete_category(
    State(ctx): State<Arc<AppContext>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    ctx.store.delete_category(&owner, &id)?;
    Ok(Json(json!({ "id": id })))
}
