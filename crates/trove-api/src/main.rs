//! trove-api - HTTP API server for the trove organizer

mod auth;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use trove_core::{
    CollectionRepository, ItemFilter, ItemKind, ItemPayload, ItemRepository, NewItem, PublicUser,
    StoredBlob, Tag, TagRepository, UserRepository,
};
use trove_db::{generate_blob_path, Database, FilesystemBackend, PoolConfig, StorageBackend};

use auth::{AuthUser, TokenService};

/// Per-file upload cap. Checked before any row is written.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Fixed bcrypt work factor for password hashing.
const BCRYPT_COST: u32 = 10;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    /// Blob storage for uploaded files; the same directory is served
    /// read-only at /uploads.
    storage: Arc<FilesystemBackend>,
    tokens: TokenService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT - "json" or "text" (default: "text")
    //   RUST_LOG   - standard env filter (default: "trove_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trove_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/trove".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .unwrap_or(5000);
    let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let token_ttl_days: i64 = std::env::var("TOKEN_TTL_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(auth::DEFAULT_TOKEN_TTL_DAYS);
    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        warn!("JWT_SECRET not set; using an insecure development secret");
        "trove-dev-secret-change-in-production".to_string()
    });

    // Connect to database and run pending migrations
    info!("Connecting to database...");
    let db = Database::connect_with_config(
        &database_url,
        PoolConfig::default().max_connections(max_connections),
    )
    .await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Initialize blob storage
    let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
    let storage = FilesystemBackend::new(&upload_dir);
    storage
        .validate()
        .await
        .map_err(|e| anyhow::anyhow!("Blob storage validation failed: {}", e))?;
    info!("Blob storage initialized at {}", upload_dir);

    let state = AppState {
        db,
        storage: Arc::new(storage),
        tokens: TokenService::new(&jwt_secret, token_ttl_days),
    };

    // Periodic pool health logging
    let metrics_pool = state.db.pool.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            trove_db::log_pool_metrics(&metrics_pool);
        }
    });

    let app = router(state, &upload_dir);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router: public auth routes, token-guarded API
/// routes, and read-only static serving of uploaded blobs.
fn router(state: AppState, upload_dir: &str) -> Router {
    let protected = Router::new()
        .route(
            "/api/collections",
            get(list_collections).post(create_collection),
        )
        .route("/api/tags", get(list_tags).post(create_tag))
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/upload", post(upload_item))
        .route("/api/items/:id", delete(delete_item))
        .route("/api/items/:id/download", get(download_item))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]),
        )
        // Upload cap plus multipart framing overhead
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES + 1024 * 1024))
        .with_state(state)
}

// =============================================================================
// SYSTEM HANDLERS
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// AUTH HANDLERS
// =============================================================================

/// Absent fields deserialize to empty strings so validation can answer with
/// this API's `{"error": ...}` body instead of an extractor rejection.
#[derive(Debug, Deserialize)]
struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    success: bool,
    token: String,
    user: PublicUser,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }

    if state.db.users.find_by_email(&body.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = bcrypt::hash(&body.password, BCRYPT_COST)
        .map_err(|e| trove_core::Error::Internal(format!("password hashing failed: {}", e)))?;

    // Inserts the user row and their default collection in one transaction.
    // A concurrent registration with the same email loses on the unique
    // index and surfaces as a conflict here.
    let user = state
        .db
        .users
        .create(&body.name, &body.email, &password_hash)
        .await?;

    info!(user_id = %user.id, "User registered");

    let public = user.public();
    let token = state.tokens.issue(&public)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token,
            user: public,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password required".to_string(),
        ));
    }

    // One generic message for unknown email and wrong password: login
    // failures must not reveal which accounts exist.
    let user = state
        .db
        .users
        .find_by_email(&body.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = bcrypt::verify(&body.password, &user.password_hash)
        .map_err(|e| trove_core::Error::Internal(format!("password verification failed: {}", e)))?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let public = user.public();
    let token = state.tokens.issue(&public)?;
    Ok(Json(AuthResponse {
        success: true,
        token,
        user: public,
    }))
}

// =============================================================================
// COLLECTION HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateCollectionBody {
    #[serde(default)]
    name: String,
}

async fn list_collections(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let collections = state.db.collections.list(user.id).await?;
    Ok(Json(collections))
}

async fn create_collection(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateCollectionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let collection = state.db.collections.create(user.id, &body.name).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

// =============================================================================
// TAG HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateTagBody {
    #[serde(default)]
    name: String,
}

async fn list_tags(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state.db.tags.list(user.id).await?;
    Ok(Json(tags))
}

async fn create_tag(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateTagBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (tag, created): (Tag, bool) = state.db.tags.create(user.id, &body.name).await?;
    // Idempotent endpoint: a pre-existing tag responds 200 instead of 201.
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(tag)))
}

// =============================================================================
// ITEM HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListItemsQuery {
    search: Option<String>,
    collection: Option<String>,
    tags: Option<String>,
}

/// Parse the comma-separated `tags` query parameter.
fn parse_tags_param(raw: Option<&str>) -> Vec<String> {
    raw.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Treat absent and empty-string query values the same.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn list_items(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ItemFilter {
        search: non_empty(query.search),
        collection: non_empty(query.collection),
        tags: parse_tags_param(query.tags.as_deref()),
    };
    let items = state.db.items.list(user.id, filter).await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateItemBody {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    content: Option<String>,
    url: Option<String>,
    collection_name: Option<String>,
    tags: Option<Vec<String>>,
}

async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateItemBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() || body.kind.is_empty() {
        return Err(ApiError::BadRequest("Name and type required".to_string()));
    }
    let kind = ItemKind::parse(&body.kind)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown item type: {}", body.kind)))?;

    let payload = match kind {
        ItemKind::Text => ItemPayload::Text {
            content: body.content.unwrap_or_default(),
        },
        ItemKind::Link => ItemPayload::Link {
            url: body.url.unwrap_or_default(),
        },
        ItemKind::File => {
            return Err(ApiError::BadRequest(
                "File items are created via upload".to_string(),
            ))
        }
    };

    let item = state
        .db
        .items
        .create(
            user.id,
            NewItem {
                name: body.name,
                payload,
                collection: non_empty(body.collection_name),
                tags: body.tags.unwrap_or_default(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

async fn upload_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut collection_name: Option<String> = None;
    let mut tags: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "upload".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(ApiError::BadRequest(
                        "File exceeds the 50 MiB upload limit".to_string(),
                    ));
                }
                file = Some((original_name, data.to_vec()));
            }
            Some("collectionName") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Malformed field: {}", e)))?;
                collection_name = non_empty(Some(value));
            }
            // Tags arrive as a JSON-encoded string array alongside the file.
            Some("tags") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Malformed field: {}", e)))?;
                if !value.trim().is_empty() {
                    tags = serde_json::from_str(&value)
                        .map_err(|e| ApiError::BadRequest(format!("Invalid tags payload: {}", e)))?;
                }
            }
            _ => {}
        }
    }

    let (original_name, data) = file
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    // Blob goes to disk first; the catalog row then records its path. No
    // compensating cleanup if the insert fails: the blob is orphaned, never
    // the row.
    let blob_path = generate_blob_path(&Uuid::now_v7(), &original_name);
    state.storage.write(&blob_path, &data).await?;

    let item = state
        .db
        .items
        .create(
            user.id,
            NewItem {
                name: original_name.clone(),
                payload: ItemPayload::File(StoredBlob {
                    path: blob_path,
                    original_name,
                    size_bytes: data.len() as u64,
                }),
                collection: collection_name,
                tags,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let blob_path = state.db.items.delete(user.id, id).await?;

    // Best-effort blob cleanup: the row is already gone, and metadata
    // consistency wins over storage cleanup.
    if let Some(path) = blob_path {
        if let Err(e) = state.storage.delete(&path).await {
            warn!(item_id = %id, blob = %path, error = %e, "Failed to delete blob for removed item");
        }
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Quote-safe value for a Content-Disposition attachment filename.
fn attachment_disposition(name: &str) -> String {
    let safe: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

async fn download_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (name, blob_path) = state.db.items.find_file(user.id, id).await?;

    let data = state.storage.read(&blob_path).await.map_err(|e| match &e {
        // Row exists but the blob is gone: still a 404, not a server error.
        trove_core::Error::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            ApiError::NotFound("File not found".to_string())
        }
        _ => ApiError::from(e),
    })?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (header::CONTENT_DISPOSITION, attachment_disposition(&name)),
        ],
        data,
    ))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    /// Unexpected internal failure; detail is logged, never returned.
    Internal(trove_core::Error),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<trove_core::Error> for ApiError {
    fn from(err: trove_core::Error) -> Self {
        match err {
            trove_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            trove_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            trove_core::Error::Conflict(msg) => ApiError::Conflict(msg),
            trove_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            trove_core::Error::Forbidden(msg) => ApiError::Forbidden(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            // Duplicate unique fields surface as validation failures on this
            // API, not 409s.
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    /// State with a lazily-connecting pool: requests that fail validation or
    /// auth never touch the database, so these tests need no server.
    fn test_state(upload_dir: &std::path::Path) -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/trove_test_unreachable")
            .expect("lazy pool");
        AppState {
            db: Database::new(pool),
            storage: Arc::new(FilesystemBackend::new(upload_dir)),
            tokens: TokenService::new("test-secret", auth::DEFAULT_TOKEN_TTL_DAYS),
        }
    }

    fn test_app(state: AppState) -> Router {
        router(state, "uploads")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(test_state(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(test_state(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/items")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Access token required");
    }

    #[tokio::test]
    async fn test_garbage_token_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(test_state(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/items")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(test_state(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"","email":"a@example.com","password":"pw"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "All fields are required");
    }

    #[tokio::test]
    async fn test_login_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(test_state(dir.path()));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"","password":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_item_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let token = state
            .tokens
            .issue(&PublicUser {
                id: Uuid::now_v7(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            })
            .unwrap();
        let app = test_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/items")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"x","type":"bogus"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_tags_param() {
        assert_eq!(
            parse_tags_param(Some("work, urgent ,")),
            vec!["work".to_string(), "urgent".to_string()]
        );
        assert!(parse_tags_param(Some("")).is_empty());
        assert!(parse_tags_param(None).is_empty());
    }

    #[test]
    fn test_non_empty_filters_blank_values() {
        assert_eq!(non_empty(Some("Home".to_string())).as_deref(), Some("Home"));
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_attachment_disposition_strips_quotes() {
        assert_eq!(
            attachment_disposition("my \"file\".pdf"),
            "attachment; filename=\"my file.pdf\""
        );
        assert_eq!(
            attachment_disposition("plain.txt"),
            "attachment; filename=\"plain.txt\""
        );
    }
}
