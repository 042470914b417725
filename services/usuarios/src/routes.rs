//! Usuarios service routes

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        CreateUsuarioRequest, MensajeResponse, PromedioEdadResponse, UpdateUsuarioRequest,
    },
    state::AppState,
    validation::validate_create,
};

/// Create the router for the usuarios service
///
/// `/usuarios/promedio-edad` is a static segment and always wins over
/// `/usuarios/:id`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/usuarios/promedio-edad", get(get_promedio_edad))
        .route("/usuarios", get(get_usuarios).post(create_usuario))
        .route(
            "/usuarios/:id",
            get(get_usuario)
                .put(update_usuario)
                .delete(delete_usuario),
        )
        .route("/estado", get(get_estado))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parse a path id the way the `integer` column would, failing as a store error
fn parse_id(raw: &str, context: &'static str) -> ApiResult<i32> {
    raw.trim().parse().map_err(|e| {
        error!("{}: invalid id {:?}: {}", context, raw, e);
        ApiError::InternalServerError
    })
}

/// Decode a JSON body, treating a missing, non-JSON or unreadable one as `{}`
fn json_or_empty<T: DeserializeOwned + Default>(headers: &HeaderMap, bytes: &Bytes) -> T {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("json"));
    if !is_json || bytes.is_empty() {
        return T::default();
    }

    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        debug!("Ignoring unreadable JSON body: {}", e);
        T::default()
    })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.usuario_repository.ping().await.unwrap_or(false);
    let status = if database { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "api-usuarios",
        "database": database,
    }))
}

/// Static service metadata
pub async fn get_estado(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service_info.as_ref().clone())
}

/// Create a new user
pub async fn create_usuario(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: CreateUsuarioRequest = json_or_empty(&headers, &payload);
    let nuevo = validate_create(request).map_err(ApiError::BadRequest)?;

    let id = state
        .usuario_repository
        .create(&nuevo)
        .await
        .map_err(ApiError::store("Error al crear el usuario"))?;

    info!("Usuario {} creado", id);

    Ok((
        StatusCode::CREATED,
        Json(MensajeResponse::new("Usuario creado correctamente")),
    ))
}

/// Average age in years of the active users
pub async fn get_promedio_edad(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let promedio_edad = state
        .usuario_repository
        .average_age()
        .await
        .map_err(ApiError::store("Error al calcular el promedio de edades"))?;

    debug!("Promedio de edad: {:?}", promedio_edad);

    Ok(Json(PromedioEdadResponse { promedio_edad }))
}

/// List the active users
pub async fn get_usuarios(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let usuarios = state
        .usuario_repository
        .list_active()
        .await
        .map_err(ApiError::store("Error al obtener usuarios"))?;

    Ok(Json(usuarios))
}

/// Get a user by ID, active or not
pub async fn get_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, "Error al obtener el usuario")?;

    let usuario = state
        .usuario_repository
        .find_by_id(id)
        .await
        .map_err(ApiError::store("Error al obtener el usuario"))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(usuario))
}

/// Update an active user
///
/// The existence check and the write are separate statements. A concurrent
/// delete landing between them is overwritten and the row comes back active.
pub async fn update_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> ApiResult<impl IntoResponse> {
    let context = "Error al actualizar el usuario";
    let id = parse_id(&id, context)?;
    let changes: UpdateUsuarioRequest = json_or_empty(&headers, &payload);

    state
        .usuario_repository
        .find_active_by_id(id)
        .await
        .map_err(ApiError::store(context))?
        .ok_or(ApiError::NotFound)?;

    state
        .usuario_repository
        .update(id, &changes)
        .await
        .map_err(ApiError::store(context))?;

    Ok(Json(MensajeResponse::new("Usuario actualizado correctamente")))
}

/// Soft-delete an active user
///
/// Same check-then-write shape as update; the row is never removed.
pub async fn delete_usuario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let context = "Error al eliminar el usuario";
    let id = parse_id(&id, context)?;

    state
        .usuario_repository
        .find_active_by_id(id)
        .await
        .map_err(ApiError::store(context))?
        .ok_or(ApiError::NotFound)?;

    state
        .usuario_repository
        .deactivate(id)
        .await
        .map_err(ApiError::store(context))?;

    Ok(Json(MensajeResponse::new("Usuario eliminado correctamente")))
}
