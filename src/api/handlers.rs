use std::collections::BTreeMap;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::AppState;
use crate::registry::{RegistryError, VirtualHost};

/// Form fields shared by every mutating endpoint. Each handler validates
/// the subset it requires; the rest default to empty.
#[derive(Deserialize)]
pub struct MappingForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    new_path: String,
    #[serde(default)]
    upstream: String,
    #[serde(default)]
    custom_tags: String,
}

pub async fn list(State(state): State<AppState>) -> Json<BTreeMap<String, VirtualHost>> {
    Json(state.registry.list())
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    if form.name.is_empty() || form.path.is_empty() || form.upstream.is_empty() {
        return bad_request("you must pass at least name, path and upstream");
    }

    match state
        .registry
        .create(&form.name, &form.path, &form.upstream, &form.custom_tags)
    {
        Ok(host) => host_map(host).into_response(),
        Err(err) => registry_error(err),
    }
}

/// Upsert variant of create: `name` may be empty (the default server) and
/// an existing path is overwritten instead of conflicting.
pub async fn set(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    if form.path.is_empty() || form.upstream.is_empty() {
        return bad_request("path and upstream cannot be empty");
    }

    match state
        .registry
        .set(&form.name, &form.path, &form.upstream, &form.custom_tags)
    {
        Ok(host) => host_map(host).into_response(),
        Err(err) => registry_error(err),
    }
}

pub async fn modify(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    if form.name.is_empty()
        || form.path.is_empty()
        || form.new_path.is_empty()
        || form.upstream.is_empty()
    {
        return bad_request("you must pass at least name, path, new_path and upstream");
    }

    match state.registry.modify(
        &form.name,
        &form.path,
        &form.new_path,
        &form.upstream,
        &form.custom_tags,
    ) {
        Ok(host) => host_map(host).into_response(),
        Err(err) => registry_error(err),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    if form.name.is_empty() || form.path.is_empty() {
        return bad_request("you must pass at least name and path");
    }

    match state.registry.delete(&form.name, &form.path) {
        Ok(host) => host_map(host).into_response(),
        Err(err) => registry_error(err),
    }
}

/// Default-server-friendly twin of delete: `name` may be empty.
pub async fn unset(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    if form.path.is_empty() {
        return bad_request("path cannot be empty");
    }

    match state.registry.unset(&form.name, &form.path) {
        Ok(host) => host_map(host).into_response(),
        Err(err) => registry_error(err),
    }
}

pub async fn enable(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    match state.registry.enable(&form.name, &form.path) {
        Ok(hosts) => Json(hosts).into_response(),
        Err(err) => registry_error(err),
    }
}

pub async fn disable(
    State(state): State<AppState>,
    Form(form): Form<MappingForm>,
) -> Response {
    match state.registry.disable(&form.name, &form.path) {
        Ok(hosts) => Json(hosts).into_response(),
        Err(err) => registry_error(err),
    }
}

/// Responses mirror list: a map of host name → host snapshot, holding just
/// the hosts the operation touched.
fn host_map(host: VirtualHost) -> Json<BTreeMap<String, VirtualHost>> {
    Json(BTreeMap::from([(host.name.clone(), host)]))
}

fn bad_request(reason: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, reason).into_response()
}

fn registry_error(err: RegistryError) -> Response {
    let status = match err {
        RegistryError::Conflict { .. } => StatusCode::CONFLICT,
        RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Registry operation failed");
    }
    (status, err.to_string()).into_response()
}
