use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

use super::error::DocumentError;
use super::types::{CreateGroupRequest, DocumentRecord, ListFilesQuery, NetworkQuery};
use crate::auth::AdminIdentity;
use crate::gateway::state::AppState;
use crate::gateway::types::ErrorBody;

fn bad_query(e: QueryRejection) -> DocumentError {
    DocumentError::InvalidRequest(format!(
        "{} (network must be either public or private)",
        e.body_text()
    ))
}

/// Get a registered document by CID
///
/// GET /documents/{cid}?network=
#[utoipa::path(
    get,
    path = "/documents/{cid}",
    params(
        ("cid" = String, Path, description = "IPFS content identifier"),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentRecord),
        (status = 400, description = "Invalid network", body = ErrorBody),
        (status = 404, description = "Not registered on the authoritative chain", body = ErrorBody),
        (status = 503, description = "Pinning provider unavailable", body = ErrorBody)
    ),
    tag = "Documents"
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(cid): Path<String>,
    query: Result<Query<NetworkQuery>, QueryRejection>,
) -> Result<Json<DocumentRecord>, DocumentError> {
    let Query(query) = query.map_err(bad_query)?;
    let record = state.documents.get_document(query.network, &cid).await?;
    Ok(Json(record))
}

/// List pinned files
///
/// GET /documents?network=&groupId=
#[utoipa::path(
    get,
    path = "/documents",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Provider file listing", body = serde_json::Value),
        (status = 400, description = "Invalid network", body = ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Documents"
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    query: Result<Query<ListFilesQuery>, QueryRejection>,
) -> Result<Json<Value>, DocumentError> {
    let Query(query) = query.map_err(bad_query)?;
    tracing::debug!("[DOCS] {} listing {} files", admin.address, query.network);
    let listing = state
        .documents
        .list_files(query.network, query.group_id.as_deref())
        .await?;
    Ok(Json(listing))
}

/// List pinning groups
///
/// GET /documents/groups?network=
#[utoipa::path(
    get,
    path = "/documents/groups",
    params(NetworkQuery),
    responses(
        (status = 200, description = "Provider group listing", body = serde_json::Value),
        (status = 400, description = "Invalid network", body = ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Documents"
)]
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NetworkQuery>, QueryRejection>,
) -> Result<Json<Value>, DocumentError> {
    let Query(query) = query.map_err(bad_query)?;
    let groups = state.documents.list_groups(query.network).await?;
    Ok(Json(groups))
}

/// Create a pinning group
///
/// POST /documents/groups
#[utoipa::path(
    post,
    path = "/documents/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = serde_json::Value),
        (status = 400, description = "Invalid network or empty group name", body = ErrorBody),
        (status = 401, description = "Missing or invalid credential", body = ErrorBody)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Documents"
)]
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    body: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DocumentError> {
    let Json(req) = body.map_err(|e| DocumentError::InvalidRequest(e.body_text()))?;
    req.validate()
        .map_err(|e| DocumentError::InvalidRequest(e.to_string()))?;

    tracing::info!(
        "[DOCS] {} creating group '{}' on {}",
        admin.address,
        req.group_name,
        req.network
    );
    let created = state
        .documents
        .create_group(req.network, &req.group_name)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
