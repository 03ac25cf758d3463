//! Branch office API handlers

use crate::api::validate::{
    validate_create_request, validate_list_request, validate_simple_request,
    validate_update_request,
};
use crate::api::{MessageResponse, PaginatedResponse, PaginationMeta, SuccessResponse};
use crate::domain::{
    BranchOfficeResource, CreateBranchOfficeInput, ListBranchOfficeQuery,
    SimpleBranchOfficeQuery, SimpleBranchOfficeResource, UpdateBranchOfficeInput,
};
use crate::error::{AppError, Result};
use crate::state::HasServices;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::{Query, QueryRejection};

/// 404 unless a branch office with this id is visible in the given scope
async fn ensure_exists<S: HasServices>(state: &S, id: &str, with_trash: bool) -> Result<()> {
    if state
        .branch_office_service()
        .exists_by_id(id, with_trash)
        .await?
    {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Branch office {} not found", id)))
    }
}

/// List branch offices with keyword filter and pagination
///
/// GET /branch-offices
#[utoipa::path(
    get,
    path = "/branch-offices",
    tag = "Branch Office",
    params(ListBranchOfficeQuery),
    responses(
        (status = 200, description = "Paginated branch offices"),
        (status = 422, description = "Invalid query parameters")
    )
)]
pub async fn list<S: HasServices>(
    State(state): State<S>,
    query: std::result::Result<Query<ListBranchOfficeQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let req = validate_list_request(query, &state.config().pagination)?;
    let service = state.branch_office_service();

    let (total_rows, total_pages) = service.total_rows_and_pages(&req).await?;
    let offices = service.list(&req).await?;

    Ok(Json(PaginatedResponse::new(
        offices
            .into_iter()
            .map(BranchOfficeResource::from)
            .collect(),
        PaginationMeta {
            limit: req.limit,
            page: req.page,
            total_rows,
            total_pages,
        },
    )))
}

/// Get branch office by ID
///
/// GET /branch-office/{id}
#[utoipa::path(
    get,
    path = "/branch-office/{id}",
    tag = "Branch Office",
    params(("id" = String, Path, description = "Branch office id")),
    responses(
        (status = 200, description = "Branch office found"),
        (status = 404, description = "Branch office not found")
    )
)]
pub async fn show<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    ensure_exists(&state, &id, false).await?;
    let office = state.branch_office_service().get(&id).await?;
    Ok(Json(SuccessResponse::new(BranchOfficeResource::from(office))))
}

/// Create branch office
///
/// POST /branch-office
#[utoipa::path(
    post,
    path = "/branch-office",
    tag = "Branch Office",
    request_body = CreateBranchOfficeInput,
    responses(
        (status = 201, description = "Branch office created"),
        (status = 422, description = "Invalid payload or name already exists")
    )
)]
pub async fn create<S: HasServices>(
    State(state): State<S>,
    payload: std::result::Result<Json<CreateBranchOfficeInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let service = state.branch_office_service();
    let input = validate_create_request(service, payload).await?;
    let office = service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_status(
            BranchOfficeResource::from(office),
            StatusCode::CREATED,
        )),
    ))
}

/// Update branch office (partial)
///
/// PUT /branch-office/{id}
#[utoipa::path(
    put,
    path = "/branch-office/{id}",
    tag = "Branch Office",
    params(("id" = String, Path, description = "Branch office id")),
    request_body = UpdateBranchOfficeInput,
    responses(
        (status = 200, description = "Branch office updated"),
        (status = 404, description = "Branch office not found"),
        (status = 422, description = "Invalid payload")
    )
)]
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateBranchOfficeInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    ensure_exists(&state, &id, false).await?;
    let input = validate_update_request(payload)?;
    let office = state.branch_office_service().update(&id, input).await?;
    Ok(Json(SuccessResponse::new(BranchOfficeResource::from(office))))
}

/// Soft delete branch office
///
/// DELETE /branch-office/{id}
#[utoipa::path(
    delete,
    path = "/branch-office/{id}",
    tag = "Branch Office",
    params(("id" = String, Path, description = "Branch office id")),
    responses(
        (status = 200, description = "Branch office moved to trash", body = MessageResponse),
        (status = 404, description = "Branch office not found")
    )
)]
pub async fn soft_delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    ensure_exists(&state, &id, false).await?;
    state.branch_office_service().soft_delete(&id).await?;
    Ok(Json(MessageResponse::from_status(StatusCode::OK)))
}

/// Permanently delete branch office, trashed or not
///
/// DELETE /branch-office/hard-delete/{id}
#[utoipa::path(
    delete,
    path = "/branch-office/hard-delete/{id}",
    tag = "Branch Office",
    params(("id" = String, Path, description = "Branch office id")),
    responses(
        (status = 200, description = "Branch office deleted", body = MessageResponse),
        (status = 404, description = "Branch office not found")
    )
)]
pub async fn hard_delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    ensure_exists(&state, &id, true).await?;
    state.branch_office_service().hard_delete(&id).await?;
    Ok(Json(MessageResponse::from_status(StatusCode::OK)))
}

/// Restore a soft-deleted branch office
///
/// PATCH /branch-office/{id}
#[utoipa::path(
    patch,
    path = "/branch-office/{id}",
    tag = "Branch Office",
    params(("id" = String, Path, description = "Branch office id")),
    responses(
        (status = 200, description = "Branch office restored", body = MessageResponse),
        (status = 404, description = "Branch office not found")
    )
)]
pub async fn restore<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    ensure_exists(&state, &id, true).await?;
    state.branch_office_service().restore(&id).await?;
    Ok(Json(MessageResponse::from_status(StatusCode::OK)))
}

/// Id/name pairs for dropdowns
///
/// GET /branch-offices/simple
#[utoipa::path(
    get,
    path = "/branch-offices/simple",
    tag = "Branch Office",
    params(SimpleBranchOfficeQuery),
    responses(
        (status = 200, description = "Branch office id/name pairs"),
        (status = 422, description = "Invalid query parameters")
    )
)]
pub async fn list_simple<S: HasServices>(
    State(state): State<S>,
    query: std::result::Result<Query<SimpleBranchOfficeQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let query = validate_simple_request(query)?;
    let offices = state.branch_office_service().list_simple(&query).await?;

    Ok(Json(SuccessResponse::new(
        offices
            .into_iter()
            .map(SimpleBranchOfficeResource::from)
            .collect::<Vec<_>>(),
    )))
}
