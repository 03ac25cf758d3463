//! Request binding and validation for branch office endpoints
//!
//! Handlers take extractors as `Result<_, Rejection>` and pass them here so
//! binding failures and structural failures share one error category.

use crate::config::PaginationConfig;
use crate::domain::{
    BranchOfficeField, CreateBranchOfficeInput, ListBranchOfficeQuery, ListBranchOfficeRequest,
    ListStatus, SimpleBranchOfficeQuery, UpdateBranchOfficeInput,
};
use crate::error::{AppError, Result};
use crate::repository::BranchOfficeRepository;
use crate::service::{BranchOfficeService, ExistsByFieldInput};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use axum_extra::extract::{Query, QueryRejection};
use validator::Validate;

/// A body that is not declared as JSON is a bad request; a JSON body that
/// does not bind is a validation failure
fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(e) => AppError::BadRequest(e.body_text()),
        other => AppError::Validation(other.body_text()),
    }
}

/// Bind and validate list parameters, applying pagination defaults
pub fn validate_list_request(
    query: std::result::Result<Query<ListBranchOfficeQuery>, QueryRejection>,
    defaults: &PaginationConfig,
) -> Result<ListBranchOfficeRequest> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.to_string()))?;
    query.validate()?;

    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<ListStatus>()
                .map_err(|_| AppError::field("status", "oneof"))?,
        ),
    };

    Ok(ListBranchOfficeRequest {
        fields: (!query.fields.is_empty()).then_some(query.fields),
        keyword: query.keyword,
        limit: query.limit.unwrap_or(defaults.default_limit),
        page: query.page.unwrap_or(defaults.default_page),
        status,
    })
}

/// Bind and validate a create payload, then enforce `name` uniqueness among
/// live rows
pub async fn validate_create_request<R: BranchOfficeRepository>(
    service: &BranchOfficeService<R>,
    payload: std::result::Result<Json<CreateBranchOfficeInput>, JsonRejection>,
) -> Result<CreateBranchOfficeInput> {
    let Json(input) = payload.map_err(json_rejection)?;
    input.validate()?;

    let name_taken = service
        .exists_by_field(&ExistsByFieldInput::new(
            BranchOfficeField::Name,
            input.name.clone(),
        ))
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Branch office name uniqueness check failed"))?;

    if name_taken {
        return Err(AppError::field("name", "exists"));
    }

    Ok(input)
}

/// Bind and validate a partial update payload. Name uniqueness is not
/// re-checked here.
pub fn validate_update_request(
    payload: std::result::Result<Json<UpdateBranchOfficeInput>, JsonRejection>,
) -> Result<UpdateBranchOfficeInput> {
    let Json(input) = payload.map_err(json_rejection)?;
    input.validate()?;
    Ok(input)
}

pub fn validate_simple_request(
    query: std::result::Result<Query<SimpleBranchOfficeQuery>, QueryRejection>,
) -> Result<SimpleBranchOfficeQuery> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.to_string()))?;
    query.validate()?;
    Ok(query)
}
