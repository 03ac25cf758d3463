//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates handler path annotations and domain schemas into a single
//! document served at `/api-docs/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Branch Office Core API",
        version = "0.1.0",
        description = "Branch office management with soft delete and restore"
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Branch Office", description = "Branch office CRUD, trash and restore"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,
        crate::api::branch_office::list,
        crate::api::branch_office::list_simple,
        crate::api::branch_office::show,
        crate::api::branch_office::create,
        crate::api::branch_office::update,
        crate::api::branch_office::soft_delete,
        crate::api::branch_office::hard_delete,
        crate::api::branch_office::restore,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::api::MessageResponse,
        crate::api::ListMeta,
        crate::api::PaginationMeta,
        crate::domain::BranchOfficeResource,
        crate::domain::SimpleBranchOfficeResource,
        crate::domain::CreateBranchOfficeInput,
        crate::domain::UpdateBranchOfficeInput,
    )),
)]
pub struct ApiDoc;

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
