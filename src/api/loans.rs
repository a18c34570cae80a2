//! Loan listing endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{error::AppResult, models::InstanceDetails};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse};

const DEFAULT_PER_PAGE: i64 = 10;

/// Copies on loan to the requesting borrower, soonest due first
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's borrowed copies", body = Vec<InstanceDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<InstanceDetails>>> {
    let loans = state.services.loans.my_loans(claims.user_id).await?;
    Ok(Json(loans))
}

/// All copies on loan across the library, soonest due first. Librarian view.
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All borrowed copies", body = PaginatedResponse<InstanceDetails>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing catalog.can_mark_returned permission")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<InstanceDetails>>> {
    claims.require_can_mark_returned()?;

    let (page, per_page, offset) = query.limits(DEFAULT_PER_PAGE);
    let (items, total) = state.services.loans.all_loans(per_page, offset).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}
