//! Book instance (physical copy) endpoints, including the renewal workflow

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        instance::{CreateBookInstance, UpdateBookInstance},
        user::perm,
        BookInstance, InstanceDetails,
    },
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse};

const DEFAULT_PER_PAGE: i64 = 10;

/// Renewal form as served on GET: the copy plus a proposed date
#[derive(Serialize, ToSchema)]
pub struct RenewalForm {
    /// The copy being renewed
    pub instance: InstanceDetails,
    /// Suggested new due date, three weeks from today
    pub proposed_renewal_date: NaiveDate,
}

/// Renewal submission
#[derive(Deserialize, ToSchema)]
pub struct RenewalRequest {
    /// New due date; must fall between today and four weeks out, inclusive
    pub renewal_date: NaiveDate,
}

/// Renewal confirmation
#[derive(Serialize, ToSchema)]
pub struct RenewalResponse {
    /// Copy ID
    pub id: Uuid,
    /// The due date now on record
    pub due_back: Option<NaiveDate>,
    /// Where the renewed loan can be seen
    pub loans_url: String,
}

/// List copies ordered by due date
#[utoipa::path(
    get,
    path = "/instances",
    tag = "instances",
    params(PageQuery),
    responses(
        (status = 200, description = "List of copies", body = PaginatedResponse<InstanceDetails>)
    )
)]
pub async fn list_instances(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<InstanceDetails>>> {
    let (page, per_page, offset) = query.limits(DEFAULT_PER_PAGE);
    let (items, total) = state
        .services
        .catalog
        .list_instances(per_page, offset)
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get copy details by ID
#[utoipa::path(
    get,
    path = "/instances/{id}",
    tag = "instances",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy details", body = InstanceDetails),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_instance(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InstanceDetails>> {
    let instance = state.services.catalog.get_instance(id).await?;
    Ok(Json(instance))
}

/// Register a new physical copy
#[utoipa::path(
    post,
    path = "/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 403, description = "Missing catalog.add_bookinstance permission"),
        (status = 404, description = "Referenced book not found")
    )
)]
pub async fn create_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<CreateBookInstance>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    claims.require(perm::ADD_BOOKINSTANCE)?;

    let created = state.services.catalog.create_instance(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a copy (imprint, due date, status, borrower)
#[utoipa::path(
    put,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = UpdateBookInstance,
    responses(
        (status = 200, description = "Copy updated", body = BookInstance),
        (status = 403, description = "Missing catalog.change_bookinstance permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateBookInstance>,
) -> AppResult<Json<BookInstance>> {
    claims.require(perm::CHANGE_BOOKINSTANCE)?;

    let updated = state.services.catalog.update_instance(id, &input).await?;
    Ok(Json(updated))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 403, description = "Missing catalog.delete_bookinstance permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require(perm::DELETE_BOOKINSTANCE)?;

    state.services.catalog.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the renewal form for a copy: the copy plus a proposed due date
/// three weeks out
#[utoipa::path(
    get,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Renewal form", body = RenewalForm),
        (status = 403, description = "Missing catalog.can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_renewal(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    claims.require_can_mark_returned()?;

    let (instance, proposed_renewal_date) = state.services.loans.renewal_proposal(id).await?;
    Ok(Json(RenewalForm {
        instance,
        proposed_renewal_date,
    }))
}

/// Renew a copy by moving its due date. An out-of-window date is refused
/// with 400 and the copy is left unchanged.
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = RenewalRequest,
    responses(
        (status = 200, description = "Copy renewed", body = RenewalResponse),
        (status = 400, description = "Renewal date outside the allowed window"),
        (status = 403, description = "Missing catalog.can_mark_returned permission"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewalRequest>,
) -> AppResult<Json<RenewalResponse>> {
    claims.require_can_mark_returned()?;

    let renewed = state.services.loans.renew(id, request.renewal_date).await?;

    tracing::info!(
        "Copy {} renewed until {:?} by {}",
        renewed.id,
        renewed.due_back,
        claims.sub
    );

    Ok(Json(RenewalResponse {
        id: renewed.id,
        due_back: renewed.due_back,
        loans_url: "/api/v1/loans".to_string(),
    }))
}
