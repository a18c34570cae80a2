//! Language endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{language::LanguageInput, user::perm, Language},
    services::catalog::LanguageDetails,
};

use super::{AuthenticatedUser, PageQuery, PaginatedResponse};

const DEFAULT_PER_PAGE: i64 = 10;

/// List languages
#[utoipa::path(
    get,
    path = "/languages",
    tag = "languages",
    params(PageQuery),
    responses(
        (status = 200, description = "List of languages", body = PaginatedResponse<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Language>>> {
    let (page, per_page, offset) = query.limits(DEFAULT_PER_PAGE);
    let (items, total) = state
        .services
        .catalog
        .list_languages(per_page, offset)
        .await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get language details by ID, including the books written in it
#[utoipa::path(
    get,
    path = "/languages/{id}",
    tag = "languages",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language details", body = LanguageDetails),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LanguageDetails>> {
    let language = state.services.catalog.get_language(id).await?;
    Ok(Json(language))
}

/// Create a new language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = LanguageInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 403, description = "Missing catalog.add_language permission"),
        (status = 409, description = "Name already taken (case insensitive)")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<LanguageInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require(perm::ADD_LANGUAGE)?;
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.catalog.create_language(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a language
#[utoipa::path(
    put,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    request_body = LanguageInput,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 403, description = "Missing catalog.change_language permission"),
        (status = 404, description = "Language not found"),
        (status = 409, description = "Name already taken (case insensitive)")
    )
)]
pub async fn update_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(input): Json<LanguageInput>,
) -> AppResult<Json<Language>> {
    claims.require(perm::CHANGE_LANGUAGE)?;
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.catalog.update_language(id, &input).await?;
    Ok(Json(updated))
}

/// Delete a language. Books in this language keep existing with their
/// language cleared.
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 403, description = "Missing catalog.delete_language permission"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(perm::DELETE_LANGUAGE)?;

    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
