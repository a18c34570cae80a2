//! Landing-page statistics endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::SiteStats};

/// Catalog counters plus the running visit count
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Site statistics", body = SiteStats)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<SiteStats>> {
    let stats = state.services.stats.site_stats().await?;
    Ok(Json(stats))
}
