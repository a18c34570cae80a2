//! Site statistics service

use crate::{error::AppResult, models::LoanStatus, repository::Repository};

/// Counters shown on the landing page
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct SiteStats {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_visits: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Collect the landing-page counters, bumping the visit counter
    pub async fn site_stats(&self) -> AppResult<SiteStats> {
        let num_books = self.repository.stats.count_books().await?;
        let num_instances = self.repository.stats.count_instances().await?;
        let num_instances_available = self
            .repository
            .instances
            .count_by_status(LoanStatus::Available)
            .await?;
        let num_authors = self.repository.stats.count_authors().await?;
        let num_visits = self.repository.stats.record_visit().await?;

        Ok(SiteStats {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_visits,
        })
    }
}
