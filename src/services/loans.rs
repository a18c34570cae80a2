//! Loan views and the renewal workflow

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, InstanceDetails},
    repository::Repository,
};

/// Default loan period proposed when a librarian opens the renewal form
const DEFAULT_RENEWAL_WEEKS: i64 = 3;
/// Furthest a renewal may be pushed out
const MAX_RENEWAL_DAYS: i64 = 28;

/// A renewal date must fall between today and four weeks from today,
/// both ends inclusive.
pub fn validate_renewal_date(date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date < today {
        return Err(AppError::Validation(
            "Invalid date - renewal in past".to_string(),
        ));
    }
    if date > today + Duration::days(MAX_RENEWAL_DAYS) {
        return Err(AppError::Validation(
            "Invalid date - renewal more than 4 weeks ahead".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to the requesting borrower, soonest due first
    pub async fn my_loans(&self, borrower_id: i32) -> AppResult<Vec<InstanceDetails>> {
        self.repository.instances.loans_by_borrower(borrower_id).await
    }

    /// All copies on loan, soonest due first
    pub async fn all_loans(
        &self,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<InstanceDetails>, i64)> {
        self.repository.instances.loans_all(limit, offset).await
    }

    /// Load a copy and propose a renewal date of three weeks out
    pub async fn renewal_proposal(&self, id: Uuid) -> AppResult<(InstanceDetails, NaiveDate)> {
        let instance = self.repository.instances.get_details(id).await?;
        let proposed = Utc::now().date_naive() + Duration::weeks(DEFAULT_RENEWAL_WEEKS);
        Ok((instance, proposed))
    }

    /// Renew a copy: move its due date to `renewal_date` if the date is
    /// inside the allowed window. No mutation happens on an invalid date.
    pub async fn renew(&self, id: Uuid, renewal_date: NaiveDate) -> AppResult<BookInstance> {
        // 404 before validation, matching lookup-then-validate order
        self.repository.instances.get_by_id(id).await?;

        validate_renewal_date(renewal_date, Utc::now().date_naive())?;

        self.repository.instances.set_due_back(id, renewal_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn accepts_today() {
        assert!(validate_renewal_date(today(), today()).is_ok());
    }

    #[test]
    fn accepts_four_weeks_out() {
        assert!(validate_renewal_date(today() + Duration::days(28), today()).is_ok());
    }

    #[test]
    fn rejects_yesterday() {
        let err = validate_renewal_date(today() - Duration::days(1), today()).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Invalid date - renewal in past"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_twenty_nine_days_out() {
        let err = validate_renewal_date(today() + Duration::days(29), today()).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Invalid date - renewal more than 4 weeks ahead")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn accepts_dates_inside_the_window() {
        for days in 1..28 {
            assert!(validate_renewal_date(today() + Duration::days(days), today()).is_ok());
        }
    }
}
