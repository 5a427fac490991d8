use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::purchases;
use crate::error::AppError;
use crate::models::{EnrollmentRow, TopCourse};

const GROWTH_WINDOW_DAYS: i64 = 30;
const TOP_COURSES_LIMIT: i64 = 5;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMetrics {
    pub total_enrollments: i64,
    pub total_revenue: i64,
    pub enrollments_last_window: i64,
    pub revenue_last_window: i64,
    pub enrollment_growth_pct: f64,
    pub revenue_growth_pct: f64,
    pub top_courses: Vec<TopCourse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentPage {
    pub rows: Vec<EnrollmentRow>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Read-only aggregations over the purchase records. Every call recomputes
/// from what is currently persisted; nothing is cached or maintained
/// incrementally.
pub struct AnalyticsService {
    db: SqlitePool,
}

impl AnalyticsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn overview(&self) -> Result<OverviewMetrics, AppError> {
        self.overview_at(Utc::now()).await
    }

    /// Overview relative to a reference instant, so the rolling windows are
    /// deterministic under test.
    pub async fn overview_at(&self, now: DateTime<Utc>) -> Result<OverviewMetrics, AppError> {
        let window_start = (now - Duration::days(GROWTH_WINDOW_DAYS)).to_rfc3339();
        let prev_start = (now - Duration::days(2 * GROWTH_WINDOW_DAYS)).to_rfc3339();
        let now = now.to_rfc3339();

        let total_enrollments = purchases::total_enrollments(&self.db).await?;
        let total_revenue = purchases::total_revenue(&self.db).await?;

        let current_enrollments =
            purchases::count_enrollments_between(&self.db, &window_start, &now).await?;
        let previous_enrollments =
            purchases::count_enrollments_between(&self.db, &prev_start, &window_start).await?;

        let current_revenue = purchases::revenue_between(&self.db, &window_start, &now).await?;
        let previous_revenue =
            purchases::revenue_between(&self.db, &prev_start, &window_start).await?;

        let top_courses = purchases::top_courses_by_revenue(&self.db, TOP_COURSES_LIMIT).await?;

        Ok(OverviewMetrics {
            total_enrollments,
            total_revenue,
            enrollments_last_window: current_enrollments,
            revenue_last_window: current_revenue,
            enrollment_growth_pct: growth_pct(current_enrollments, previous_enrollments),
            revenue_growth_pct: growth_pct(current_revenue, previous_revenue),
            top_courses,
        })
    }

    pub async fn enrollments(
        &self,
        search: &str,
        page: i64,
        limit: i64,
    ) -> Result<EnrollmentPage, AppError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let rows = purchases::fetch_enrollments_page(&self.db, search, limit, offset).await?;
        let total = purchases::count_enrollments_matching(&self.db, search).await?;

        Ok(EnrollmentPage {
            rows,
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        })
    }
}

/// Percentage change of `current` against `previous`. An empty previous
/// window reads as +100% when anything happened and 0% otherwise.
fn growth_pct(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        if current > 0 { 100.0 } else { 0.0 }
    } else {
        (current - previous) as f64 / previous as f64 * 100.0
    }
}
