pub mod analytics;
pub mod courses;
pub mod publication;

pub use analytics::{AnalyticsService, EnrollmentPage, OverviewMetrics};
pub use courses::CourseService;
pub use publication::{PublicationService, PublishOutcome, can_publish, missing_requirements};
