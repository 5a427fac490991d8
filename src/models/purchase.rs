use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub amount: i64,
    pub status: String,
    pub payment_ref: Option<String>,
    pub created_at: String,
}

/// Payload delivered by the payment provider's webhook once a checkout
/// session settles. Only completed purchases enroll the student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWebhookRequest {
    pub user_id: String,
    pub course_id: String,
    pub amount: i64,
    pub payment_ref: Option<String>,
}

/// One row of the top-courses-by-revenue listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopCourse {
    pub course_id: String,
    pub course_title: String,
    pub revenue: i64,
    pub enrollments: i64,
}

/// One row of the admin enrollment listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRow {
    pub purchase_id: String,
    pub student_name: String,
    pub student_email: String,
    pub course_title: String,
    pub amount: i64,
    pub created_at: String,
}
