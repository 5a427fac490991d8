pub mod course;
pub mod lecture;
pub mod progress;
pub mod purchase;
pub mod user;

pub use course::{
    AdminCourse, Course, CourseDetail, NewCourseRequest, PublishedCourse, UpdateCourseRequest,
};
pub use lecture::{Lecture, NewLectureRequest, UpdateLectureRequest};
pub use progress::{CourseProgress, LectureProgress};
pub use purchase::{EnrollmentRow, Purchase, PurchaseWebhookRequest, TopCourse};
pub use user::{Role, UpdateRoleRequest, User};
