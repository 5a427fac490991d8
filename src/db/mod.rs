pub mod courses;
pub mod lectures;
pub mod progress;
pub mod purchases;
pub mod users;
