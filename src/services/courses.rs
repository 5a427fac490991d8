use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::{courses, lectures};
use crate::error::AppError;
use crate::media::{AssetKind, MediaStore};
use crate::models::{Course, Lecture, UpdateCourseRequest, UpdateLectureRequest};

/// Authoring operations that touch both the database and remote media:
/// thumbnail/video replacement and the manual cascade deletes.
pub struct CourseService {
    db: SqlitePool,
    media: Arc<dyn MediaStore>,
}

impl CourseService {
    pub fn new(db: SqlitePool, media: Arc<dyn MediaStore>) -> Self {
        Self { db, media }
    }

    /// Apply a metadata edit, and when a new thumbnail file is attached,
    /// upload it and delete the replaced remote asset.
    pub async fn edit_course(
        &self,
        course_id: &str,
        req: UpdateCourseRequest,
        thumbnail: Option<(String, Vec<u8>)>,
    ) -> Result<Course, AppError> {
        let existing = courses::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound("Course"))?;

        let mut course = courses::update_course(&self.db, course_id, req)
            .await?
            .ok_or(AppError::NotFound("Course"))?;

        if let Some((file_name, bytes)) = thumbnail {
            if let Some(old_id) = existing.thumbnail_public_id.as_deref() {
                if let Err(e) = self.media.destroy(AssetKind::Image, old_id).await {
                    warn!(course_id, "failed to delete replaced thumbnail: {}", e);
                }
            }

            let asset = self.media.upload(AssetKind::Image, &file_name, bytes).await?;
            courses::set_thumbnail(&self.db, course_id, &asset.url, &asset.public_id).await?;
            course.course_thumbnail = asset.url;
            course.thumbnail_public_id = Some(asset.public_id);
        }

        Ok(course)
    }

    /// Update a lecture; replacing the video deletes the previous remote
    /// asset before the new metadata is stored.
    pub async fn edit_lecture(
        &self,
        lecture_id: &str,
        req: UpdateLectureRequest,
    ) -> Result<Lecture, AppError> {
        let existing = lectures::find_lecture_by_id(&self.db, lecture_id)
            .await?
            .ok_or(AppError::NotFound("Lecture"))?;

        let replacing_video =
            req.public_id.is_some() && req.public_id != existing.public_id;
        if replacing_video {
            if let Some(old_id) = existing.public_id.as_deref() {
                if let Err(e) = self.media.destroy(AssetKind::Video, old_id).await {
                    warn!(lecture_id, "failed to delete replaced video: {}", e);
                }
            }
        }

        lectures::update_lecture(&self.db, lecture_id, req)
            .await?
            .ok_or(AppError::NotFound("Lecture"))
    }

    /// Remove a lecture: the record, the parent course's reference to it,
    /// and its remote video asset.
    pub async fn remove_lecture(&self, lecture_id: &str) -> Result<(), AppError> {
        let lecture = lectures::find_lecture_by_id(&self.db, lecture_id)
            .await?
            .ok_or(AppError::NotFound("Lecture"))?;

        if let Some(public_id) = lecture.public_id.as_deref() {
            if let Err(e) = self.media.destroy(AssetKind::Video, public_id).await {
                warn!(lecture_id, "failed to delete lecture video: {}", e);
            }
        }

        lectures::delete_lecture(&self.db, lecture_id).await?;
        info!(lecture_id, "lecture removed");
        Ok(())
    }

    /// Delete a course and everything it owns: every lecture record, each
    /// lecture's remote video, and the course thumbnail. Media failures are
    /// logged and skipped; the delete itself does not roll back.
    pub async fn remove_course(&self, course_id: &str) -> Result<(), AppError> {
        let course = courses::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound("Course"))?;

        let owned = lectures::fetch_course_lectures(&self.db, course_id).await?;
        for lecture in &owned {
            if let Some(public_id) = lecture.public_id.as_deref() {
                if let Err(e) = self.media.destroy(AssetKind::Video, public_id).await {
                    warn!(lecture_id = %lecture.id, "failed to delete lecture video: {}", e);
                }
            }
            lectures::delete_lecture(&self.db, &lecture.id).await?;
        }

        if let Some(thumb_id) = course.thumbnail_public_id.as_deref() {
            if let Err(e) = self.media.destroy(AssetKind::Image, thumb_id).await {
                warn!(course_id, "failed to delete course thumbnail: {}", e);
            }
        }

        courses::delete_course(&self.db, course_id).await?;
        info!(course_id, lecture_count = owned.len(), "course removed with cascade");
        Ok(())
    }
}
