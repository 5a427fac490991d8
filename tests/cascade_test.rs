mod common;

use std::sync::Arc;

use backend::db::{courses, lectures, users};
use backend::media::AssetKind;
use backend::models::{NewCourseRequest, UpdateLectureRequest};
use backend::services::CourseService;
use common::RecordingMediaStore;
use sqlx::SqlitePool;

async fn seed_course_with_lectures(db: &SqlitePool, n: usize) -> (String, Vec<String>) {
    let creator = users::insert_user(db, "uid-1", "Ada", "ada@example.com", None)
        .await
        .expect("Failed to insert user")
        .id;

    let course = courses::insert_course(
        db,
        NewCourseRequest {
            course_title: "Course".to_string(),
            category: "Business".to_string(),
        },
        &creator,
    )
    .await
    .expect("Failed to insert course");

    let mut lecture_ids = Vec::new();
    for i in 0..n {
        let lecture = lectures::insert_lecture(db, &course.id, &format!("Lecture {i}"))
            .await
            .expect("Failed to insert lecture");
        lectures::update_lecture(
            db,
            &lecture.id,
            UpdateLectureRequest {
                video_url: Some(format!("https://cdn/video-{i}.mp4")),
                public_id: Some(format!("videos/video-{i}")),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to set lecture video");
        lecture_ids.push(lecture.id);
    }

    (course.id, lecture_ids)
}

#[tokio::test]
async fn course_delete_cascades_over_lectures_and_media() {
    let db = common::setup_db().await;
    let (course_id, lecture_ids) = seed_course_with_lectures(&db, 3).await;

    let media = Arc::new(RecordingMediaStore::default());
    let service = CourseService::new(db.clone(), media.clone());

    service.remove_course(&course_id).await.expect("delete failed");

    assert!(
        courses::find_course_by_id(&db, &course_id)
            .await
            .expect("fetch failed")
            .is_none()
    );
    for id in &lecture_ids {
        assert!(
            lectures::find_lecture_by_id(&db, id)
                .await
                .expect("fetch failed")
                .is_none()
        );
    }

    let join_rows =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM course_lectures WHERE course_id = ?")
            .bind(&course_id)
            .fetch_one(&db)
            .await
            .expect("count failed");
    assert_eq!(join_rows, 0);

    // One destroy attempt per lecture video; no thumbnail was set.
    let destroyed = media.destroyed.lock().expect("log poisoned");
    assert_eq!(destroyed.len(), 3);
    assert!(destroyed.iter().all(|(kind, _)| *kind == AssetKind::Video));
}

#[tokio::test]
async fn course_delete_also_destroys_thumbnail() {
    let db = common::setup_db().await;
    let (course_id, _) = seed_course_with_lectures(&db, 2).await;

    courses::set_thumbnail(&db, &course_id, "https://cdn/thumb.png", "images/thumb")
        .await
        .expect("Failed to set thumbnail");

    let media = Arc::new(RecordingMediaStore::default());
    let service = CourseService::new(db.clone(), media.clone());

    service.remove_course(&course_id).await.expect("delete failed");

    let destroyed = media.destroyed.lock().expect("log poisoned");
    assert_eq!(destroyed.len(), 3);
    assert_eq!(
        destroyed
            .iter()
            .filter(|(kind, _)| *kind == AssetKind::Image)
            .count(),
        1
    );
}

#[tokio::test]
async fn lecture_removal_clears_parent_reference_and_asset() {
    let db = common::setup_db().await;
    let (course_id, lecture_ids) = seed_course_with_lectures(&db, 2).await;

    let media = Arc::new(RecordingMediaStore::default());
    let service = CourseService::new(db.clone(), media.clone());

    service
        .remove_lecture(&lecture_ids[0])
        .await
        .expect("remove failed");

    assert!(
        lectures::find_lecture_by_id(&db, &lecture_ids[0])
            .await
            .expect("fetch failed")
            .is_none()
    );
    assert!(
        lectures::find_parent_course_id(&db, &lecture_ids[0])
            .await
            .expect("fetch failed")
            .is_none()
    );

    // The sibling keeps its place in the course ordering.
    let remaining = lectures::fetch_course_lectures(&db, &course_id)
        .await
        .expect("fetch failed");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, lecture_ids[1]);

    let destroyed = media.destroyed.lock().expect("log poisoned");
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].1, "videos/video-0");
}

#[tokio::test]
async fn video_replacement_destroys_old_asset() {
    let db = common::setup_db().await;
    let (_, lecture_ids) = seed_course_with_lectures(&db, 1).await;

    let media = Arc::new(RecordingMediaStore::default());
    let service = CourseService::new(db.clone(), media.clone());

    let updated = service
        .edit_lecture(
            &lecture_ids[0],
            UpdateLectureRequest {
                video_url: Some("https://cdn/new.mp4".to_string()),
                public_id: Some("videos/new".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("edit failed");

    assert_eq!(updated.public_id.as_deref(), Some("videos/new"));

    let destroyed = media.destroyed.lock().expect("log poisoned");
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].1, "videos/video-0");
}
