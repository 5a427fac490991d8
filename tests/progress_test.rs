mod common;

use backend::db::{courses, lectures, progress, users};
use backend::models::NewCourseRequest;
use sqlx::SqlitePool;

async fn seed(db: &SqlitePool) -> (String, String, Vec<String>) {
    let instructor = users::insert_user(db, "uid-i", "Ada", "ada@example.com", None)
        .await
        .expect("Failed to insert user")
        .id;
    let student = users::insert_user(db, "uid-s", "Grace", "grace@example.com", None)
        .await
        .expect("Failed to insert user")
        .id;

    let course = courses::insert_course(
        db,
        NewCourseRequest {
            course_title: "Course".to_string(),
            category: "Business".to_string(),
        },
        &instructor,
    )
    .await
    .expect("Failed to insert course");

    let mut lecture_ids = Vec::new();
    for i in 0..3 {
        let lecture = lectures::insert_lecture(db, &course.id, &format!("Lecture {i}"))
            .await
            .expect("Failed to insert lecture");
        lecture_ids.push(lecture.id);
    }

    (student, course.id, lecture_ids)
}

#[tokio::test]
async fn fresh_course_reads_as_unviewed() {
    let db = common::setup_db().await;
    let (student, course_id, lecture_ids) = seed(&db).await;

    let p = progress::fetch_course_progress(&db, &student, &course_id)
        .await
        .expect("fetch failed");

    assert!(!p.completed);
    assert_eq!(p.lectures.len(), 3);
    assert!(p.lectures.iter().all(|l| !l.viewed));
    // Authoring order is preserved.
    let ids: Vec<&str> = p.lectures.iter().map(|l| l.lecture_id.as_str()).collect();
    assert_eq!(ids, lecture_ids.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn viewing_lectures_does_not_complete_the_course() {
    let db = common::setup_db().await;
    let (student, course_id, lecture_ids) = seed(&db).await;

    for id in &lecture_ids {
        progress::mark_lecture_viewed(&db, &student, id)
            .await
            .expect("mark failed");
    }

    let p = progress::fetch_course_progress(&db, &student, &course_id)
        .await
        .expect("fetch failed");

    assert!(p.lectures.iter().all(|l| l.viewed));
    assert!(!p.completed);
}

#[tokio::test]
async fn complete_and_incomplete_are_symmetric() {
    let db = common::setup_db().await;
    let (student, course_id, _) = seed(&db).await;

    progress::set_course_completed(&db, &student, &course_id, true)
        .await
        .expect("complete failed");

    let p = progress::fetch_course_progress(&db, &student, &course_id)
        .await
        .expect("fetch failed");
    assert!(p.completed);
    assert!(p.lectures.iter().all(|l| l.viewed));

    progress::set_course_completed(&db, &student, &course_id, false)
        .await
        .expect("incomplete failed");

    let p = progress::fetch_course_progress(&db, &student, &course_id)
        .await
        .expect("fetch failed");
    assert!(!p.completed);
    assert!(p.lectures.iter().all(|l| !l.viewed));
}

#[tokio::test]
async fn marking_viewed_is_idempotent() {
    let db = common::setup_db().await;
    let (student, course_id, lecture_ids) = seed(&db).await;

    progress::mark_lecture_viewed(&db, &student, &lecture_ids[0])
        .await
        .expect("mark failed");
    progress::mark_lecture_viewed(&db, &student, &lecture_ids[0])
        .await
        .expect("mark failed");

    let p = progress::fetch_course_progress(&db, &student, &course_id)
        .await
        .expect("fetch failed");
    assert_eq!(p.lectures.iter().filter(|l| l.viewed).count(), 1);
}
