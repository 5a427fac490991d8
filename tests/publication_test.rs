mod common;

use backend::db::{courses, lectures, users};
use backend::error::AppError;
use backend::models::{Course, NewCourseRequest, UpdateCourseRequest};
use backend::services::publication::{PublicationService, can_publish, missing_requirements};
use sqlx::SqlitePool;

fn ready_course() -> Course {
    Course {
        id: "c1".to_string(),
        course_title: "React Basics".to_string(),
        sub_title: "From zero to components".to_string(),
        description: "A complete introduction".to_string(),
        category: "Frontend Development".to_string(),
        course_level: "Beginner".to_string(),
        course_price: 499,
        course_thumbnail: String::new(),
        thumbnail_public_id: None,
        creator_id: "u1".to_string(),
        is_published: false,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

#[test]
fn readiness_requires_every_field_and_a_lecture() {
    let course = ready_course();
    assert!(can_publish(&course, 1));

    let mut c = ready_course();
    c.course_title = String::new();
    assert!(!can_publish(&c, 1));

    let mut c = ready_course();
    c.sub_title = String::new();
    assert!(!can_publish(&c, 1));

    let mut c = ready_course();
    c.description = String::new();
    assert!(!can_publish(&c, 1));

    let mut c = ready_course();
    c.category = String::new();
    assert!(!can_publish(&c, 1));

    let mut c = ready_course();
    c.course_level = String::new();
    assert!(!can_publish(&c, 1));

    let mut c = ready_course();
    c.course_price = 0;
    assert!(!can_publish(&c, 1));

    // All fields set but no lectures.
    assert!(!can_publish(&course, 0));
}

#[test]
fn missing_requirements_names_every_gap() {
    let mut c = ready_course();
    c.sub_title = String::new();
    c.course_price = 0;

    let missing = missing_requirements(&c, 0);
    assert_eq!(missing, vec!["subTitle", "coursePrice", "lectures"]);
}

async fn seed_instructor(db: &SqlitePool) -> String {
    users::insert_user(db, "uid-1", "Ada", "ada@example.com", None)
        .await
        .expect("Failed to insert user")
        .id
}

#[tokio::test]
async fn publish_is_rejected_server_side_for_unready_course() {
    let db = common::setup_db().await;
    let creator = seed_instructor(&db).await;

    let course = courses::insert_course(
        &db,
        NewCourseRequest {
            course_title: "X".to_string(),
            category: "Y".to_string(),
        },
        &creator,
    )
    .await
    .expect("Failed to insert course");

    let service = PublicationService::new(db.clone());
    let err = service
        .set_publish_state(&course.id, true)
        .await
        .expect_err("publish of unready course must fail");
    assert!(matches!(err, AppError::Validation(_)));

    let stored = courses::find_course_by_id(&db, &course.id)
        .await
        .expect("Failed to fetch course")
        .expect("course exists");
    assert!(!stored.is_published);
}

#[tokio::test]
async fn unpublish_is_idempotent_on_draft_course() {
    let db = common::setup_db().await;
    let creator = seed_instructor(&db).await;

    let course = courses::insert_course(
        &db,
        NewCourseRequest {
            course_title: "Draft".to_string(),
            category: "Business".to_string(),
        },
        &creator,
    )
    .await
    .expect("Failed to insert course");

    let service = PublicationService::new(db.clone());
    let outcome = service
        .set_publish_state(&course.id, false)
        .await
        .expect("unpublishing a draft must succeed");
    assert!(!outcome.is_published);

    let stored = courses::find_course_by_id(&db, &course.id)
        .await
        .expect("Failed to fetch course")
        .expect("course exists");
    assert!(!stored.is_published);
}

#[tokio::test]
async fn admin_toggle_flips_regardless_of_readiness() {
    let db = common::setup_db().await;
    let creator = seed_instructor(&db).await;

    // Deliberately incomplete: no subtitle, no price, no lectures.
    let course = courses::insert_course(
        &db,
        NewCourseRequest {
            course_title: "Incomplete".to_string(),
            category: "Business".to_string(),
        },
        &creator,
    )
    .await
    .expect("Failed to insert course");

    let service = PublicationService::new(db.clone());

    let outcome = service.admin_toggle(&course.id).await.expect("toggle on");
    assert!(outcome.is_published);

    let outcome = service.admin_toggle(&course.id).await.expect("toggle off");
    assert!(!outcome.is_published);
}

#[tokio::test]
async fn toggle_unknown_course_is_not_found() {
    let db = common::setup_db().await;
    let service = PublicationService::new(db.clone());

    let err = service
        .set_publish_state("missing", true)
        .await
        .expect_err("unknown id must fail");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn authoring_flow_reaches_published_once_complete() {
    let db = common::setup_db().await;
    let creator = seed_instructor(&db).await;

    // Created with title and category only.
    let course = courses::insert_course(
        &db,
        NewCourseRequest {
            course_title: "X".to_string(),
            category: "Y".to_string(),
        },
        &creator,
    )
    .await
    .expect("Failed to insert course");

    let service = PublicationService::new(db.clone());

    // First attempt fails readiness.
    assert!(service.set_publish_state(&course.id, true).await.is_err());

    // Fill in the remaining fields and add one lecture.
    courses::update_course(
        &db,
        &course.id,
        UpdateCourseRequest {
            sub_title: Some("Subtitle".to_string()),
            description: Some("Description".to_string()),
            course_level: Some("Beginner".to_string()),
            course_price: Some(199),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to update course");

    lectures::insert_lecture(&db, &course.id, "Intro")
        .await
        .expect("Failed to insert lecture");

    let outcome = service
        .set_publish_state(&course.id, true)
        .await
        .expect("publish must succeed once complete");
    assert!(outcome.is_published);

    let stored = courses::find_course_by_id(&db, &course.id)
        .await
        .expect("Failed to fetch course")
        .expect("course exists");
    assert!(stored.is_published);
}
