mod support;

use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use unimanage::entities::grade;
use unimanage::error::AppError;
use unimanage::repositories::{CourseUpdate, NewCourse, NewStudent, NotificationRepository, StudentUpdate};
use unimanage::services::course_service::CourseService;
use unimanage::services::grade_aggregator::{AddGrade, GradeAggregator};
use unimanage::services::notification_emitter::OutboxSignal;
use unimanage::services::student_service::StudentService;
use uuid::Uuid;

use support::*;

fn new_student(name: &str, department_id: Uuid) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        email: format!("{}@uni.edu", name.to_lowercase()),
        department_id,
        phone: None,
        address: None,
        enrollment_date: chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        entry_date: None,
        expected_graduation: None,
        advisor: None,
        year_level: 1,
    }
}

fn new_course(code: &str, department_id: Uuid) -> NewCourse {
    NewCourse {
        code: code.to_string(),
        name: format!("Course {}", code),
        credit_hours: 3,
        instructor: "Dr. Liskov".to_string(),
        department_id,
        schedule: "Tue 10:00".to_string(),
        capacity: 40,
        semester: "Spring 2026".to_string(),
        room: "C-2".to_string(),
    }
}

#[tokio::test]
async fn it_callers_never_see_business_students() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    let ada = seed_student(&db, campus.cs.department_id, "Ada").await;
    let warren = seed_student(&db, campus.accounting.department_id, "Warren").await;
    let it = scope_for(&db, "IT").await;
    let students = StudentService::new(&db, &outbox);

    let listed = students.list(&it).await.unwrap();
    assert_eq!(listed.iter().map(|s| s.id).collect::<Vec<_>>(), vec![ada.id]);

    assert_eq!(students.get(&it, ada.id).await.unwrap().name, "Ada");
    match students.get(&it, warren.id).await {
        Err(AppError::NotFound(msg)) => assert_eq!(msg, "Student not found"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn out_of_scope_records_cannot_be_changed_or_graded() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    let warren = seed_student(&db, campus.accounting.department_id, "Warren").await;
    seed_course(&db, campus.accounting.department_id, "ACC101", 3).await;
    let it = scope_for(&db, "IT").await;

    let update = StudentService::new(&db, &outbox)
        .update(
            &it,
            warren.id,
            StudentUpdate {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(AppError::NotFound(_))));

    let delete = StudentService::new(&db, &outbox).delete(&it, warren.id).await;
    assert!(matches!(delete, Err(AppError::NotFound(_))));

    let graded = GradeAggregator::new(&db, &outbox)
        .add_grade(
            &it,
            AddGrade {
                student_id: warren.id,
                course_code: "ACC101".to_string(),
                grade: Decimal::new(30, 1),
                semester: "Fall 2025".to_string(),
            },
        )
        .await;
    assert!(matches!(graded, Err(AppError::NotFound(_))));

    let gpa = GradeAggregator::new(&db, &outbox)
        .compute_gpa(&it, warren.id)
        .await;
    assert!(matches!(gpa, Err(AppError::NotFound(_))));

    let course = CourseService::new(&db, &outbox).get_by_code(&it, "ACC101").await;
    assert!(matches!(course, Err(AppError::NotFound(_))));

    assert_eq!(reload_student(&db, warren.id).await.name, "Warren");
}

#[tokio::test]
async fn writes_into_foreign_departments_are_forbidden() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    let ada = seed_student(&db, campus.cs.department_id, "Ada").await;
    let it = scope_for(&db, "IT").await;

    let created = StudentService::new(&db, &outbox)
        .create(&it, new_student("Intruder", campus.accounting.department_id))
        .await;
    assert!(matches!(created, Err(AppError::Forbidden(_))));

    let moved = StudentService::new(&db, &outbox)
        .update(
            &it,
            ada.id,
            StudentUpdate {
                department_id: Some(campus.accounting.department_id),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(moved, Err(AppError::Forbidden(_))));

    let course = CourseService::new(&db, &outbox)
        .create(&it, new_course("ACC500", campus.accounting.department_id))
        .await;
    assert!(matches!(course, Err(AppError::Forbidden(_))));

    assert!(notification_titles(&db).await.is_empty());
}

#[tokio::test]
async fn department_grade_view_is_limited_to_the_category() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    let ada = seed_student(&db, campus.cs.department_id, "Ada").await;
    let warren = seed_student(&db, campus.accounting.department_id, "Warren").await;
    seed_course(&db, campus.cs.department_id, "CS101", 3).await;
    let it = scope_for(&db, "IT").await;
    let business = scope_for(&db, "Business").await;
    let aggregator = GradeAggregator::new(&db, &outbox);

    // cross-department enrollment: the course belongs to IT, the student to Business
    for (scope, student_id) in [(&it, ada.id), (&business, warren.id)] {
        aggregator
            .add_grade(
                scope,
                AddGrade {
                    student_id,
                    course_code: "CS101".to_string(),
                    grade: Decimal::new(25, 1),
                    semester: "Fall 2025".to_string(),
                },
            )
            .await
            .unwrap();
    }

    let it_view = aggregator.department_view(&it).await.unwrap();
    assert_eq!(it_view.len(), 1);
    assert_eq!(it_view[0].student.name, "Ada");

    let business_view = aggregator.department_view(&business).await.unwrap();
    assert_eq!(business_view.len(), 1);
    assert_eq!(business_view[0].student.name, "Warren");

    let it_feed = NotificationRepository::new(&db).find_in_scope(&it).await.unwrap();
    assert!(it_feed.iter().all(|n| n.department_id == Some(campus.cs.department_id)));
    assert_eq!(it_feed.len(), 1);
}

#[tokio::test]
async fn unknown_category_sees_nothing() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    seed_student(&db, campus.cs.department_id, "Ada").await;
    let arts = scope_for(&db, "Arts").await;

    assert!(arts.department_ids().is_empty());
    assert!(StudentService::new(&db, &outbox).list(&arts).await.unwrap().is_empty());
    assert!(
        GradeAggregator::new(&db, &outbox)
            .department_view(&arts)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deleting_a_student_removes_their_grades() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    let ada = seed_student(&db, campus.cs.department_id, "Ada").await;
    seed_course(&db, campus.cs.department_id, "CS101", 3).await;
    let it = scope_for(&db, "IT").await;

    GradeAggregator::new(&db, &outbox)
        .add_grade(
            &it,
            AddGrade {
                student_id: ada.id,
                course_code: "CS101".to_string(),
                grade: Decimal::new(40, 1),
                semester: "Fall 2025".to_string(),
            },
        )
        .await
        .unwrap();

    StudentService::new(&db, &outbox).delete(&it, ada.id).await.unwrap();

    assert!(grade::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(
        notification_titles(&db)
            .await
            .contains(&"Student Deleted".to_string())
    );
}

#[tokio::test]
async fn course_lifecycle_emits_notifications_and_cascades_grades() {
    let db = setup_db().await;
    let outbox = OutboxSignal::default();
    let campus = seed_campus(&db).await;
    let ada = seed_student(&db, campus.cs.department_id, "Ada").await;
    let it = scope_for(&db, "IT").await;
    let courses = CourseService::new(&db, &outbox);

    courses
        .create(&it, new_course("CS404", campus.cs.department_id))
        .await
        .unwrap();
    assert!(matches!(
        courses
            .create(&it, new_course("CS404", campus.cs.department_id))
            .await,
        Err(AppError::Duplicate(_))
    ));

    let updated = courses
        .update(
            &it,
            "CS404",
            CourseUpdate {
                credit_hours: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.credit_hours, 4);

    GradeAggregator::new(&db, &outbox)
        .add_grade(
            &it,
            AddGrade {
                student_id: ada.id,
                course_code: "CS404".to_string(),
                grade: Decimal::new(20, 1),
                semester: "Spring 2026".to_string(),
            },
        )
        .await
        .unwrap();

    courses.delete(&it, "CS404").await.unwrap();
    assert!(grade::Entity::find().all(&db).await.unwrap().is_empty());
    assert!(matches!(
        courses.get_by_code(&it, "CS404").await,
        Err(AppError::NotFound(_))
    ));

    let titles = notification_titles(&db).await;
    for expected in ["New Course Added", "Course Info Changed", "Course Deleted"] {
        assert!(titles.contains(&expected.to_string()), "missing {}", expected);
    }
}
