//! Shared fixtures: an in-memory SQLite database built from the entities,
//! plus seed helpers for the directory tables.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema,
};
use unimanage::entities::sea_orm_active_enums::RoleEnum;
use unimanage::entities::{course, department, grade, notification, student, user};
use unimanage::repositories::{
    CourseRepository, DepartmentRepository, NewCourse, NewStudent, NewUser, StudentRepository,
    UserRepository,
};
use unimanage::services::access_filter::AccessScope;
use uuid::Uuid;

pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // a single connection keeps every query on the same in-memory database
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await.expect("connect sqlite");
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let tables = [
        schema.create_table_from_entity(department::Entity),
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(student::Entity),
        schema.create_table_from_entity(course::Entity),
        schema.create_table_from_entity(grade::Entity),
        schema.create_table_from_entity(notification::Entity),
    ];

    for table in tables {
        db.execute(backend.build(&table))
            .await
            .expect("create table");
    }

    db
}

pub async fn seed_department(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
    category: &str,
) -> department::Model {
    DepartmentRepository::new(db)
        .create(name.to_string(), code.to_string(), category.to_string())
        .await
        .expect("seed department")
}

pub async fn seed_student(
    db: &DatabaseConnection,
    department_id: Uuid,
    name: &str,
) -> student::Model {
    StudentRepository::new(db)
        .create(NewStudent {
            name: name.to_string(),
            email: format!("{}@uni.edu", name.to_lowercase().replace(' ', ".")),
            department_id,
            phone: None,
            address: None,
            enrollment_date: NaiveDate::from_ymd_opt(2024, 9, 1).expect("date"),
            entry_date: None,
            expected_graduation: None,
            advisor: None,
            year_level: 1,
        })
        .await
        .expect("seed student")
}

pub async fn seed_course(
    db: &DatabaseConnection,
    department_id: Uuid,
    code: &str,
    credit_hours: i32,
) -> course::Model {
    CourseRepository::new(db)
        .create(NewCourse {
            code: code.to_string(),
            name: format!("Course {}", code),
            credit_hours,
            instructor: "Dr. Hopper".to_string(),
            department_id,
            schedule: "Mon 09:00".to_string(),
            capacity: 30,
            semester: "Fall 2025".to_string(),
            room: "B-101".to_string(),
        })
        .await
        .expect("seed course")
}

pub async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    category: &str,
    role: RoleEnum,
) -> user::Model {
    // minimum cost keeps the suite fast
    let password_hash = bcrypt::hash(password, 4).expect("hash password");
    UserRepository::new(db)
        .create(NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash,
            department_category: category.to_string(),
            role,
        })
        .await
        .expect("seed user")
}

pub async fn reload_student(db: &DatabaseConnection, id: i32) -> student::Model {
    student::Entity::find_by_id(id)
        .one(db)
        .await
        .expect("load student")
        .expect("student exists")
}

pub async fn notification_titles(db: &DatabaseConnection) -> Vec<String> {
    notification::Entity::find()
        .all(db)
        .await
        .expect("load notifications")
        .into_iter()
        .map(|n| n.title)
        .collect()
}

pub async fn scope_for(db: &DatabaseConnection, category: &str) -> AccessScope {
    AccessScope::resolve(db, category)
        .await
        .expect("resolve scope")
}

/// "IT" holds Computer Science, "Business" holds Accounting.
pub struct Campus {
    pub cs: department::Model,
    pub accounting: department::Model,
}

pub async fn seed_campus(db: &DatabaseConnection) -> Campus {
    Campus {
        cs: seed_department(db, "Computer Science", "CS", "IT").await,
        accounting: seed_department(db, "Accounting", "ACC", "Business").await,
    }
}
