mod support;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{Value, json};
use tower::ServiceExt;
use unimanage::app::create_router;
use unimanage::entities::sea_orm_active_enums::RoleEnum;
use unimanage::entities::user;
use unimanage::state::AppState;
use unimanage::utils::jwt::JwtManager;
use uuid::Uuid;

use support::*;

const SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    jwt: JwtManager,
}

impl TestApp {
    async fn new() -> Self {
        let db = setup_db().await;
        let jwt = JwtManager::new(SECRET);
        let router = create_router(AppState::new(db.clone(), jwt.clone(), 3600));
        Self { router, db, jwt }
    }

    async fn user_with_token(&self, role: RoleEnum, category: &str) -> (user::Model, String) {
        let email = format!("{}@staff.uni.edu", Uuid::new_v4().simple());
        let user = seed_user(&self.db, &email, "correct-horse", category, role).await;
        let token = self
            .jwt
            .create_jwt(
                &user.user_id.to_string(),
                &user.name,
                user.role.clone(),
                &user.department_category,
                3600,
            )
            .unwrap();
        (user, token)
    }

    async fn token(&self, role: RoleEnum, category: &str) -> String {
        self.user_with_token(role, category).await.1
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, value)
    }
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new().await;

    let (status, _, body) = app.send(Method::GET, "/grades", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "no token found!");

    let (status, _, _) = app
        .send(Method::GET, "/api/students", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_http_only_cookie_and_cookie_authenticates() {
    let app = TestApp::new().await;
    seed_user(&app.db, "staff@uni.edu", "correct-horse", "IT", RoleEnum::Staff).await;

    let (status, headers, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "staff@uni.edu", "password": "correct-horse" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful!");
    assert_eq!(body["user"]["email"], "staff@uni.edu");
    assert!(body["user"].get("password").is_none());

    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let token_pair = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/dept")
        .header(header::COOKIE, token_pair)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleted_user_loses_access_before_the_token_expires() {
    let app = TestApp::new().await;
    let (staff, token) = app.user_with_token(RoleEnum::Staff, "IT").await;

    let (status, _, _) = app.send(Method::GET, "/dept", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    user::Entity::delete_by_id(staff.user_id)
        .exec(&app.db)
        .await
        .unwrap();

    let (status, _, body) = app.send(Method::GET, "/dept", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "user no longer exists");
}

#[tokio::test]
async fn scope_follows_the_current_department_category() {
    let app = TestApp::new().await;
    let campus = seed_campus(&app.db).await;
    let (staff, token) = app.user_with_token(RoleEnum::Staff, "IT").await;

    let (_, _, before) = app.send(Method::GET, "/dept", Some(&token), None).await;
    assert_eq!(before[0]["departmentId"], campus.cs.department_id.to_string());

    let mut moved: user::ActiveModel = staff.into();
    moved.department_category = Set("Business".to_string());
    moved.update(&app.db).await.unwrap();

    let (status, _, after) = app.send(Method::GET, "/dept", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = after
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|dept| dept["departmentId"].as_str())
        .collect();
    assert_eq!(ids, vec![campus.accounting.department_id.to_string().as_str()]);
}

#[tokio::test]
async fn valid_bearer_header_wins_over_a_stale_cookie() {
    let app = TestApp::new().await;
    let token = app.token(RoleEnum::Staff, "IT").await;

    let request = Request::builder()
        .uri("/dept")
        .header(header::COOKIE, "token=expired-or-forged")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::new().await;
    seed_user(&app.db, "staff@uni.edu", "correct-horse", "IT", RoleEnum::Staff).await;

    let (status, _, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "staff@uni.edu", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password.");

    let (status, _, body) = app
        .send(Method::POST, "/login", None, Some(json!({ "email": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required.");
}

#[tokio::test]
async fn grade_flow_over_http_reports_gpa() {
    let app = TestApp::new().await;
    let campus = seed_campus(&app.db).await;
    let token = app.token(RoleEnum::Staff, "IT").await;

    let (status, _, created) = app
        .send(
            Method::POST,
            "/api/students",
            Some(&token),
            Some(json!({
                "name": "Ada Lovelace",
                "email": "ada@uni.edu",
                "departmentId": campus.cs.department_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let student_id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["totalCredits"], 0);

    let (status, _, _) = app
        .send(
            Method::POST,
            "/courses",
            Some(&token),
            Some(json!({
                "code": "CS101",
                "name": "Intro to Programming",
                "creditHours": 3,
                "instructor": "Dr. Hopper",
                "departmentId": campus.cs.department_id,
                "semester": "Fall 2025",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, added) = app
        .send(
            Method::POST,
            "/grades",
            Some(&token),
            Some(json!({
                "student": student_id,
                "course": "CS101",
                "grade": 3.5,
                "semester": "Fall 2025",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let grade_id = added["data"]["gradeId"].as_str().unwrap().to_string();

    let (status, _, duplicate) = app
        .send(
            Method::POST,
            "/grades",
            Some(&token),
            Some(json!({
                "student": student_id,
                "course": "CS101",
                "grade": 2.0,
                "semester": "Fall 2025",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["message"], "This course was already entered!");

    let (status, _, gpa) = app
        .send(
            Method::GET,
            &format!("/grades/gpa/{}", student_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gpa["GPA"], "3.50");
    assert_eq!(gpa["totalCredits"], 3);
    assert_eq!(gpa["studentId"], student_id);
    assert_eq!(gpa["student"], "Ada Lovelace");

    let (status, _, _) = app
        .send(
            Method::PUT,
            &format!("/grades/{}", grade_id),
            Some(&token),
            Some(json!({ "grade": 3.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, gpa) = app
        .send(
            Method::GET,
            &format!("/grades/gpa/{}", student_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(gpa["GPA"], "3.00");
    assert_eq!(gpa["totalCredits"], 3);

    let (status, _, listed) = app
        .send(
            Method::GET,
            &format!("/grades/{}", student_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["course"]["courseId"], "CS101");

    let (status, _, feed) = app.send(Method::GET, "/notify", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = feed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["title"].as_str())
        .collect();
    assert!(titles.contains(&"Course Completed"));
    assert!(titles.contains(&"Grade Updated"));
}

#[tokio::test]
async fn grade_values_outside_the_scale_are_bad_requests() {
    let app = TestApp::new().await;
    let campus = seed_campus(&app.db).await;
    let student = seed_student(&app.db, campus.cs.department_id, "Ada").await;
    seed_course(&app.db, campus.cs.department_id, "CS101", 3).await;
    let token = app.token(RoleEnum::Staff, "IT").await;

    let (status, _, _) = app
        .send(
            Method::POST,
            "/grades",
            Some(&token),
            Some(json!({
                "student": student.id,
                "course": "CS101",
                "grade": 4.5,
                "semester": "Fall 2025",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_categories_get_not_found_for_single_records() {
    let app = TestApp::new().await;
    let campus = seed_campus(&app.db).await;
    let warren = seed_student(&app.db, campus.accounting.department_id, "Warren").await;
    let token = app.token(RoleEnum::Staff, "IT").await;

    let (status, _, body) = app
        .send(
            Method::GET,
            &format!("/api/students/{}", warren.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");

    let (status, _, _) = app
        .send(
            Method::POST,
            "/api/students",
            Some(&token),
            Some(json!({
                "name": "Intruder",
                "email": "intruder@uni.edu",
                "departmentId": campus.accounting.department_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, depts) = app.send(Method::GET, "/dept", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(depts.as_array().unwrap().len(), 1);
    assert_eq!(depts[0]["code"], "CS");
}

#[tokio::test]
async fn admin_only_routes_reject_staff() {
    let app = TestApp::new().await;
    let staff = app.token(RoleEnum::Staff, "IT").await;
    let admin = app.token(RoleEnum::Admin, "IT").await;
    let new_user = json!({
        "name": "Dana",
        "email": "dana@uni.edu",
        "password": "long-enough-password",
        "departmentCategory": "IT",
    });

    let (status, _, body) = app
        .send(Method::POST, "/register", Some(&staff), Some(new_user.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied");

    let (status, _, body) = app
        .send(Method::POST, "/register", Some(&admin), Some(new_user.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "staff");

    let (status, _, _) = app
        .send(Method::POST, "/register", Some(&admin), Some(new_user))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, users) = app.send(Method::GET, "/user", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    // the two callers plus the registered user
    assert_eq!(users.as_array().unwrap().len(), 3);

    let (status, _, _) = app
        .send(
            Method::POST,
            "/dept",
            Some(&staff),
            Some(json!({ "name": "Marketing", "code": "MKT", "category": "Business" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, dept) = app
        .send(
            Method::POST,
            "/dept",
            Some(&admin),
            Some(json!({ "name": "Marketing", "code": "MKT", "category": "Business" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(dept["category"], "Business");
}

#[tokio::test]
async fn email_without_a_mail_queue_is_unavailable() {
    let app = TestApp::new().await;
    let campus = seed_campus(&app.db).await;
    let ada = seed_student(&app.db, campus.cs.department_id, "Ada").await;
    let token = app.token(RoleEnum::Staff, "IT").await;

    let (status, _, _) = app
        .send(
            Method::POST,
            &format!("/email/{}", ada.id),
            Some(&token),
            Some(json!({ "subject": "Report", "body": "See attached." })),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn logout_clears_the_cookie_and_health_is_open() {
    let app = TestApp::new().await;

    let (status, headers, body) = app.send(Method::GET, "/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "logged out");
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));

    let (status, _, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");
}
