use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes;
use crate::services::grade_aggregator::{CourseRef, GpaReport, GradeView, StudentRef};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "token_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "JWT cookie issued by POST /login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "UniManage API",
        description = "Student, course and grade administration scoped by department category."
    ),
    paths(
        routes::auth::route::login,
        routes::auth::route::register,
        routes::auth::route::logout,
        routes::auth::route::list_users,
        routes::students::route::get_all_students,
        routes::students::route::get_student,
        routes::students::route::create_student,
        routes::students::route::update_student,
        routes::students::route::delete_student,
        routes::courses::route::get_all_courses,
        routes::courses::route::get_course,
        routes::courses::route::create_course,
        routes::courses::route::update_course,
        routes::courses::route::delete_course,
        routes::grades::route::get_department_grades,
        routes::grades::route::get_student_grades,
        routes::grades::route::add_grade,
        routes::grades::route::update_grade,
        routes::grades::route::delete_grade,
        routes::grades::route::get_gpa,
        routes::departments::route::get_departments,
        routes::departments::route::create_department,
        routes::notifications::route::get_notifications,
        routes::email::route::send_email,
        routes::health::route::health,
    ),
    components(schemas(
        routes::dto::MessageResponse,
        routes::dto::ErrorResponse,
        GpaReport,
        GradeView,
        StudentRef,
        CourseRef,
    )),
    tags(
        (name = "Authentication", description = "Login, logout and dashboard users"),
        (name = "Students", description = "Student records"),
        (name = "Courses", description = "Course catalog"),
        (name = "Grades", description = "Grades, credits and GPA"),
        (name = "Departments", description = "Departments and categories"),
        (name = "Notifications", description = "Activity feed"),
        (name = "Email", description = "Outbound email to students"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
