pub mod course_repository;
pub mod department_repository;
pub mod grade_repository;
pub mod notification_repository;
pub mod student_repository;
pub mod user_repository;

pub use course_repository::{CourseRepository, CourseUpdate, NewCourse};
pub use department_repository::DepartmentRepository;
pub use grade_repository::GradeRepository;
pub use notification_repository::NotificationRepository;
pub use student_repository::{NewStudent, StudentRepository, StudentUpdate};
pub use user_repository::{NewUser, UserRepository};
