pub mod access_filter;
pub mod course_service;
pub mod grade_aggregator;
pub mod notification_emitter;
pub mod student_service;
