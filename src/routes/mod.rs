pub mod auth;
pub mod courses;
pub mod departments;
pub mod dto;
pub mod email;
pub mod grades;
pub mod health;
pub mod notifications;
pub mod students;
