//! `SeaORM` entities

pub mod course;
pub mod department;
pub mod grade;
pub mod notification;
pub mod sea_orm_active_enums;
pub mod student;
pub mod user;
