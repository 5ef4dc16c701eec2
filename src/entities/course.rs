//! `SeaORM` Entity for course table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "course"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub course_id: Uuid,
    pub code: String,
    pub name: String,
    pub credit_hours: i32,
    pub instructor: String,
    pub department_id: Uuid,
    pub schedule: String,
    pub capacity: i32,
    pub enrolled: i32,
    pub semester: String,
    pub room: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    CourseId,
    Code,
    Name,
    CreditHours,
    Instructor,
    DepartmentId,
    Schedule,
    Capacity,
    Enrolled,
    Semester,
    Room,
    CreatedAt,
    UpdatedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    CourseId,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Department,
    Grade,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::CourseId => ColumnType::Uuid.def(),
            Self::Code => ColumnType::String(StringLen::None).def().unique(),
            Self::Name => ColumnType::String(StringLen::None).def(),
            Self::CreditHours => ColumnType::Integer.def(),
            Self::Instructor => ColumnType::String(StringLen::None).def(),
            Self::DepartmentId => ColumnType::Uuid.def().indexed(),
            Self::Schedule => ColumnType::String(StringLen::None).def(),
            Self::Capacity => ColumnType::Integer.def(),
            Self::Enrolled => ColumnType::Integer.def(),
            Self::Semester => ColumnType::String(StringLen::None).def(),
            Self::Room => ColumnType::String(StringLen::None).def(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::UpdatedAt => ColumnType::DateTime.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Department => Entity::belongs_to(super::department::Entity)
                .from(Column::DepartmentId)
                .to(super::department::Column::DepartmentId)
                .into(),
            Self::Grade => Entity::has_many(super::grade::Entity).into(),
        }
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
