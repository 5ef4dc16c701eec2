//! `SeaORM` Entity for student table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "student"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub department_id: Uuid,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub enrollment_date: Date,
    pub entry_date: Option<Date>,
    pub expected_graduation: Option<Date>,
    pub advisor: Option<String>,
    pub year_level: i32,
    pub total_credits: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    Name,
    Email,
    DepartmentId,
    Phone,
    Address,
    EnrollmentDate,
    EntryDate,
    ExpectedGraduation,
    Advisor,
    YearLevel,
    TotalCredits,
    CreatedAt,
    UpdatedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Id,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = i32;
    fn auto_increment() -> bool {
        true
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
            Self::Id => ColumnType::Integer.def(),
            Self::Name => ColumnType::String(StringLen::None).def(),
            Self::Email => ColumnType::String(StringLen::None).def().unique(),
            Self::DepartmentId => ColumnType::Uuid.def().indexed(),
            Self::Phone => ColumnType::String(StringLen::None).def().null(),
            Self::Address => ColumnType::String(StringLen::None).def().null(),
            Self::EnrollmentDate => ColumnType::Date.def(),
            Self::EntryDate => ColumnType::Date.def().null(),
            Self::ExpectedGraduation => ColumnType::Date.def().null(),
            Self::Advisor => ColumnType::String(StringLen::None).def().null(),
            Self::YearLevel => ColumnType::Integer.def(),
            Self::TotalCredits => ColumnType::Integer.def(),
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
