use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Department::DepartmentId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(
                        ColumnDef::new(Department::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Department::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Department::Category).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_department_category")
                    .table(Department::Table)
                    .col(Department::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::DepartmentCategory).string().not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Student::Name).string().not_null())
                    .col(ColumnDef::new(Student::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Student::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Student::Phone).string().null())
                    .col(ColumnDef::new(Student::Address).string().null())
                    .col(ColumnDef::new(Student::EnrollmentDate).date().not_null())
                    .col(ColumnDef::new(Student::EntryDate).date().null())
                    .col(ColumnDef::new(Student::ExpectedGraduation).date().null())
                    .col(ColumnDef::new(Student::Advisor).string().null())
                    .col(
                        ColumnDef::new(Student::YearLevel)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Student::TotalCredits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Student::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_department")
                            .from_tbl(Student::Table)
                            .from_col(Student::DepartmentId)
                            .to_tbl(Department::Table)
                            .to_col(Department::DepartmentId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_department_id")
                    .table(Student::Table)
                    .col(Student::DepartmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Course::CourseId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Course::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Course::Name).string().not_null())
                    .col(ColumnDef::new(Course::CreditHours).integer().not_null())
                    .col(ColumnDef::new(Course::Instructor).string().not_null())
                    .col(ColumnDef::new(Course::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Course::Schedule).string().not_null())
                    .col(ColumnDef::new(Course::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Course::Enrolled)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Course::Semester).string().not_null())
                    .col(ColumnDef::new(Course::Room).string().not_null())
                    .col(
                        ColumnDef::new(Course::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Course::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_department")
                            .from_tbl(Course::Table)
                            .from_col(Course::DepartmentId)
                            .to_tbl(Department::Table)
                            .to_col(Department::DepartmentId)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_department_id")
                    .table(Course::Table)
                    .col(Course::DepartmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Department::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Department {
    Table,
    DepartmentId,
    Name,
    Code,
    Category,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    UserId,
    Name,
    Email,
    Password,
    DepartmentCategory,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Student {
    Table,
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

#[derive(DeriveIden)]
enum Course {
    Table,
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
