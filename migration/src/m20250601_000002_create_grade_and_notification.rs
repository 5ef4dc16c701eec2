use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Grade::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grade::GradeId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Grade::StudentId).integer().not_null())
                    .col(ColumnDef::new(Grade::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Grade::Grade).decimal_len(3, 2).not_null())
                    .col(ColumnDef::new(Grade::Semester).string().not_null())
                    .col(
                        ColumnDef::new(Grade::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(Grade::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_student")
                            .from_tbl(Grade::Table)
                            .from_col(Grade::StudentId)
                            .to_tbl(Student::Table)
                            .to_col(Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_course")
                            .from_tbl(Grade::Table)
                            .from_col(Grade::CourseId)
                            .to_tbl(Course::Table)
                            .to_col(Course::CourseId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One grade per (student, course)
        manager
            .create_index(
                Index::create()
                    .name("uq_grade_student_course")
                    .table(Grade::Table)
                    .col(Grade::StudentId)
                    .col(Grade::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::NotificationId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(Notification::Title).string().not_null())
                    .col(ColumnDef::new(Notification::Description).text().not_null())
                    .col(ColumnDef::new(Notification::DepartmentId).uuid().null())
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(ColumnDef::new(Notification::DispatchedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_department")
                            .from_tbl(Notification::Table)
                            .from_col(Notification::DepartmentId)
                            .to_tbl(Department::Table)
                            .to_col(Department::DepartmentId)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The outbox dispatcher scans for undispatched rows oldest first
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_dispatched_at_created_at")
                    .table(Notification::Table)
                    .col(Notification::DispatchedAt)
                    .col(Notification::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_notification_dispatched_at_created_at")
                    .table(Notification::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_grade_student_course")
                    .table(Grade::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Grade::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Grade {
    Table,
    GradeId,
    StudentId,
    CourseId,
    Grade,
    Semester,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    NotificationId,
    Title,
    Description,
    DepartmentId,
    CreatedAt,
    DispatchedAt,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Course {
    Table,
    CourseId,
}

#[derive(DeriveIden)]
enum Department {
    Table,
    DepartmentId,
}
