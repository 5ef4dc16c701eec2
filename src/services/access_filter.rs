//! Department-category scoping.
//!
//! A caller's `department_category` claim resolves to the set of department
//! ids they may see. Every read or write of a student, course, grade or
//! notification goes through an [`AccessScope`], single-record lookups
//! included, so there is exactly one place deciding visibility.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::department;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AccessScope {
    category: String,
    department_ids: Vec<Uuid>,
}

impl AccessScope {
    pub fn new(category: impl Into<String>, department_ids: Vec<Uuid>) -> Self {
        Self {
            category: category.into(),
            department_ids,
        }
    }

    /// Resolves every department whose category equals `category`.
    pub async fn resolve<C: ConnectionTrait>(db: &C, category: &str) -> Result<Self, AppError> {
        let departments = department::Entity::find()
            .filter(department::Column::Category.eq(category))
            .all(db)
            .await?;

        Ok(Self::new(
            category,
            departments.into_iter().map(|d| d.department_id).collect(),
        ))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn department_ids(&self) -> &[Uuid] {
        &self.department_ids
    }

    pub fn permits(&self, department_id: Uuid) -> bool {
        self.department_ids.contains(&department_id)
    }

    /// Out-of-scope records look exactly like missing ones.
    pub fn ensure_visible(&self, department_id: Uuid, what: &str) -> Result<(), AppError> {
        if self.permits(department_id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} not found", what)))
        }
    }

    /// Writes into a department the caller cannot see are refused outright.
    pub fn ensure_writable(&self, department_id: Uuid) -> Result<(), AppError> {
        if self.permits(department_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "department is outside category {}",
                self.category
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_scope_reads_report_not_found() {
        let it = Uuid::new_v4();
        let business = Uuid::new_v4();
        let scope = AccessScope::new("IT", vec![it]);

        assert!(scope.ensure_visible(it, "Student").is_ok());
        match scope.ensure_visible(business, "Student") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Student not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn out_of_scope_writes_are_forbidden() {
        let scope = AccessScope::new("IT", vec![Uuid::new_v4()]);
        assert!(matches!(
            scope.ensure_writable(Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn empty_category_permits_nothing() {
        let scope = AccessScope::new("Arts", Vec::new());
        assert!(scope.department_ids().is_empty());
        assert!(!scope.permits(Uuid::new_v4()));
    }
}
