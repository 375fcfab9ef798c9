//! Employee lifecycle service. Owns the duplicate-email rule on create;
//! every other operation is a straight pass-through to storage.

use std::sync::Arc;

use entity::employee;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shared service result type.
pub type ServiceResult<T> = Result<T, EmployeeError>;

#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("employee with email {0} already exists")]
    DuplicateEmail(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Client-supplied employee fields; the id is assigned by storage on insert.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone)]
pub struct EmployeeService {
    db: Arc<DatabaseConnection>,
}

impl EmployeeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new employee unless the email is already taken.
    ///
    /// The existence check and the insert are two round-trips with no
    /// transaction between them; the unique index on `email` catches the
    /// window where two creates race past the check.
    pub async fn create(&self, input: NewEmployee) -> ServiceResult<employee::Model> {
        let existing = employee::Entity::find()
            .filter(employee::Column::Email.eq(input.email.clone()))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(EmployeeError::DuplicateEmail(input.email));
        }
        let created = employee::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        info!(id = created.id, "employee created");
        Ok(created)
    }

    /// Every stored employee, in storage order.
    pub async fn list(&self) -> ServiceResult<Vec<employee::Model>> {
        Ok(employee::Entity::find().all(self.db.as_ref()).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<employee::Model>> {
        Ok(employee::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?)
    }

    /// Persist the given record as-is. Callers resolve the existing row and
    /// apply field changes first; there is no uniqueness re-check and no
    /// concurrency token, so the last write wins.
    pub async fn update(&self, employee: employee::Model) -> ServiceResult<employee::Model> {
        let active = employee::ActiveModel {
            id: Unchanged(employee.id),
            first_name: Set(employee.first_name),
            last_name: Set(employee.last_name),
            email: Set(employee.email),
        };
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Remove the record if present; a missing id is a no-op.
    pub async fn delete_by_id(&self, id: i64) -> ServiceResult<()> {
        employee::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
