use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced at the persistence boundary.
///
/// A failed write is rejected whole; there is no partially applied state to
/// report. Deletes never fail on referential grounds because every
/// relationship carries an explicit cascade or set-null rule.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A required field is missing, or a value is outside its declared
    /// range or fixed-point precision.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The write would violate a uniqueness invariant.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced row does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The user assigned as a course teacher does not hold the TEACHER role.
    #[error("user {user_id} does not have the TEACHER role")]
    InvalidTeacherRole { user_id: i32 },

    /// The addressed row does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Classify a database error raised by an insert or update.
    ///
    /// The store reports uniqueness violations as generic execution errors,
    /// so the message is inspected to distinguish a conflict from an
    /// unrelated failure.
    pub fn from_write_error(err: DbErr, conflict_msg: impl Into<String>) -> Self {
        // Check for unique constraint violations
        let error_msg = err.to_string().to_lowercase();
        if error_msg.contains("unique") || error_msg.contains("constraint") {
            RepositoryError::Conflict(conflict_msg.into())
        } else {
            RepositoryError::Database(err)
        }
    }

    /// True when the error is the rejected-write kind: the caller sent
    /// something the schema does not accept, as opposed to the store
    /// failing.
    pub fn is_rejected_write(&self) -> bool {
        matches!(
            self,
            RepositoryError::Validation(_)
                | RepositoryError::Conflict(_)
                | RepositoryError::InvalidReference(_)
                | RepositoryError::InvalidTeacherRole { .. }
        )
    }
}

impl From<validator::ValidationErrors> for RepositoryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RepositoryError::Validation(errors.to_string())
    }
}
