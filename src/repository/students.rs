use chrono::NaiveDate;
use model::entities::{student, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RepositoryError;

/// Request body for creating a student profile
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateStudentRequest {
    /// The user account this profile extends
    pub user_id: i32,
    pub date_of_birth: Option<NaiveDate>,
    pub enrollment_date: Option<NaiveDate>,
    /// Opaque handle to an externally stored image, `profiles/...`
    pub profile_photo: Option<String>,
}

/// Request body for updating a student profile; only provided fields change
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateStudentRequest {
    pub date_of_birth: Option<NaiveDate>,
    pub enrollment_date: Option<NaiveDate>,
    pub profile_photo: Option<String>,
}

/// Create a student profile for an existing user. At most one profile may
/// exist per user.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateStudentRequest,
) -> Result<student::Model, RepositoryError> {
    debug!("Creating student profile for user_id: {}", request.user_id);

    // Validate that the user exists
    if user::Entity::find_by_id(request.user_id).one(db).await?.is_none() {
        warn!(
            "Attempted to create student profile for non-existent user_id: {}",
            request.user_id
        );
        return Err(RepositoryError::InvalidReference(format!(
            "user with id {} does not exist",
            request.user_id
        )));
    }

    let new_student = student::ActiveModel {
        user_id: Set(request.user_id),
        date_of_birth: Set(request.date_of_birth),
        enrollment_date: Set(request.enrollment_date),
        profile_photo: Set(request.profile_photo),
        ..Default::default()
    };

    let student_model = new_student.insert(db).await.map_err(|err| {
        warn!(
            "Failed to create student profile for user {}: {}",
            request.user_id, err
        );
        RepositoryError::from_write_error(
            err,
            format!("user {} already has a student profile", request.user_id),
        )
    })?;

    info!("Student profile created with id {}", student_model.id);
    Ok(student_model)
}

/// Get a student by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<student::Model, RepositoryError> {
    student::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "student", id })
}

/// Get the student profile of a user, if one exists.
pub async fn get_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<student::Model>, RepositoryError> {
    Ok(student::Entity::find()
        .filter(student::Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// List all students.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<student::Model>, RepositoryError> {
    Ok(student::Entity::find().all(db).await?)
}

/// Update a student profile.
#[instrument(skip(db))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    request: UpdateStudentRequest,
) -> Result<student::Model, RepositoryError> {
    let existing = get(db, id).await?;
    let mut active: student::ActiveModel = existing.into();

    if let Some(date_of_birth) = request.date_of_birth {
        active.date_of_birth = Set(Some(date_of_birth));
    }
    if let Some(enrollment_date) = request.enrollment_date {
        active.enrollment_date = Set(Some(enrollment_date));
    }
    if let Some(profile_photo) = request.profile_photo {
        active.profile_photo = Set(Some(profile_photo));
    }

    let updated = active.update(db).await?;
    info!("Student {} updated", id);
    Ok(updated)
}

/// Delete a student. Enrollments, attendance, grades and invoices of the
/// student (and payments of those invoices) go with it; the user account
/// stays.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = student::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Student {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "student", id });
    }

    info!("Student {} deleted", id);
    Ok(())
}
