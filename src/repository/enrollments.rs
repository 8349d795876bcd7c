use model::entities::{course, enrollment, student};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RepositoryError;
use crate::repository::today;

/// Request body for enrolling a student in a course
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i32,
    pub course_id: i32,
}

/// Enroll a student in a course. The enrollment date is stamped with the
/// current date and never changes afterwards; there is no update path for
/// an enrollment.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateEnrollmentRequest,
) -> Result<enrollment::Model, RepositoryError> {
    debug!(
        "Enrolling student {} in course {}",
        request.student_id, request.course_id
    );

    // Validate that both ends of the link exist
    if student::Entity::find_by_id(request.student_id).one(db).await?.is_none() {
        return Err(RepositoryError::InvalidReference(format!(
            "student with id {} does not exist",
            request.student_id
        )));
    }
    if course::Entity::find_by_id(request.course_id).one(db).await?.is_none() {
        return Err(RepositoryError::InvalidReference(format!(
            "course with id {} does not exist",
            request.course_id
        )));
    }

    let new_enrollment = enrollment::ActiveModel {
        student_id: Set(request.student_id),
        course_id: Set(request.course_id),
        enrolled_on: Set(today()),
        ..Default::default()
    };

    let enrollment_model = new_enrollment.insert(db).await.map_err(|err| {
        warn!(
            "Failed to enroll student {} in course {}: {}",
            request.student_id, request.course_id, err
        );
        RepositoryError::from_write_error(
            err,
            format!(
                "student {} is already enrolled in course {}",
                request.student_id, request.course_id
            ),
        )
    })?;

    info!("Enrollment created with id {}", enrollment_model.id);
    Ok(enrollment_model)
}

/// Get an enrollment by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<enrollment::Model, RepositoryError> {
    enrollment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "enrollment", id })
}

/// List all enrollments.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<enrollment::Model>, RepositoryError> {
    Ok(enrollment::Entity::find().all(db).await?)
}

/// List the enrollments of a student.
pub async fn list_for_student(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<Vec<enrollment::Model>, RepositoryError> {
    Ok(enrollment::Entity::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .all(db)
        .await?)
}

/// List the enrollments in a course.
pub async fn list_for_course(
    db: &DatabaseConnection,
    course_id: i32,
) -> Result<Vec<enrollment::Model>, RepositoryError> {
    Ok(enrollment::Entity::find()
        .filter(enrollment::Column::CourseId.eq(course_id))
        .all(db)
        .await?)
}

/// Drop an enrollment.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = enrollment::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Enrollment {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "enrollment", id });
    }

    info!("Enrollment {} deleted", id);
    Ok(())
}
