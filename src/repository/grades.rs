use model::entities::{course, grade, student};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RepositoryError;
use crate::repository::{check_decimal_precision, today};

/// Grade values are stored as fixed-point with 5 total digits, 2 of them
/// fractional.
const VALUE_MAX_DIGITS: u32 = 5;
const VALUE_DECIMAL_PLACES: u32 = 2;

/// Request body for recording a grade
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateGradeRequest {
    pub student_id: i32,
    pub course_id: i32,
    pub value: Decimal,
}

/// Record a student's grade in a course. One grade per (student, course);
/// a second record for the pair is rejected — re-grading goes through
/// [`update_value`] and overwrites in place.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateGradeRequest,
) -> Result<grade::Model, RepositoryError> {
    debug!(
        "Recording grade {} for student {} in course {}",
        request.value, request.student_id, request.course_id
    );
    check_decimal_precision("value", request.value, VALUE_MAX_DIGITS, VALUE_DECIMAL_PLACES)?;

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

    let new_grade = grade::ActiveModel {
        student_id: Set(request.student_id),
        course_id: Set(request.course_id),
        value: Set(request.value),
        graded_on: Set(today()),
        ..Default::default()
    };

    let grade_model = new_grade.insert(db).await.map_err(|err| {
        warn!(
            "Failed to record grade for student {} in course {}: {}",
            request.student_id, request.course_id, err
        );
        RepositoryError::from_write_error(
            err,
            format!(
                "student {} already has a grade in course {}",
                request.student_id, request.course_id
            ),
        )
    })?;

    info!("Grade created with id {}", grade_model.id);
    Ok(grade_model)
}

/// Get a grade by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<grade::Model, RepositoryError> {
    grade::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "grade", id })
}

/// List all grades.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<grade::Model>, RepositoryError> {
    Ok(grade::Entity::find().all(db).await?)
}

/// List the grades of a student.
pub async fn list_for_student(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<Vec<grade::Model>, RepositoryError> {
    Ok(grade::Entity::find()
        .filter(grade::Column::StudentId.eq(student_id))
        .all(db)
        .await?)
}

/// List the grades recorded in a course.
pub async fn list_for_course(
    db: &DatabaseConnection,
    course_id: i32,
) -> Result<Vec<grade::Model>, RepositoryError> {
    Ok(grade::Entity::find()
        .filter(grade::Column::CourseId.eq(course_id))
        .all(db)
        .await?)
}

/// Overwrite a grade's value in place. `graded_on` keeps the date the
/// grade was first recorded.
#[instrument(skip(db))]
pub async fn update_value(
    db: &DatabaseConnection,
    id: i32,
    value: Decimal,
) -> Result<grade::Model, RepositoryError> {
    check_decimal_precision("value", value, VALUE_MAX_DIGITS, VALUE_DECIMAL_PLACES)?;

    let existing = get(db, id).await?;
    let mut active: grade::ActiveModel = existing.into();
    active.value = Set(value);

    let updated = active.update(db).await?;
    info!("Grade {} value updated to {}", id, value);
    Ok(updated)
}

/// Delete a grade.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = grade::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Grade {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "grade", id });
    }

    info!("Grade {} deleted", id);
    Ok(())
}
