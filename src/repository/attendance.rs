use chrono::NaiveDate;
use model::entities::{attendance, course, student};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::RepositoryError;

/// Request body for recording attendance
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateAttendanceRequest {
    pub student_id: i32,
    pub course_id: i32,
    pub date: NaiveDate,
    pub status: attendance::AttendanceStatus,
}

/// Request body for correcting an attendance record
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateAttendanceRequest {
    pub date: Option<NaiveDate>,
    pub status: Option<attendance::AttendanceStatus>,
}

/// Record a student's presence in a course on a date. At most one record
/// per (student, course, date).
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateAttendanceRequest,
) -> Result<attendance::Model, RepositoryError> {
    debug!(
        "Recording attendance for student {} in course {} on {}",
        request.student_id, request.course_id, request.date
    );

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

    let new_record = attendance::ActiveModel {
        student_id: Set(request.student_id),
        course_id: Set(request.course_id),
        date: Set(request.date),
        status: Set(request.status),
        ..Default::default()
    };

    let record = new_record.insert(db).await.map_err(|err| {
        warn!(
            "Failed to record attendance for student {} in course {} on {}: {}",
            request.student_id, request.course_id, request.date, err
        );
        RepositoryError::from_write_error(
            err,
            format!(
                "attendance for student {} in course {} on {} is already recorded",
                request.student_id, request.course_id, request.date
            ),
        )
    })?;

    info!("Attendance record created with id {}", record.id);
    Ok(record)
}

/// Get an attendance record by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<attendance::Model, RepositoryError> {
    attendance::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "attendance record", id })
}

/// List all attendance records.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<attendance::Model>, RepositoryError> {
    Ok(attendance::Entity::find().all(db).await?)
}

/// List the attendance records of a student.
pub async fn list_for_student(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<Vec<attendance::Model>, RepositoryError> {
    Ok(attendance::Entity::find()
        .filter(attendance::Column::StudentId.eq(student_id))
        .all(db)
        .await?)
}

/// List the attendance records of a course.
pub async fn list_for_course(
    db: &DatabaseConnection,
    course_id: i32,
) -> Result<Vec<attendance::Model>, RepositoryError> {
    Ok(attendance::Entity::find()
        .filter(attendance::Column::CourseId.eq(course_id))
        .all(db)
        .await?)
}

/// Correct an attendance record. Moving it onto a date that already has a
/// record for the same (student, course) is rejected like any other
/// duplicate.
#[instrument(skip(db))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    request: UpdateAttendanceRequest,
) -> Result<attendance::Model, RepositoryError> {
    let existing = get(db, id).await?;
    let mut active: attendance::ActiveModel = existing.into();

    if let Some(date) = request.date {
        active.date = Set(date);
    }
    if let Some(status) = request.status {
        active.status = Set(status);
    }

    let updated = active.update(db).await.map_err(|err| {
        warn!("Failed to update attendance record {}: {}", id, err);
        RepositoryError::from_write_error(
            err,
            format!("attendance record {id} would duplicate an existing (student, course, date)"),
        )
    })?;

    info!("Attendance record {} updated", id);
    Ok(updated)
}

/// Delete an attendance record.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = attendance::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Attendance record {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "attendance record", id });
    }

    info!("Attendance record {} deleted", id);
    Ok(())
}
