use model::entities::{course, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::RepositoryError;

/// Request body for creating a course offering
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCourseRequest {
    /// Human-readable key, e.g. "CS101" (must be unique)
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub credits: i32,
    /// Opaque handle to an externally stored document, `syllabi/...`
    pub syllabus: Option<String>,
    /// Must reference a user holding the TEACHER role when set
    pub teacher_id: Option<i32>,
}

/// Request body for updating a course; only provided fields change.
/// Teacher assignment goes through [`assign_teacher`] so that clearing the
/// teacher stays expressible.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 20))]
    pub course_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub credits: Option<i32>,
    pub syllabus: Option<String>,
}

/// Reject a teacher assignment unless the user exists and holds the
/// TEACHER role.
async fn check_teacher(db: &DatabaseConnection, user_id: i32) -> Result<(), RepositoryError> {
    let Some(candidate) = user::Entity::find_by_id(user_id).one(db).await? else {
        warn!("Attempted to assign non-existent user {} as teacher", user_id);
        return Err(RepositoryError::InvalidReference(format!(
            "user with id {user_id} does not exist"
        )));
    };

    if candidate.role != user::Role::Teacher {
        warn!(
            "Attempted to assign user {} with role {:?} as teacher",
            user_id, candidate.role
        );
        return Err(RepositoryError::InvalidTeacherRole { user_id });
    }

    Ok(())
}

/// Create a course offering.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateCourseRequest,
) -> Result<course::Model, RepositoryError> {
    debug!("Creating course with code: {}", request.course_code);
    request.validate()?;

    if let Some(teacher_id) = request.teacher_id {
        check_teacher(db, teacher_id).await?;
    }

    let new_course = course::ActiveModel {
        course_code: Set(request.course_code.clone()),
        title: Set(request.title),
        description: Set(request.description),
        credits: Set(request.credits),
        syllabus: Set(request.syllabus),
        teacher_id: Set(request.teacher_id),
        ..Default::default()
    };

    let course_model = new_course.insert(db).await.map_err(|err| {
        warn!("Failed to create course '{}': {}", request.course_code, err);
        RepositoryError::from_write_error(
            err,
            format!("course code '{}' already exists", request.course_code),
        )
    })?;

    info!(
        "Course created with id {}, code: {}",
        course_model.id, course_model.course_code
    );
    Ok(course_model)
}

/// Get a course by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<course::Model, RepositoryError> {
    course::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "course", id })
}

/// List all courses.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<course::Model>, RepositoryError> {
    Ok(course::Entity::find().all(db).await?)
}

/// Update a course's own attributes.
#[instrument(skip(db))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    request: UpdateCourseRequest,
) -> Result<course::Model, RepositoryError> {
    request.validate()?;

    let existing = get(db, id).await?;
    let mut active: course::ActiveModel = existing.into();

    if let Some(course_code) = request.course_code.clone() {
        active.course_code = Set(course_code);
    }
    if let Some(title) = request.title {
        active.title = Set(title);
    }
    if let Some(description) = request.description {
        active.description = Set(Some(description));
    }
    if let Some(credits) = request.credits {
        active.credits = Set(credits);
    }
    if let Some(syllabus) = request.syllabus {
        active.syllabus = Set(Some(syllabus));
    }

    let updated = active.update(db).await.map_err(|err| {
        warn!("Failed to update course {}: {}", id, err);
        RepositoryError::from_write_error(
            err,
            format!(
                "course code '{}' already exists",
                request.course_code.as_deref().unwrap_or_default()
            ),
        )
    })?;

    info!("Course {} updated", id);
    Ok(updated)
}

/// Assign a teacher to a course, or clear the assignment with `None`.
#[instrument(skip(db))]
pub async fn assign_teacher(
    db: &DatabaseConnection,
    id: i32,
    teacher_id: Option<i32>,
) -> Result<course::Model, RepositoryError> {
    if let Some(teacher_id) = teacher_id {
        check_teacher(db, teacher_id).await?;
    }

    let existing = get(db, id).await?;
    let mut active: course::ActiveModel = existing.into();
    active.teacher_id = Set(teacher_id);

    let updated = active.update(db).await?;
    info!("Course {} teacher set to {:?}", id, teacher_id);
    Ok(updated)
}

/// Delete a course. Its enrollments, attendance and grade records go with
/// it; the teaching user is untouched.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = course::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("Course {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "course", id });
    }

    info!("Course {} deleted", id);
    Ok(())
}
