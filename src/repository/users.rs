use model::entities::user;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::RepositoryError;

/// Request body for provisioning a new user account
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password_hash: String,
    /// Defaults to the STUDENT role when omitted
    pub role: Option<user::Role>,
    #[serde(default)]
    pub is_staff: bool,
}

/// Request body for updating a user account; only provided fields change
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub password_hash: Option<String>,
    pub role: Option<user::Role>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

/// Provision a new user account.
#[instrument(skip(db))]
pub async fn create(
    db: &DatabaseConnection,
    request: CreateUserRequest,
) -> Result<user::Model, RepositoryError> {
    debug!("Creating user with username: {}", request.username);
    request.validate()?;

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email),
        password_hash: Set(request.password_hash),
        role: Set(request.role.unwrap_or(user::Role::Student)),
        is_staff: Set(request.is_staff),
        is_active: Set(true),
        ..Default::default()
    };

    let user_model = new_user.insert(db).await.map_err(|err| {
        warn!("Failed to create user '{}': {}", request.username, err);
        RepositoryError::from_write_error(
            err,
            format!("username '{}' already exists", request.username),
        )
    })?;

    info!(
        "User created with id {}, username: {}",
        user_model.id, user_model.username
    );
    Ok(user_model)
}

/// Get a user by id.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<user::Model, RepositoryError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(RepositoryError::NotFound { entity: "user", id })
}

/// List all users.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<user::Model>, RepositoryError> {
    Ok(user::Entity::find().all(db).await?)
}

/// Update a user account. Role changes arrive through here as well; the
/// role is mutable by administrative action.
#[instrument(skip(db))]
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    request: UpdateUserRequest,
) -> Result<user::Model, RepositoryError> {
    request.validate()?;

    let existing = get(db, id).await?;
    let mut active: user::ActiveModel = existing.into();

    if let Some(username) = request.username.clone() {
        active.username = Set(username);
    }
    if let Some(email) = request.email {
        active.email = Set(email);
    }
    if let Some(password_hash) = request.password_hash {
        active.password_hash = Set(password_hash);
    }
    if let Some(role) = request.role {
        active.role = Set(role);
    }
    if let Some(is_staff) = request.is_staff {
        active.is_staff = Set(is_staff);
    }
    if let Some(is_active) = request.is_active {
        active.is_active = Set(is_active);
    }

    let updated = active.update(db).await.map_err(|err| {
        warn!("Failed to update user {}: {}", id, err);
        RepositoryError::from_write_error(
            err,
            format!(
                "username '{}' already exists",
                request.username.as_deref().unwrap_or_default()
            ),
        )
    })?;

    info!("User {} updated", id);
    Ok(updated)
}

/// Delete a user account. The student profile (if any) goes with it;
/// courses taught by this user survive with their teacher cleared.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), RepositoryError> {
    let result = user::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        warn!("User {} not found for deletion", id);
        return Err(RepositoryError::NotFound { entity: "user", id });
    }

    info!("User {} deleted", id);
    Ok(())
}
