//! User Service - dashboard accounts

use sea_orm::*;
use serde::Deserialize;

use super::{now, required};
use crate::domain::DomainError;
use crate::infrastructure::auth::{hash_password, verify_password};
use crate::models::user::{self, Entity as User, ROLE_ADMIN, ROLE_EDITOR};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, DomainError> {
    Ok(User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?)
}

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, DomainError> {
    Ok(User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?)
}

/// Check credentials; `None` for an unknown user or a wrong password
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, DomainError> {
    let Some(user) = find_by_username(db, username.trim()).await? else {
        return Ok(None);
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(e) => {
            tracing::warn!("Stored hash for {} is unreadable: {}", user.username, e);
            Ok(None)
        }
    }
}

pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, DomainError> {
    let username = required("username", &input.username)?;
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let role = input.role.unwrap_or_else(|| ROLE_EDITOR.to_string());
    if role != ROLE_ADMIN && role != ROLE_EDITOR {
        return Err(DomainError::Validation(format!("unknown role '{}'", role)));
    }

    if find_by_username(db, &username).await?.is_some() {
        return Err(DomainError::Validation(format!(
            "username '{}' is already taken",
            username
        )));
    }

    let password_hash = hash_password(&input.password).map_err(DomainError::Internal)?;
    let timestamp = now();

    let model = user::ActiveModel {
        username: Set(username),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(timestamp.clone()),
        updated_at: Set(timestamp),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

pub async fn delete_user(db: &DatabaseConnection, actor_id: i32, id: i32) -> Result<(), DomainError> {
    if actor_id == id {
        return Err(DomainError::Validation(
            "you cannot delete your own account".to_string(),
        ));
    }

    let result = User::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }
    Ok(())
}

/// Create the bootstrap admin account if it does not exist yet
pub async fn ensure_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<(), DomainError> {
    if find_by_username(db, username).await?.is_some() {
        tracing::debug!("Admin account '{}' already present", username);
        return Ok(());
    }

    create_user(
        db,
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            role: Some(ROLE_ADMIN.to_string()),
        },
    )
    .await?;
    tracing::info!("Created admin account '{}'", username);
    Ok(())
}
