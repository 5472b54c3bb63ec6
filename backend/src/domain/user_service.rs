//! Administrator account use cases.
//!
//! E-mail uniqueness is checked before writing and again by the store's
//! unique index, so a concurrent duplicate still gets the same response.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::ports::{PasswordHashError, PasswordHasher, PersistenceError, UserRepository};
use crate::domain::service_support::map_persistence_error;
use crate::domain::{Email, Error, NewUser, User, UserChanges, UserId};

const STORE: &str = "user";

/// Input for [`UserService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub admin: bool,
}

/// Input for [`UserService::update`]; `None` leaves a field unchanged.
///
/// A new password is only accepted together with the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub old_password: Option<String>,
    pub password: Option<String>,
}

/// Account management over a [`UserRepository`] and a [`PasswordHasher`].
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a service over the given ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    fn not_found() -> Error {
        Error::not_found("user not found")
    }

    fn map_hash_error(err: PasswordHashError) -> Error {
        error!(error = %err, "password hashing failed");
        Error::internal(format!("password hashing failed: {err}"))
    }

    /// Every user ordered by id.
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_persistence_error(STORE))
    }

    /// Fetch one user.
    pub async fn show(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error(STORE))?
            .ok_or_else(Self::not_found)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an invalid request error when the e-mail is already taken.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(map_persistence_error(STORE))?;
        if existing.is_some() {
            return Err(Error::invalid_request("user already exists"));
        }

        let password_hash = self
            .hasher
            .hash(&request.password)
            .await
            .map_err(Self::map_hash_error)?;
        let new_user = NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            admin: request.admin,
        };

        let user = self.users.insert(&new_user).await.map_err(|err| match err {
            PersistenceError::Duplicate { .. } => Error::invalid_request("user already exists"),
            other => map_persistence_error(STORE)(other),
        })?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Update profile fields and optionally rotate the password.
    ///
    /// # Errors
    ///
    /// - not found when the user does not exist;
    /// - unauthorized when the e-mail belongs to another user or the old
    ///   password does not match, leaving the stored row untouched.
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> Result<User, Error> {
        let user = self.show(id).await?;

        if let Some(email) = request.email.as_ref().filter(|email| **email != user.email) {
            let owner = self
                .users
                .find_by_email(email)
                .await
                .map_err(map_persistence_error(STORE))?;
            if owner.is_some_and(|owner| owner.id != id) {
                return Err(Error::unauthorized("email already exists"));
            }
        }

        if request.password.is_some() && request.old_password.is_none() {
            return Err(Error::validation_fails());
        }
        if let Some(old_password) = request.old_password.as_deref() {
            let matches = self
                .hasher
                .verify(old_password, &user.password_hash)
                .await
                .map_err(Self::map_hash_error)?;
            if !matches {
                return Err(Error::unauthorized("password does not match"));
            }
        }

        let password_hash = match request.password.as_deref() {
            Some(password) => Some(
                self.hasher
                    .hash(password)
                    .await
                    .map_err(Self::map_hash_error)?,
            ),
            None => None,
        };
        let changes = UserChanges {
            name: request.name,
            email: request.email,
            password_hash,
        };
        if changes.is_empty() {
            return Ok(user);
        }

        self.users
            .update(id, &changes)
            .await
            .map_err(|err| match err {
                PersistenceError::Duplicate { .. } => Error::unauthorized("email already exists"),
                other => map_persistence_error(STORE)(other),
            })?
            .ok_or_else(Self::not_found)
    }

    /// Remove an account.
    pub async fn delete(&self, id: UserId) -> Result<(), Error> {
        let deleted = self
            .users
            .delete(id)
            .await
            .map_err(map_persistence_error(STORE))?;
        if !deleted {
            return Err(Self::not_found());
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
