use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{nullable, timestamp};
use crate::database::repository::Entity;
use crate::error::ApiError;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored trimmed and lowercased; unique across users.
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Public identity returned by login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Everything about a user except credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub farm_name: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            location: user.location,
            farm_name: user.farm_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration that passed validation, with the email normalized.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn into_registration(self, password_min_length: usize) -> Result<Registration, ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require_text("name", &self.name)
            .require_text("email", &self.email)
            .require("password", &self.password);

        if let Some(email) = &self.email {
            if !email.trim().is_empty() && !email.contains('@') {
                errors.invalid("email", "Must be a valid email address");
            }
        }
        if let Some(password) = &self.password {
            if password.chars().count() < password_min_length {
                errors.invalid(
                    "password",
                    format!("Must be at least {} characters", password_min_length),
                );
            }
        }
        errors.into_result()?;

        Ok(Registration {
            name: self.name.unwrap_or_default().trim().to_string(),
            email: normalize_email(&self.email.unwrap_or_default()),
            password: self.password.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Normalized email and raw password.
    pub fn into_credentials(self) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require_text("email", &self.email)
            .require("password", &self.password);
        errors.into_result()?;

        Ok((
            normalize_email(&self.email.unwrap_or_default()),
            self.password.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordRequest {
    pub fn into_passwords(self, password_min_length: usize) -> Result<(String, String), ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require("currentPassword", &self.current_password)
            .require("newPassword", &self.new_password);
        if let Some(new_password) = &self.new_password {
            if new_password.chars().count() < password_min_length {
                errors.invalid(
                    "newPassword",
                    format!("Must be at least {} characters", password_min_length),
                );
            }
        }
        errors.into_result()?;

        Ok((
            self.current_password.unwrap_or_default(),
            self.new_password.unwrap_or_default(),
        ))
    }
}

/// Editable profile fields. Email and password have their own flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<Option<String>>,
}

impl ProfilePatch {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = FieldErrors::new();
        errors.not_blank("name", &self.name);
        errors.into_result()
    }
}
