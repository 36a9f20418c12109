use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{AuthError, Argon2Hasher, TokenError, TokenSigner};
use crate::config::SecurityConfig;
use crate::database::models::{
    timestamp, ChangePasswordRequest, Farm, LoginRequest, ProfilePatch, RegisterRequest, User,
    UserProfile, UserSummary,
};
use crate::database::repository::to_document;
use crate::database::{DatabaseError, Document, DocumentStore, OwnedEntity, Repository};
use crate::filter::Filter;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSession {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: UserSummary,
}

/// Registration, login, token checks and the caller's own user record.
#[derive(Clone)]
pub struct Authenticator {
    users: Repository<User>,
    farms: Repository<Farm>,
    hasher: Argon2Hasher,
    tokens: TokenSigner,
    password_min_length: usize,
    /// Verified against when the email is unknown so both login failures cost the same.
    decoy_hash: Arc<str>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn DocumentStore>, security: &SecurityConfig) -> Result<Self, AuthError> {
        let hasher = Argon2Hasher::new(security.argon2_memory_kib, security.argon2_iterations)?;
        let tokens = TokenSigner::new(&security.jwt_secret, security.jwt_expiry_hours)?;
        let decoy_hash = hasher.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            users: Repository::new(store.clone()),
            farms: Repository::new(store),
            hasher,
            tokens,
            password_min_length: security.password_min_length,
            decoy_hash: decoy_hash.into(),
        })
    }

    pub fn password_min_length(&self) -> usize {
        self.password_min_length
    }

    /// Create the account and return it as stored, with the normalized name and email.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserSummary, AuthError> {
        let registration = request.into_registration(self.password_min_length)?;

        if self.find_by_email(&registration.email).await?.is_some() {
            debug!("Registration rejected: email already in use");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash_blocking(registration.password).await?;
        let now = timestamp::now();
        let user = User {
            id: Uuid::new_v4(),
            name: registration.name,
            email: registration.email,
            password_hash,
            phone: None,
            location: None,
            farm_name: None,
            created_at: now,
            updated_at: now,
        };

        // The unique index catches a concurrent registration that passed the lookup above.
        match self.users.create(&user).await {
            Ok(created) => {
                info!("Registered user {}", created.id);
                Ok(UserSummary::from(&created))
            }
            Err(DatabaseError::Conflict { .. }) => Err(AuthError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginSession, AuthError> {
        let (email, password) = request.into_credentials()?;

        let Some(user) = self.find_by_email(&email).await? else {
            self.hasher
                .verify_blocking(password, self.decoy_hash.to_string())
                .await?;
            debug!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify_blocking(password, user.password_hash.clone())
            .await?
        {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.sign(user.id)?;
        info!("User {} logged in", user.id);
        Ok(LoginSession {
            token,
            expires_in: self.tokens.ttl_seconds(),
            user: UserSummary::from(&user),
        })
    }

    /// Resolve a bearer token to the user id it was issued for.
    pub fn authenticate(&self, token: &str) -> Result<Uuid, AuthError> {
        self.tokens
            .verify(token)
            .map(|claims| claims.sub)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::Unauthenticated("Token expired".to_string()),
                other => {
                    debug!("Rejected token: {}", other);
                    AuthError::Unauthenticated("Invalid token".to_string())
                }
            })
    }

    pub async fn change_password(&self, user_id: Uuid, request: ChangePasswordRequest) -> Result<(), AuthError> {
        let (current, new) = request.into_passwords(self.password_min_length)?;
        let user = self.load(user_id).await?;

        if !self.hasher.verify_blocking(current, user.password_hash).await? {
            return Err(AuthError::CurrentPasswordMismatch);
        }

        let password_hash = self.hasher.hash_blocking(new).await?;
        let mut patch = Document::new();
        patch.insert("passwordHash".to_string(), Value::String(password_hash));
        self.users
            .update(user_id, patch)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        info!("User {} changed password", user_id);
        Ok(())
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AuthError> {
        let user = self.load(user_id).await?;
        self.with_farm_name(user).await
    }

    pub async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> Result<UserProfile, AuthError> {
        patch.validate()?;
        let doc = to_document(&patch)?;
        let user = self
            .users
            .update(user_id, doc)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        self.with_farm_name(user).await
    }

    async fn load(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .find_one(Filter::new().where_eq("email", email))
            .await?)
    }

    /// Fill an unset farm name from the user's oldest farm.
    async fn with_farm_name(&self, user: User) -> Result<UserProfile, AuthError> {
        let mut profile = UserProfile::from(user);
        if profile.farm_name.is_none() {
            let oldest = Filter::new()
                .where_eq(Farm::OWNER_FIELD, profile.id.to_string())
                .order("createdAt asc")
                .map_err(DatabaseError::from)?;
            profile.farm_name = self.farms.find_one(oldest).await?.map(|farm| farm.farm_name);
        }
        Ok(profile)
    }
}
