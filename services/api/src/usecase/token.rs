//! Password auth: signup and login.

use chrono::Utc;
use uuid::Uuid;

use crate::auth::issue_access_token;
use crate::domain::repository::UserRepository;
use crate::domain::types::{NotificationPrefs, User};
use crate::error::ApiError;

/// Shared by signup, login and passcode verification responses.
#[derive(Debug)]
pub struct AuthOutput {
    pub user: User,
    pub access_token: String,
}

#[derive(Debug)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

pub struct SignupUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<AuthOutput, ApiError> {
        // 1. Reject an already-registered email → 409. The unique index
        // on users.email backstops the race between check and insert.
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::Conflict);
        }

        // 2. Hash the password, persist the account with its defaults
        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::Internal(e.into()))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
            monthly_income: 0.0,
            currency: "USD".to_owned(),
            notifications: NotificationPrefs::default(),
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        // 3. Sign the new account in immediately
        let access_token = issue_access_token(user.id, &self.jwt_secret)?;

        Ok(AuthOutput { user, access_token })
    }
}

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub users: R,
    pub jwt_secret: String,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
        // Unknown email and wrong password answer identically.
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let matches = bcrypt::verify(&input.password, &user.password_hash)
            .map_err(|e| ApiError::Internal(e.into()))?;
        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        let access_token = issue_access_token(user.id, &self.jwt_secret)?;

        Ok(AuthOutput { user, access_token })
    }
}
