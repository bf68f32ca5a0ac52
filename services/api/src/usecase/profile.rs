//! The signed-in user's own record: read, profile patch, notification
//! toggles.

use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{NotificationPrefs, User};
use crate::error::{ApiError, FieldError};

pub struct GetProfileUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> GetProfileUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        // A valid token for a deleted account is a 404, not a 500
        self.users.find_by_id(user_id).await?.ok_or(ApiError::NotFound)
    }
}

#[derive(Debug)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub monthly_income: Option<f64>,
    pub currency: Option<String>,
}

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, ApiError> {
        if input.name.is_none() && input.monthly_income.is_none() && input.currency.is_none() {
            return Err(ApiError::Validation(vec![FieldError::new(
                "body",
                "at least one of name, monthly_income, currency is required",
            )]));
        }

        self.users
            .update_profile(
                user_id,
                input.name.as_deref(),
                input.monthly_income,
                input.currency.as_deref(),
            )
            .await?;

        self.users.find_by_id(user_id).await?.ok_or(ApiError::NotFound)
    }
}

pub struct UpdateNotificationsUseCase<R: UserRepository> {
    pub users: R,
}

impl<R: UserRepository> UpdateNotificationsUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, prefs: NotificationPrefs) -> Result<User, ApiError> {
        self.users.update_notifications(user_id, prefs).await?;

        self.users.find_by_id(user_id).await?.ok_or(ApiError::NotFound)
    }
}
