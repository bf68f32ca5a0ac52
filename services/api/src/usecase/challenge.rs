//! Passcode login: issue a challenge, verify a challenge.

use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::auth::issue_access_token;
use crate::domain::repository::{ChallengeStore, Mailer, UserRepository};
use crate::domain::types::{IdentifierKind, OTP_TTL_SECS, OtpSession, User};
use crate::error::ApiError;

/// Six decimal digits, leading zeros excluded so the code never
/// shortens when rendered as a number.
fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999).to_string()
}

/// `john@example.com` becomes `j***@example.com`. The response echoes
/// this so the caller learns where the code went without the endpoint
/// leaking the full address for a guessed phone number.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(1).collect();
            format!("{head}***@{domain}")
        }
        None => "***".to_owned(),
    }
}

pub struct IssueChallengeInput {
    pub identifier: String,
    pub kind: IdentifierKind,
}

#[derive(Debug)]
pub struct IssueChallengeOutput {
    pub session_id: String,
    pub masked_email: String,
}

pub struct IssueChallengeUseCase<U, S, M>
where
    U: UserRepository,
    S: ChallengeStore,
    M: Mailer,
{
    pub users: U,
    pub challenges: S,
    pub mailer: M,
}

impl<U, S, M> IssueChallengeUseCase<U, S, M>
where
    U: UserRepository,
    S: ChallengeStore,
    M: Mailer,
{
    pub async fn execute(
        &self,
        input: IssueChallengeInput,
    ) -> Result<IssueChallengeOutput, ApiError> {
        // 1. Resolve the identifier to an account → 404 if none
        let user = match input.kind {
            IdentifierKind::Email => self.users.find_by_email(&input.identifier).await?,
            IdentifierKind::Phone => self.users.find_by_phone(&input.identifier).await?,
        };
        let user = user.ok_or(ApiError::NotFound)?;

        // 2. Fresh session id and code, ten-minute deadline
        let now = Utc::now();
        let session = OtpSession {
            session_id: Uuid::new_v4().to_string(),
            identifier: input.identifier,
            code: generate_code(),
            delivery_address: user.email.clone(),
            created_at: now,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
        };

        // 3. Store before sending. A failed delivery reports 502 but the
        // session stays live until its deadline.
        self.challenges.put(&session).await?;
        self.mailer.deliver_code(&session.delivery_address, &session.code).await?;

        Ok(IssueChallengeOutput {
            session_id: session.session_id,
            masked_email: mask_email(&user.email),
        })
    }
}

pub struct VerifyChallengeInput {
    pub session_id: String,
    pub code: String,
}

#[derive(Debug)]
pub struct VerifyChallengeOutput {
    pub user: User,
    pub access_token: String,
}

pub struct VerifyChallengeUseCase<S, U>
where
    S: ChallengeStore,
    U: UserRepository,
{
    pub challenges: S,
    pub users: U,
    pub jwt_secret: String,
}

impl<S, U> VerifyChallengeUseCase<S, U>
where
    S: ChallengeStore,
    U: UserRepository,
{
    pub async fn execute(
        &self,
        input: VerifyChallengeInput,
    ) -> Result<VerifyChallengeOutput, ApiError> {
        // 1. Take the session out of the store. Unknown id → 401, and a
        // concurrent verify on the same id sees None here.
        let session = self
            .challenges
            .take(&input.session_id)
            .await?
            .ok_or(ApiError::InvalidSession)?;

        // 2. Past the deadline the session is spent, whatever the code was
        let now = Utc::now();
        if session.is_expired(now) {
            return Err(ApiError::OtpExpired);
        }

        // 3. Wrong code → put it back with its original deadline so the
        // user can retry
        if session.code != input.code {
            self.challenges.put(&session).await?;
            return Err(ApiError::CodeMismatch);
        }

        // 4. Right code → the session is consumed; sign the user in
        let user = self
            .users
            .find_by_email(&session.delivery_address)
            .await?
            .ok_or(ApiError::NotFound)?;
        let access_token = issue_access_token(user.id, &self.jwt_secret)?;

        Ok(VerifyChallengeOutput { user, access_token })
    }
}
