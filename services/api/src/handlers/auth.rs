use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::domain::types::IdentifierKind;
use crate::error::ApiError;
use crate::handlers::profile::UserResponse;
use crate::state::AppState;
use crate::usecase::challenge::{
    IssueChallengeInput, IssueChallengeUseCase, VerifyChallengeInput, VerifyChallengeUseCase,
};
use crate::usecase::token::{AuthOutput, LoginInput, LoginUseCase, SignupInput, SignupUseCase};
use crate::validate::{Violations, looks_like_email};

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthOutput> for AuthResponse {
    fn from(out: AuthOutput) -> Self {
        AuthResponse {
            token: out.access_token,
            user: out.user.into(),
        }
    }
}

// ── POST /auth/signup ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

impl SignupRequest {
    fn validate(self) -> Result<SignupInput, ApiError> {
        let mut violations = Violations::new();

        let name = self.name.map(|n| n.trim().to_owned()).unwrap_or_default();
        if name.is_empty() {
            violations.push("name", "name is required");
        }
        let email = self.email.unwrap_or_default();
        if !looks_like_email(&email) {
            violations.push("email", "a valid email is required");
        }
        let password = self.password.unwrap_or_default();
        if password.chars().count() < 6 {
            violations.push("password", "password must be at least 6 characters");
        }
        let phone = self.phone.map(|p| p.trim().to_owned()).filter(|p| !p.is_empty());

        violations.finish()?;
        Ok(SignupInput {
            name,
            email,
            password,
            phone,
        })
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body.validate()?;
    let usecase = SignupUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(input).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse::from(out))))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn validate(self) -> Result<LoginInput, ApiError> {
        let mut violations = Violations::new();

        let email = self.email.unwrap_or_default();
        if !looks_like_email(&email) {
            violations.push("email", "a valid email is required");
        }
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            violations.push("password", "password is required");
        }

        violations.finish()?;
        Ok(LoginInput { email, password })
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let input = body.validate()?;
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(input).await?;
    Ok(Json(out.into()))
}

// ── POST /auth/code/email, POST /auth/code/phone ─────────────────────────────

#[derive(Serialize)]
pub struct ChallengeResponse {
    pub session_id: String,
    /// Masked delivery address, e.g. `j***@example.com`.
    pub email: String,
}

#[derive(Deserialize)]
pub struct EmailCodeRequest {
    pub email: Option<String>,
}

pub async fn request_email_code(
    State(state): State<AppState>,
    Json(body): Json<EmailCodeRequest>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let email = body.email.unwrap_or_default();
    if !looks_like_email(&email) {
        let mut violations = Violations::new();
        violations.push("email", "a valid email is required");
        violations.finish()?;
    }

    issue_challenge(&state, email, IdentifierKind::Email).await
}

#[derive(Deserialize)]
pub struct PhoneCodeRequest {
    pub phone: Option<String>,
}

pub async fn request_phone_code(
    State(state): State<AppState>,
    Json(body): Json<PhoneCodeRequest>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let phone = body.phone.map(|p| p.trim().to_owned()).unwrap_or_default();
    if phone.is_empty() {
        let mut violations = Violations::new();
        violations.push("phone", "phone is required");
        violations.finish()?;
    }

    issue_challenge(&state, phone, IdentifierKind::Phone).await
}

async fn issue_challenge(
    state: &AppState,
    identifier: String,
    kind: IdentifierKind,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let usecase = IssueChallengeUseCase {
        users: state.user_repo(),
        challenges: state.challenges.clone(),
        mailer: state.mailer.clone(),
    };
    let out = usecase.execute(IssueChallengeInput { identifier, kind }).await?;
    Ok(Json(ChallengeResponse {
        session_id: out.session_id,
        email: out.masked_email,
    }))
}

// ── POST /auth/code/verify ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub session_id: Option<String>,
    pub code: Option<String>,
}

impl VerifyCodeRequest {
    fn validate(self) -> Result<VerifyChallengeInput, ApiError> {
        let mut violations = Violations::new();

        let session_id = self.session_id.unwrap_or_default();
        if session_id.is_empty() {
            violations.push("session_id", "session_id is required");
        }
        let code = self.code.unwrap_or_default();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            violations.push("code", "code must be 6 digits");
        }

        violations.finish()?;
        Ok(VerifyChallengeInput { session_id, code })
    }
}

pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let input = body.validate()?;
    let usecase = VerifyChallengeUseCase {
        challenges: state.challenges.clone(),
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(input).await?;
    Ok(Json(AuthResponse {
        token: out.access_token,
        user: out.user.into(),
    }))
}
