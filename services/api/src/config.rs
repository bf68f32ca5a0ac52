/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL for the login-code session store. When absent the
    /// service falls back to the in-process store (single-node deployments).
    pub redis_url: Option<String>,
    /// HMAC secret for signing JWT access tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8080). Env var: `API_PORT`.
    pub api_port: u16,
    /// Mail provider endpoint for login-code delivery (default Resend).
    pub mail_api_url: String,
    /// Mail provider API key. When absent every delivery attempt fails with
    /// a delivery error; login codes are still issued.
    pub mail_api_key: Option<String>,
    /// Sender address for login-code mail.
    pub mail_from: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").ok(),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            mail_api_url: std::env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_owned()),
            mail_api_key: std::env::var("MAIL_API_KEY").ok(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Outlay <login@outlay.app>".to_owned()),
        }
    }
}
