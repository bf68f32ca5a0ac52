use chrono::Utc;
use sea_orm::Database;
use tracing::info;

use outlay_api::config::ApiConfig;
use outlay_api::domain::repository::ChallengeStore as _;
use outlay_api::infra::cache::{AnyChallengeStore, MemoryChallengeStore, RedisChallengeStore};
use outlay_api::infra::mail::HttpMailer;
use outlay_api::router::build_router;
use outlay_api::state::AppState;

#[tokio::main]
async fn main() {
    outlay_core::tracing::init_tracing("info,outlay_api=debug");

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let challenges = match &config.redis_url {
        Some(redis_url) => {
            let redis_cfg = deadpool_redis::Config::from_url(redis_url);
            let pool = redis_cfg
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            AnyChallengeStore::Redis(RedisChallengeStore { pool })
        }
        None => {
            info!("REDIS_URL not set; using the in-process login-session store");
            AnyChallengeStore::Memory(MemoryChallengeStore::new())
        }
    };

    // The memory backend has no native TTL; evict stale sessions on an
    // interval.
    if let AnyChallengeStore::Memory(store) = &challenges {
        let store = store.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                ticker.tick().await;
                match store.sweep(Utc::now()).await {
                    Ok(removed) if removed > 0 => {
                        info!("evicted {removed} stale login sessions");
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!("login-session sweep failed: {err}"),
                }
            }
        });
    }

    let state = AppState {
        db,
        challenges,
        mailer: HttpMailer::new(config.mail_api_url, config.mail_api_key, config.mail_from),
        jwt_secret: config.jwt_secret,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
