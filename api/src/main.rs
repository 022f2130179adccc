use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use tg_api::app::create_app;
use tg_api::routes::auth::AppState;
use tg_api::telemetry::{init_tracing, report_env_file};
use tg_core::repositories::{TokenRepository, UserRepository};
use tg_core::services::{AccessTokenCodec, LifecycleConfig, TokenLifecycleService};
use tg_infra::database::{ensure_schema, DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use tg_infra::{load_dotenv, BcryptCredentialVerifier, InMemoryTokenRepository, InMemoryUserRepository};
use tg_shared::config::{AppConfig, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_dotenv();

    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;

    report_env_file(env_file.as_deref());

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    if config.auth.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    tracing::info!(
        environment = %config.environment,
        store = ?config.store,
        "Starting Tollgate API server"
    );

    let codec = AccessTokenCodec::new(&config.auth.jwt)?;
    let lifecycle_config = LifecycleConfig::from_auth_config(&config.auth);
    let verifier = Arc::new(BcryptCredentialVerifier::new(config.auth.bcrypt_cost));

    match config.store {
        StoreBackend::Memory => {
            let users = Arc::new(InMemoryUserRepository::new());
            match &config.auth.seed_user {
                Some(seed) => {
                    users
                        .seed(seed, verifier.as_ref())
                        .await
                        .context("Failed to seed user")?;
                }
                None => tracing::warn!("In-memory store has no users; set SEED_USER_EMAIL and SEED_USER_PASSWORD"),
            }
            let tokens = Arc::new(InMemoryTokenRepository::new());

            run_server(&config, users, tokens, verifier, codec, lifecycle_config).await
        }
        StoreBackend::Mysql => {
            let pool = DatabasePool::new(&config.database).await?;
            ensure_schema(pool.get_pool())
                .await
                .context("Failed to prepare database schema")?;

            let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
            let tokens = Arc::new(MySqlTokenRepository::new(pool.get_pool().clone()));

            let result = run_server(&config, users, tokens, verifier, codec, lifecycle_config).await;
            pool.close().await;
            result
        }
    }
}

/// Wire the lifecycle service to the given stores and serve until shutdown
async fn run_server<U, T>(
    config: &AppConfig,
    users: Arc<U>,
    tokens: Arc<T>,
    verifier: Arc<BcryptCredentialVerifier>,
    codec: AccessTokenCodec,
    lifecycle_config: LifecycleConfig,
) -> anyhow::Result<()>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let lifecycle = Arc::new(TokenLifecycleService::new(
        users,
        tokens,
        verifier,
        codec,
        lifecycle_config,
    ));
    let app_state = web::Data::new(AppState::new(lifecycle));
    let environment = config.environment;

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server will bind");

    let mut server = HttpServer::new(move || create_app(app_state.clone(), environment));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
