use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use unimanage::bootstrap::initialize_admin_user;
use unimanage::rabbitmq_service::rabbitmq_service::MailQueue;
use unimanage::redis_service::redis_emitter::RedisEmitter;
use unimanage::services::notification_emitter::{OutboxDispatcher, OutboxSignal};
use unimanage::state::AppState;
use unimanage::static_service::get_database_connection;
use unimanage::utils::jwt::JwtManager;
use unimanage::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"), &APP_CONFIG.log_level);

    tracing::info!("Starting application...");

    let db_connection = get_database_connection(&APP_CONFIG.database_url).await?;

    if APP_CONFIG.run_migrations {
        Migrator::up(&db_connection, None)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    tracing::info!("Checking admin user...");
    if let Err(e) = initialize_admin_user(&db_connection, &APP_CONFIG).await {
        tracing::error!("Failed to initialize admin user: {:#}", e);
        tracing::warn!("Continuing without admin user initialization...");
    }

    let outbox = OutboxSignal::default();

    tracing::info!("Initializing Redis emitter...");
    let emitter = RedisEmitter::new(&APP_CONFIG.redis_url)?;
    let dispatcher = OutboxDispatcher::new(
        db_connection.clone(),
        emitter,
        outbox.clone(),
        Duration::from_secs(APP_CONFIG.outbox_poll_interval_secs),
    );
    tokio::spawn(dispatcher.run());

    let mut state = AppState::new(
        db_connection,
        JwtManager::new(&APP_CONFIG.jwt_secret),
        APP_CONFIG.jwt_expires_in,
    )
    .with_outbox(outbox)
    .with_secure_cookies(APP_CONFIG.app_env == "production");

    match MailQueue::connect(
        &APP_CONFIG.rabbitmq_uri,
        &APP_CONFIG.mail_queue,
        &APP_CONFIG.mail_from,
    )
    .await
    {
        Ok(mail_queue) => {
            tracing::info!("Create rabbitmq queue successfully");
            state = state.with_mail_queue(mail_queue);
        }
        Err(e) => {
            tracing::error!("Failed to initialize RabbitMQ: {:#}", e);
            tracing::warn!("Continuing without the mail queue...");
        }
    }

    let app = app::create_app(&APP_CONFIG, state);

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {}", http_address))?;

    tracing::info!("HTTP server listening on {}", &http_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP server stopped")?;

    Ok(())
}
