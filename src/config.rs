use clap::Parser;
use once_cell::sync::Lazy;

pub const JWT_EXPRIED_TIME: i64 = 86400i64;
pub const TOKEN_COOKIE_NAME: &str = "token";
pub const NOTIFY_EVENT: &str = "notify";

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 3000)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env, default_value_t = true)]
    pub run_migrations: bool,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env, default_value_t = JWT_EXPRIED_TIME)]
    pub jwt_expires_in: i64,

    #[clap(long, env, default_value = "redis://127.0.0.1:6379")]
    pub redis_url: String,

    #[clap(long, env)]
    pub rabbitmq_uri: String,

    #[clap(long, env, default_value = "mail_service")]
    pub mail_queue: String,

    #[clap(long, env)]
    pub mail_from: String,

    #[clap(long, env)]
    pub admin_email: String,

    #[clap(long, env)]
    pub admin_password: String,

    #[clap(long, env, default_value = "System Administrator")]
    pub admin_name: String,

    #[clap(long, env)]
    pub admin_department_category: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value_t = 5)]
    pub outbox_poll_interval_secs: u64,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}
