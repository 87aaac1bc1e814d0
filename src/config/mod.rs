//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, DomainConfig, LogFormat, LoggingConfig, MailConfig,
    ServerConfig,
};
