use serde::Deserialize;

/// Application configuration
///
/// Built once at startup and passed into services; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub domains: DomainConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_hours: u64,
    pub reset_ttl_minutes: u64,
    pub deferred_invite_ttl_days: u64,
}

/// Transactional mail provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_key: String,
    pub endpoint: String,
    pub sender_name: String,
    pub sender_email: String,
}

/// Public URLs used when building links in emails and redirects
#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    pub frontend: String,
    pub backend: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/mentorship".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            session_ttl_hours: 24 * 7,
            reset_ttl_minutes: 60,
            deferred_invite_ttl_days: 14,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.brevo.com/v3/smtp/email".to_string(),
            sender_name: "TechHub Team".to_string(),
            sender_email: "techhub@example.com".to_string(),
        }
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            frontend: "http://localhost:3000".to_string(),
            backend: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
