//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::postgres;
use smart_default::SmartDefault;

/// Configuration of the binaries.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: Server,

    /// Business rules settings.
    pub service: Service,

    /// Database settings.
    pub postgres: Postgres,

    /// Logging settings.
    pub log: Log,
}

impl Config {
    /// Loads the [`Config`] out of the file at the provided `path`, if it
    /// exists, overriding it with the `CONF`-prefixed environment variables.
    ///
    /// Nesting in environment variables is expressed with `.`, so
    /// `CONF.server.port` overrides the `server.port`. Anything missing in
    /// both sources takes its default value.
    ///
    /// # Errors
    ///
    /// If the sources cannot be read or hold invalid values.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        let file = config::File::with_name(path.as_ref()).required(false);
        let env = config::Environment::with_prefix("CONF").separator(".");

        ConfigBuilder::<DefaultState>::default()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Address to listen on.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to listen on.
    #[default(8080)]
    pub port: u16,

    /// [CORS] settings.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] settings.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Origins allowed to call the API, `*` allowing any.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Business rules settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Secret signing the [JWT] access tokens.
    ///
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Time a signed in user stays authenticated for.
    #[default(time::Duration::from_secs(30 * 60))]
    #[serde(with = "humantime_serde")]
    pub session_ttl: time::Duration,
}

impl From<Service> for service::Config {
    fn from(conf: Service) -> Self {
        Self::with_secret(conf.jwt_secret.as_bytes(), conf.session_ttl)
    }
}

/// Database settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host of the Postgres server.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port of the Postgres server.
    #[default(5432)]
    pub port: u16,

    /// Role to log in as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password of the role.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database holding the travel listings.
    #[default("postgres".to_owned())]
    pub dbname: String,

    /// Maximum number of pooled connections.
    #[default(16)]
    pub max_connections: usize,
}

impl From<Postgres> for postgres::Config {
    fn from(conf: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
            max_connections,
        } = conf;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            pool: Some(postgres::PoolConfig::new(max_connections)),
            ..Self::default()
        }
    }
}

/// Logging settings.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Most verbose [`LogLevel`] being written.
    pub level: LogLevel,
}

/// Verbosity of a log record.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Step-by-step tracing of the execution.
    Trace,

    /// Details useful for debugging.
    Debug,

    /// Notable events, like served requests.
    #[default]
    Info,

    /// Failures of the clients, like invalid requests.
    Warn,

    /// Failures of the server itself.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use config::{FileFormat, FileSourceString};
    use service::infra::postgres;

    use super::{Config, LogLevel, Service};

    fn toml(source: &str) -> config::File<FileSourceString, FileFormat> {
        config::File::from_str(source, FileFormat::Toml)
    }

    #[test]
    fn defaults_without_sources() {
        let Config {
            server,
            service,
            postgres,
            log,
        } = Config::new("does-not-exist").unwrap();

        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert_eq!(server.cors.origins, ["*"]);
        assert_eq!(service.session_ttl, Duration::from_secs(30 * 60));
        assert_eq!(postgres.port, 5432);
        assert_eq!(postgres.max_connections, 16);
        assert!(matches!(log.level, LogLevel::Info));
    }

    #[test]
    fn parses_partial_file() {
        let conf: Config = config::Config::builder()
            .add_source(toml(
                r#"
                [server.cors]
                origins = ["https://travel.example"]

                [service]
                session_ttl = "2h 15m"

                [postgres]
                dbname = "travel"

                [log]
                level = "DEBUG"
                "#,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(conf.server.port, 8080);
        assert_eq!(conf.server.cors.origins, ["https://travel.example"]);
        assert_eq!(conf.service.session_ttl, Duration::from_secs(135 * 60));
        assert_eq!(conf.service.jwt_secret, "secret");
        assert_eq!(conf.postgres.dbname, "travel");
        assert!(matches!(conf.log.level, LogLevel::Debug));
    }

    #[test]
    fn sizes_connection_pool() {
        let pg = postgres::Config::from(super::Postgres {
            max_connections: 4,
            ..super::Postgres::default()
        });

        assert_eq!(pg.pool.map(|p| p.max_size), Some(4));
        assert_eq!(pg.dbname.as_deref(), Some("postgres"));

        let conf = service::Config::from(Service::default());
        assert_eq!(conf.session_ttl, Duration::from_secs(30 * 60));
    }
}
