use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://script.google.com/macros/s/AKfycbx_oIDtBJLI7xRovGss3Nnq-syCIk9zcnPbGkDe__FgLEe-j1oqL23j2EegGjUzGlTT/exec";
pub const DEFAULT_SUPPORT_CONTACT: &str = "+91-98-73-133-190";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub export: ExportConfig,
    pub support_contact: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let base_url =
            env::var("CATALOG_URL").unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());
        let catalog_timeout = parse_whole_number("CATALOG_TIMEOUT_SECS", "15")?;

        let output_dir =
            PathBuf::from(env::var("EXPORT_DIR").unwrap_or_else(|_| ".".to_string()));
        let renderer_timeout = parse_whole_number("RENDERER_TIMEOUT_MS", "10000")?;

        let support_contact =
            env::var("SUPPORT_CONTACT").unwrap_or_else(|_| DEFAULT_SUPPORT_CONTACT.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig {
                base_url,
                timeout: Duration::from_secs(catalog_timeout),
            },
            export: ExportConfig {
                output_dir,
                renderer_timeout: Duration::from_millis(renderer_timeout),
            },
            support_contact,
        })
    }
}

fn parse_whole_number(var: &'static str, default: &str) -> Result<u64, ConfigError> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidDuration(var))
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the read-only catalog lives and how long one fetch may take.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Destination and renderer acquisition budget for generated documents.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub renderer_timeout: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidDuration(&'static str),
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidDuration(var) => {
                write!(f, "{var} must be a non-negative whole number")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDuration(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "CATALOG_URL",
            "CATALOG_TIMEOUT_SECS",
            "EXPORT_DIR",
            "RENDERER_TIMEOUT_MS",
            "SUPPORT_CONTACT",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.catalog.timeout, Duration::from_secs(15));
        assert_eq!(config.export.renderer_timeout, Duration::from_millis(10_000));
        assert_eq!(config.support_contact, DEFAULT_SUPPORT_CONTACT);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_renderer_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RENDERER_TIMEOUT_MS", "soon");
        let error = AppConfig::load().expect_err("timeout must be numeric");
        assert!(matches!(
            error,
            ConfigError::InvalidDuration("RENDERER_TIMEOUT_MS")
        ));
        reset_env();
    }

    #[test]
    fn environment_aliases_are_recognized() {
        assert_eq!(AppEnvironment::from_str(" PROD "), AppEnvironment::Production);
        assert_eq!(AppEnvironment::from_str("ci"), AppEnvironment::Test);
        assert_eq!(
            AppEnvironment::from_str("staging"),
            AppEnvironment::Development
        );
    }
}
