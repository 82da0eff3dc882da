use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    // Empty/zero means "not set in TOML"; normalize() consults the env
    // before falling back to the built-in defaults.
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// JWT signing settings. The secret is a base64-encoded symmetric key; the
/// lifetime is expressed in milliseconds and exposed to clients in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_jwt_expiration_ms")]
    pub expiration_ms: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self { secret: String::new(), expiration_ms: default_jwt_expiration_ms() }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_jwt_expiration_ms() -> i64 { 3_600_000 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), fill gaps from env vars and
    /// validate. Falls back to a default config when no file is present so
    /// that env-only deployments keep working.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.jwt.normalize_from_env();
        self.jwt.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    // TOML wins; env var fills the gap; built-in default last.
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = std::env::var("SERVER_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| "127.0.0.1".to_string());
        }
        if self.port == 0 {
            self.port = match std::env::var("SERVER_PORT") {
                Ok(p) => p
                    .parse::<u16>()
                    .ok()
                    .filter(|p| *p != 0)
                    .ok_or_else(|| anyhow!("SERVER_PORT must be in 1..=65535"))?,
                Err(_) => 8080,
            };
        }
        if self.worker_threads.unwrap_or(0) == 0 {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML wins; env var fills the gap.
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!(
                "database.url is empty; set it in config.toml or via DATABASE_URL"
            ));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl JwtConfig {
    pub fn normalize_from_env(&mut self) {
        if self.secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.secret = secret;
            }
        }
        if let Ok(ms) = std::env::var("JWT_EXPIRATION_MS") {
            if let Ok(ms) = ms.parse::<i64>() {
                self.expiration_ms = ms;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            return Err(anyhow!(
                "jwt.secret is empty; set it in config.toml or via JWT_SECRET (base64)"
            ));
        }
        if self.expiration_ms <= 0 {
            return Err(anyhow!("jwt.expiration_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_defaults_to_one_hour() {
        let cfg = JwtConfig::default();
        assert_eq!(cfg.expiration_ms, 3_600_000);
    }

    #[test]
    fn empty_jwt_secret_rejected() {
        let cfg = JwtConfig { secret: "  ".into(), expiration_ms: 1000 };
        assert!(cfg.validate().is_err());
    }

    // One test covers the whole SERVER_HOST/SERVER_PORT resolution order;
    // parallel tests must not race on these process-global vars.
    #[test]
    fn server_env_fallback_fills_unset_toml_values() {
        std::env::remove_var("SERVER_HOST");
        std::env::remove_var("SERVER_PORT");

        // No file, no env: built-in defaults.
        let mut cfg = ServerConfig::default();
        cfg.normalize().unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.worker_threads, Some(4));

        // Env set: it fills values the TOML left unset.
        std::env::set_var("SERVER_HOST", "0.0.0.0");
        std::env::set_var("SERVER_PORT", "9090");
        let mut cfg = ServerConfig::default();
        let res = cfg.normalize();
        std::env::remove_var("SERVER_HOST");
        std::env::remove_var("SERVER_PORT");
        res.unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn toml_server_values_win_over_env() {
        let mut cfg = ServerConfig { host: "10.0.0.1".into(), port: 4000, worker_threads: None };
        cfg.normalize().unwrap();
        assert_eq!(cfg.host, "10.0.0.1");
        assert_eq!(cfg.port, 4000);
    }

    #[test]
    fn database_url_scheme_enforced() {
        let cfg = DatabaseConfig {
            url: "mysql://nope".into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
            acquire_timeout_secs: 30,
            sqlx_logging: false,
        };
        assert!(cfg.validate().is_err());
    }
}
