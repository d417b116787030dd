use serde::Deserialize;

/// Argon2 cost parameters used for new password hashes.
#[derive(Debug, Clone, Deserialize)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for Argon2id)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub hashing: HashingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: env_or("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: env_or("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: env_or("ARGON2_PARALLELISM", defaults.parallelism),
        };
        Ok(Self {
            database_url,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8080),
            hashing,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        std::env::set_var("LOGIN_PORTAL_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or::<u32>("LOGIN_PORTAL_TEST_GARBAGE", 7), 7);
        assert_eq!(env_or::<u32>("LOGIN_PORTAL_TEST_MISSING", 3), 3);

        std::env::set_var("LOGIN_PORTAL_TEST_NUMBER", "42");
        assert_eq!(env_or::<u16>("LOGIN_PORTAL_TEST_NUMBER", 1), 42);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let cfg = AppConfig {
            database_url: "postgres://localhost/portal".into(),
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 9000,
            hashing: HashingConfig::default(),
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
    }
}
