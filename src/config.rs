//! Runtime configuration, read once from the environment at startup.

use crate::utils::retry::RetryConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    /// Mailbox capacity of every resource actor.
    pub actor_buffer_size: usize,
    pub orders_page_size: u32,
    pub admin_orders_page_size: u32,
    pub max_page_size: u32,
    pub analytics_recent_orders: usize,
    pub restock_max_attempts: u32,
    pub restock_initial_delay_ms: u64,
    /// Period of the stock reconciliation job. Zero disables the job.
    pub reconcile_interval_secs: u64,
    pub catalog_seed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".into(),
            http_port: 5000,
            actor_buffer_size: 32,
            orders_page_size: 10,
            admin_orders_page_size: 20,
            max_page_size: 100,
            analytics_recent_orders: 5,
            restock_max_attempts: 3,
            restock_initial_delay_ms: 50,
            reconcile_interval_secs: 30,
            catalog_seed_path: None,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Reads every setting from the environment, falling back to [`Config::default`] for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            http_host: std::env::var("HTTP_HOST").unwrap_or(d.http_host),
            http_port: env_or("HTTP_PORT", d.http_port),
            actor_buffer_size: env_or("ACTOR_BUFFER_SIZE", d.actor_buffer_size).max(1),
            orders_page_size: env_or("ORDERS_PAGE_SIZE", d.orders_page_size).max(1),
            admin_orders_page_size: env_or("ADMIN_ORDERS_PAGE_SIZE", d.admin_orders_page_size)
                .max(1),
            max_page_size: env_or("MAX_PAGE_SIZE", d.max_page_size).max(1),
            analytics_recent_orders: env_or("ANALYTICS_RECENT_ORDERS", d.analytics_recent_orders),
            restock_max_attempts: env_or("RESTOCK_MAX_ATTEMPTS", d.restock_max_attempts).max(1),
            restock_initial_delay_ms: env_or("RESTOCK_INITIAL_DELAY_MS", d.restock_initial_delay_ms),
            reconcile_interval_secs: env_or("RECONCILE_INTERVAL_SECS", d.reconcile_interval_secs),
            catalog_seed_path: std::env::var("CATALOG_SEED_PATH").ok().map(PathBuf::from),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Backoff used when putting stock back after a cancellation.
    pub fn restock_retry(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.restock_max_attempts,
            initial_delay: Duration::from_millis(self.restock_initial_delay_ms),
            ..RetryConfig::default()
        }
    }

    pub fn reconcile_interval(&self) -> Option<Duration> {
        (self.reconcile_interval_secs > 0).then(|| Duration::from_secs(self.reconcile_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.orders_page_size, 10);
        assert_eq!(config.admin_orders_page_size, 20);
        assert_eq!(config.reconcile_interval(), Some(Duration::from_secs(30)));

        let retry = config.restock_retry();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.initial_delay, Duration::from_millis(50));
    }

    #[test]
    fn test_zero_interval_disables_reconciliation() {
        let config = Config {
            reconcile_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.reconcile_interval(), None);
    }
}
