use crate::domain::product::ProductUpdatePolicy;
use crate::infrastructure::security::MAX_TOKEN_TTL;
use anyhow::{Context, Result, bail};
use std::time::Duration;

pub const DEV_JWT_SECRET: &str = "secret";
pub const DEFAULT_STORAGE_URL: &str = "memory://micro-marketplace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local storage; `name` is informational only.
    Memory { name: String },
}

impl StorageBackend {
    pub fn from_url(url: &str) -> Result<Self> {
        match url.split_once("://") {
            Some(("memory", name)) => Ok(StorageBackend::Memory {
                name: name.to_string(),
            }),
            Some((scheme, _)) => bail!("unsupported storage backend: {}", scheme),
            None => bail!("malformed STORAGE_URL: {}", url),
        }
    }
}

/// Process configuration, read once at startup and handed to constructors.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl: Option<Duration>,
    pub storage: StorageBackend,
    pub seed_demo_data: bool,
    pub product_update_policy: ProductUpdatePolicy,
    pub cors_allowed_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT: {}", raw))?,
            None => 5001,
        };

        let token_ttl = match get("JWT_TTL_SECONDS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid JWT_TTL_SECONDS: {}", raw))?;
                let ttl = Duration::from_secs(secs);
                if ttl > MAX_TOKEN_TTL {
                    bail!(
                        "invalid JWT_TTL_SECONDS: {} exceeds the maximum of {} seconds",
                        secs,
                        MAX_TOKEN_TTL.as_secs()
                    );
                }
                Some(ttl)
            }
            None => None,
        };

        let seed_demo_data = match get("SEED_DEMO_DATA") {
            Some(raw) => parse_bool(&raw).with_context(|| format!("invalid SEED_DEMO_DATA: {}", raw))?,
            None => false,
        };

        let product_update_policy = match get("PRODUCT_UPDATE_POLICY") {
            Some(raw) => raw.parse::<ProductUpdatePolicy>().map_err(anyhow::Error::msg)?,
            None => ProductUpdatePolicy::default(),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            jwt_secret: get("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            token_ttl,
            storage: StorageBackend::from_url(
                &get("STORAGE_URL").unwrap_or_else(|| DEFAULT_STORAGE_URL.to_string()),
            )?,
            seed_demo_data,
            product_update_policy,
            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN"),
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("expected a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_for_local_development() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5001);
        assert!(config.uses_dev_secret());
        assert!(config.token_ttl.is_none());
        assert_eq!(
            config.storage,
            StorageBackend::Memory {
                name: "micro-marketplace".to_string()
            }
        );
        assert!(!config.seed_demo_data);
        assert_eq!(config.product_update_policy, ProductUpdatePolicy::AnyAuthenticated);
        assert!(config.cors_allowed_origin.is_none());
    }

    #[test]
    fn test_reads_supplied_values() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("JWT_SECRET", "prod-secret"),
            ("JWT_TTL_SECONDS", "3600"),
            ("SEED_DEMO_DATA", "true"),
            ("PRODUCT_UPDATE_POLICY", "owner-or-admin"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 8080));
        assert!(!config.uses_dev_secret());
        assert_eq!(config.token_ttl, Some(Duration::from_secs(3600)));
        assert!(config.seed_demo_data);
        assert_eq!(config.product_update_policy, ProductUpdatePolicy::OwnerOrAdmin);
        assert_eq!(config.cors_allowed_origin.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("JWT_SECRET", "  "), ("PORT", "")]).unwrap();
        assert!(config.uses_dev_secret());
        assert_eq!(config.port, 5001);
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("JWT_TTL_SECONDS", "-1")]).is_err());
        assert!(config_from(&[("SEED_DEMO_DATA", "maybe")]).is_err());
        assert!(config_from(&[("PRODUCT_UPDATE_POLICY", "anyone")]).is_err());
    }

    #[test]
    fn test_token_ttl_is_bounded() {
        let max = MAX_TOKEN_TTL.as_secs().to_string();
        let config = config_from(&[("JWT_TTL_SECONDS", max.as_str())]).unwrap();
        assert_eq!(config.token_ttl, Some(MAX_TOKEN_TTL));

        let too_long = (MAX_TOKEN_TTL.as_secs() + 1).to_string();
        let err = config_from(&[("JWT_TTL_SECONDS", too_long.as_str())]).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
        let overflowing = u64::MAX.to_string();
        assert!(config_from(&[("JWT_TTL_SECONDS", overflowing.as_str())]).is_err());
    }

    #[test]
    fn test_rejects_unsupported_storage() {
        let err = config_from(&[("STORAGE_URL", "mongodb://localhost:27017/market")]).unwrap_err();
        assert!(err.to_string().contains("unsupported storage backend"));
        assert!(config_from(&[("STORAGE_URL", "nonsense")]).is_err());
    }
}
