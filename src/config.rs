use crate::entities::AdTier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ads: AdsConfig,
    #[serde(default)]
    pub purchases: PurchasesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Without a url the service runs on the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub timeout_ms: u64,
    pub poll_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            poll_interval_secs: 15,
        }
    }
}

/// Which identity wins when a submission carries both an identity token and a
/// phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    #[default]
    PhonePreferred,
    IdentityOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdsConfig {
    pub free_days: i64,
    pub weekly_days: i64,
    pub monthly_days: i64,
    pub prime_days: i64,
    #[serde(default)]
    pub key_policy: KeyPolicy,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            free_days: 30,
            weekly_days: 7,
            monthly_days: 30,
            prime_days: 30,
            key_policy: KeyPolicy::PhonePreferred,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasesConfig {
    /// App store product id -> tier granted by that product
    pub products: HashMap<String, AdTier>,
}

impl Default for PurchasesConfig {
    fn default() -> Self {
        let mut products = HashMap::new();
        products.insert("hmp_weekly_ad".to_string(), AdTier::Weekly);
        products.insert("hmp_monthly_ad".to_string(), AdTier::Monthly);
        products.insert("hmp_prime_ad".to_string(), AdTier::Prime);
        Self { products }
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_defaults(),
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config =
            toml::from_str(config_str).map_err(|e| format!("failed to parse config file: {e}"))?;
        Ok(config)
    }

    fn from_env_defaults() -> Self {
        Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL"),
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", default_max_connections()),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET").unwrap_or_else(|| "change-me-in-production".to_string()),
            },
            store: StoreConfig::default(),
            ads: AdsConfig::default(),
            purchases: PurchasesConfig::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("STORE_TIMEOUT_MS")
            && let Ok(ms) = v.parse()
        {
            self.store.timeout_ms = ms;
        }
        if let Ok(v) = env::var("STORE_POLL_INTERVAL_SECS")
            && let Ok(s) = v.parse()
        {
            self.store.poll_interval_secs = s;
        }
        if let Ok(v) = env::var("ADS_KEY_POLICY") {
            match v.as_str() {
                "phone_preferred" => self.ads.key_policy = KeyPolicy::PhonePreferred,
                "identity_only" => self.ads.key_policy = KeyPolicy::IdentityOnly,
                other => log::warn!("Ignoring unknown ADS_KEY_POLICY {other}"),
            }
        }
    }

    /// Durations must be positive: a zero-day tier would produce listings that
    /// are expired at creation.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let days = [
            ("free_days", self.ads.free_days),
            ("weekly_days", self.ads.weekly_days),
            ("monthly_days", self.ads.monthly_days),
            ("prime_days", self.ads.prime_days),
        ];
        for (name, value) in days {
            if value <= 0 {
                return Err(format!("ads.{name} must be positive, got {value}").into());
            }
        }
        if self.store.timeout_ms == 0 {
            return Err("store.timeout_ms must be positive".into());
        }
        if let Some((product, _)) = self
            .purchases
            .products
            .iter()
            .find(|(_, tier)| **tier == AdTier::Free)
        {
            return Err(format!("product {product} cannot grant the free tier").into());
        }
        Ok(())
    }
}
