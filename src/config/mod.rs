use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_JWT_SECRET: &str = "demo-secret-key";
pub const DEFAULT_VORTEX_API_KEY: &str = "demo-api-key";
pub const DEFAULT_VORTEX_API_BASE_URL: &str = "https://api.vortexsoftware.com";

/// Runtime settings. Every value has an insecure default so the demo boots
/// with no environment at all; none of the defaults are fit for production.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub vortex_api_key: String,
    pub vortex_api_base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub public_dir: String,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_secs: 24 * 3600,
            vortex_api_key: DEFAULT_VORTEX_API_KEY.to_string(),
            vortex_api_base_url: DEFAULT_VORTEX_API_BASE_URL.to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            public_dir: "public".to_string(),
            cookie_secure: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let jwt_expiration_secs = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|raw| match parse_expiration_secs(&raw) {
                Some(secs) => Some(secs),
                None => {
                    tracing::warn!("Invalid JWT_EXPIRATION {:?}, using 24h", raw);
                    None
                }
            })
            .unwrap_or(defaults.jwt_expiration_secs);

        if env::var("JWT_SECRET").is_err() {
            tracing::warn!("JWT_SECRET not set, signing sessions with the demo secret");
        }

        Config {
            jwt_secret: var_or("JWT_SECRET", &defaults.jwt_secret),
            jwt_expiration_secs,
            vortex_api_key: var_or("VORTEX_API_KEY", &defaults.vortex_api_key),
            vortex_api_base_url: var_or("VORTEX_API_BASE_URL", &defaults.vortex_api_base_url),
            server_host: var_or("SERVER_HOST", &defaults.server_host),
            server_port: parse_var("PORT", defaults.server_port),
            public_dir: var_or("PUBLIC_DIR", &defaults.public_dir),
            cookie_secure: env::var("NODE_ENV").is_ok_and(|v| v == "production"),
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost),
        }
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, falling back to {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Accepts `24` or `24h`. Zero and values that overflow seconds are rejected.
fn parse_expiration_secs(raw: &str) -> Option<u64> {
    raw.trim()
        .trim_end_matches('h')
        .parse::<u64>()
        .ok()
        .filter(|hours| *hours > 0)
        .and_then(|hours| hours.checked_mul(3600))
}
