// Runtime configuration
// Read from the environment (and `.env` via dotenv) once at startup

use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

use crate::agents::{AgentError, AgentResult, DEFAULT_STEP_INTERVAL};
use crate::auth::password::DEFAULT_COST;

const DEV_JWT_SECRET: &str = "dev-secret-key";

/// Console server settings
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Delay between two processing steps
    pub step_interval: Duration,
    /// Whether demo inbox items and detections are installed at startup
    pub seed_demo_data: bool,
    pub operator_email: String,
    pub operator_password: String,
    pub operator_name: String,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Loads the configuration from process environment variables
    ///
    /// # Variables
    /// - `BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `JWT_SECRET` (default development key, logged as a warning)
    /// - `STEP_INTERVAL_MS` (default 800)
    /// - `SEED_DEMO_DATA` (default `true`)
    /// - `OPERATOR_EMAIL`, `OPERATOR_PASSWORD`, `OPERATOR_NAME`
    /// - `BCRYPT_COST` (default bcrypt's default cost)
    pub fn from_env() -> AgentResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> AgentResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AgentError::ConfigError(format!("BIND_ADDR: {}", e)))?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using development key");
            DEV_JWT_SECRET.to_string()
        });

        let step_interval = match lookup("STEP_INTERVAL_MS") {
            Some(raw) => {
                let millis = raw
                    .parse::<u64>()
                    .map_err(|e| AgentError::ConfigError(format!("STEP_INTERVAL_MS: {}", e)))?;
                if millis == 0 {
                    return Err(AgentError::ConfigError(
                        "STEP_INTERVAL_MS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_millis(millis)
            }
            None => DEFAULT_STEP_INTERVAL,
        };

        let seed_demo_data = match lookup("SEED_DEMO_DATA") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| AgentError::ConfigError(format!("SEED_DEMO_DATA: {}", raw)))?,
            None => true,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| AgentError::ConfigError(format!("BCRYPT_COST: {}", e)))?,
            None => DEFAULT_COST,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            step_interval,
            seed_demo_data,
            operator_email: lookup("OPERATOR_EMAIL")
                .unwrap_or_else(|| "operator@aiworker.local".to_string()),
            operator_password: lookup("OPERATOR_PASSWORD").unwrap_or_else(|| {
                warn!("OPERATOR_PASSWORD not set, using development password");
                "operator".to_string()
            }),
            operator_name: lookup("OPERATOR_NAME")
                .unwrap_or_else(|| "Console Operator".to_string()),
            bcrypt_cost,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
