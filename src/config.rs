// config.rs
use std::env;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub otp_countdown_secs: u32,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("ELEVATE_API_URL")
            .map_err(|_| AppError::configuration("ELEVATE_API_URL must be set"))?;

        let request_timeout_secs = env::var("ELEVATE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| AppError::configuration("ELEVATE_REQUEST_TIMEOUT_SECS must be a number"))?;

        let otp_countdown_secs = env::var("ELEVATE_OTP_COUNTDOWN_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| AppError::configuration("ELEVATE_OTP_COUNTDOWN_SECS must be a number"))?;

        Ok(ClientConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout_secs,
            otp_countdown_secs,
        })
    }
}
