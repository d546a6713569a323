use std::{env, error::Error};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Seconds after which ImgBB drops an uploaded picture.
pub const DEFAULT_IMGBB_EXPIRATION: u32 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    pub api_base_url: String,
    pub imgbb_api_key: Option<String>,
    pub imgbb_expiration: u32,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            imgbb_api_key: None,
            imgbb_expiration: DEFAULT_IMGBB_EXPIRATION,
        }
    }
}

impl FrontendConfig {
    /// Reads `API_BASE_URL`, `IMGBB_API_KEY` and `IMGBB_EXPIRATION`.
    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let defaults = Self::default();
        let imgbb_expiration = match env::var("IMGBB_EXPIRATION") {
            Ok(value) => value.parse().map_err(|why| {
                format!("IMGBB_EXPIRATION {:?} is not a number of seconds: {}", value, why)
            })?,
            Err(_) => defaults.imgbb_expiration,
        };
        Ok(Self {
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            imgbb_api_key: env::var("IMGBB_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            imgbb_expiration,
        })
    }
}
