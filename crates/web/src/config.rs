use std::{env, error::Error, net::SocketAddr, path::PathBuf};

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    /// Directory holding the front end. Unknown paths fall back to its `index.html`.
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from("./resources/www/"),
        }
    }
}

impl WebConfig {
    /// Reads `BIND_ADDRESS` and `STATIC_DIR`, keeping the defaults for unset ones.
    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut config = Self::default();
        if let Ok(address) = env::var("BIND_ADDRESS") {
            config.bind_address = address.parse().map_err(|why| {
                format!("BIND_ADDRESS {:?} is not a socket address: {}", address, why)
            })?;
        }
        if let Ok(dir) = env::var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}
