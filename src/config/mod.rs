use std::env;

/// Config holds all server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Externally rendered topology image; a placeholder is served when unset
    pub image_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            listen_addr: get_env("LISTEN_ADDR", "0.0.0.0:8000"),
            image_path: env::var("IMAGE_PATH").ok().filter(|p| !p.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            image_path: None,
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
