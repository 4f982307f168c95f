use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    // Routing provider credential. The server starts without it, but every
    // route request fails with a configuration error until it is set.
    #[serde(default)]
    pub routing_api_key: Option<String>,

    #[serde(default = "default_routing_base_url")]
    pub routing_base_url: String,

    // Vehicle profile passed through to the provider
    #[serde(default = "default_routing_profile")]
    pub routing_profile: String,

    #[serde(default = "default_routing_timeout_secs")]
    pub routing_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Config>()
    }

    /// The credential, if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.routing_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            routing_api_key: None, // Must be provided via environment
            routing_base_url: default_routing_base_url(),
            routing_profile: default_routing_profile(),
            routing_timeout_secs: default_routing_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_routing_base_url() -> String {
    "https://graphhopper.com/api/1/route".to_string()
}

fn default_routing_profile() -> String {
    "car".to_string()
}

fn default_routing_timeout_secs() -> u64 {
    15
}
