use serde::{Deserialize, Serialize};

use common::config::Validate;
use common::games::omo::{DEFAULT_GRID_SIZE, MIN_GRID_SIZE};

pub const DEFAULT_CONFIG_PATH: &str = "omo_server.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub default_grid_size: usize,
    pub max_grid_size: usize,
    /// Inbound messages a single connection may send before it is closed.
    pub message_budget: u64,
    pub outbound_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            default_grid_size: DEFAULT_GRID_SIZE,
            max_grid_size: 20,
            message_budget: 1000,
            outbound_queue: 128,
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bind_address.trim().is_empty() {
            return Err("bind_address must not be empty".to_string());
        }
        if self.max_grid_size < MIN_GRID_SIZE {
            return Err(format!("max_grid_size must be at least {}", MIN_GRID_SIZE));
        }
        if self.default_grid_size < MIN_GRID_SIZE || self.default_grid_size > self.max_grid_size {
            return Err(format!(
                "default_grid_size ({}) must be between {} and {}",
                self.default_grid_size, MIN_GRID_SIZE, self.max_grid_size
            ));
        }
        if self.message_budget == 0 {
            return Err("message_budget must be positive".to_string());
        }
        if self.outbound_queue == 0 {
            return Err("outbound_queue must be positive".to_string());
        }
        Ok(())
    }
}
