//! Side navigation configuration.

use serde::{Deserialize, Serialize};

/// Settings for the side-menu cache and the placeholder list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Rows shown while nothing is known about the menu's size.
    #[serde(default = "default_placeholder_rows")]
    pub placeholder_rows: usize,
    /// How long a fetched side menu stays cached, in seconds.
    #[serde(default = "default_menu_ttl")]
    pub menu_ttl_seconds: u64,
    /// Maximum number of cached side menus.
    #[serde(default = "default_menu_capacity")]
    pub menu_capacity: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            placeholder_rows: default_placeholder_rows(),
            menu_ttl_seconds: default_menu_ttl(),
            menu_capacity: default_menu_capacity(),
        }
    }
}

fn default_placeholder_rows() -> usize {
    7
}

fn default_menu_ttl() -> u64 {
    300
}

fn default_menu_capacity() -> u64 {
    16
}
