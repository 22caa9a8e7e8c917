//! # Site Configuration
//!
//! TOML description of a site: tracker settings plus the zone hierarchy.
//!
//! ```toml
//! [tracker]
//! recent_capacity = 24
//!
//! [[zones]]
//! name = "Floor 1"
//! parent = "Building"
//!
//! [[zones]]
//! name = "Room 101"
//! parent = "Floor 1"
//! ```
//!
//! Zones are created in file order, so a parent must be listed before its
//! children. `parent` defaults to the root zone.

use crate::input::{MAX_CONFIG_FILE_SIZE, read_checked};
use serde::{Deserialize, Serialize};
use std::path::Path;
use zonewatt_core::primitives::ROOT_ZONE;
use zonewatt_core::{TrackerConfig, TrackingError, TrackingSystem};

/// One zone to create at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneSpec {
    /// Zone name.
    pub name: String,
    /// Parent zone name.
    #[serde(default = "root_zone")]
    pub parent: String,
}

fn root_zone() -> String {
    ROOT_ZONE.to_string()
}

/// A whole site: tracker settings and zones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Engine settings.
    pub tracker: TrackerConfig,
    /// Zones in creation order.
    pub zones: Vec<ZoneSpec>,
}

impl SiteConfig {
    /// Parse a site configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, TrackingError> {
        toml::from_str(text)
            .map_err(|e| TrackingError::Serialization(format!("Invalid site config: {}", e)))
    }

    /// Load a site configuration file.
    pub fn load(path: &Path) -> Result<Self, TrackingError> {
        let bytes = read_checked(path, MAX_CONFIG_FILE_SIZE)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| TrackingError::Serialization(format!("Site config is not UTF-8: {}", e)))?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, else the empty site (root zone only).
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, TrackingError> {
        match path {
            Some(path) => {
                tracing::info!("Loading site config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Build a tracking system with every configured zone registered.
    ///
    /// # Errors
    /// The first configuration or zone error, e.g. a zone listed before its
    /// parent.
    pub fn build_system(&self) -> Result<TrackingSystem, TrackingError> {
        let mut system = TrackingSystem::with_config(&self.tracker)?;
        for zone in &self.zones {
            system.add_zone(&zone.name, &zone.parent)?;
        }
        tracing::debug!(zones = self.zones.len(), "site built");
        Ok(system)
    }
}
