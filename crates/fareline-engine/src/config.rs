//! # Engine Configuration
//!
//! Configuration management for the pricing engine service.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FARELINE_GRATUITY_PERCENT=18                                       │
//! │     FARELINE_ENGINE_ID=abc-123                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/fareline/engine.toml (Linux)                             │
//! │     ~/Library/Application Support/com.fareline.engine/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     20% gratuity, $15 airport fee, auto-generated engine id            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [service]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! label = "pricing-engine"
//! channel_capacity = 64
//!
//! [pricing]
//! gratuity_percent = 20.0  # Default gratuity on fresh quotes
//! airport_fee = 15.0       # Default airport fee rate (dollars)
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fareline_core::{
    Money, Percent, QuoteDefaults, DEFAULT_AIRPORT_FEE_CENTS, DEFAULT_GRATUITY_BPS,
};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Service Settings
// =============================================================================

/// Identity and plumbing settings for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Unique engine instance identifier (UUID v4).
    /// Auto-generated on first run if not provided.
    pub id: String,

    /// Human-readable label for log lines.
    #[serde(default = "default_service_label")]
    pub label: String,

    /// Capacity of the host/edit/outbound message channels.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_service_label() -> String {
    "pricing-engine".to_string()
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            id: Uuid::new_v4().to_string(),
            label: default_service_label(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Pricing defaults seeded into every fresh quote.
///
/// Stored in human units (percent, dollars); [`EngineConfig::quote_defaults`]
/// converts to the core fixed-point types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Default gratuity percentage for fresh quotes.
    #[serde(default = "default_gratuity_percent")]
    pub gratuity_percent: f64,

    /// Default airport fee rate in dollars.
    #[serde(default = "default_airport_fee")]
    pub airport_fee: f64,
}

fn default_gratuity_percent() -> f64 {
    Percent::from_bps(DEFAULT_GRATUITY_BPS).as_percent()
}

fn default_airport_fee() -> f64 {
    Money::from_cents(DEFAULT_AIRPORT_FEE_CENTS).as_dollars()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            gratuity_percent: default_gratuity_percent(),
            airport_fee: default_airport_fee(),
        }
    }
}

// =============================================================================
// Main Engine Configuration
// =============================================================================

/// Complete engine configuration.
///
/// ## Example Config File
/// ```toml
/// [service]
/// id = "550e8400-e29b-41d4-a716-446655440000"
/// label = "pricing-engine"
/// channel_capacity = 64
///
/// [pricing]
/// gratuity_percent = 20.0
/// airport_fee = 15.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Service identity and channel settings.
    #[serde(default)]
    pub service: ServiceSettings,

    /// Pricing defaults.
    #[serde(default)]
    pub pricing: PricingSettings,
}

impl EngineConfig {
    /// Creates a new config with defaults and a generated service ID.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> EngineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| EngineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.service.id.is_empty() {
            return Err(EngineError::InvalidConfig(
                "service id must not be empty".into(),
            ));
        }

        if self.service.channel_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "channel_capacity must be greater than 0".into(),
            ));
        }

        if !self.pricing.gratuity_percent.is_finite()
            || !(0.0..=100.0).contains(&self.pricing.gratuity_percent)
        {
            return Err(EngineError::InvalidConfig(format!(
                "gratuity_percent must be between 0 and 100, got: {}",
                self.pricing.gratuity_percent
            )));
        }

        if !self.pricing.airport_fee.is_finite() || self.pricing.airport_fee < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "airport_fee must be a non-negative number, got: {}",
                self.pricing.airport_fee
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("FARELINE_ENGINE_ID") {
            debug!(engine_id = %id, "Overriding engine ID from environment");
            self.service.id = id;
        }

        if let Ok(label) = std::env::var("FARELINE_ENGINE_LABEL") {
            self.service.label = label;
        }

        if let Ok(capacity) = std::env::var("FARELINE_CHANNEL_CAPACITY") {
            if let Ok(c) = capacity.parse::<usize>() {
                self.service.channel_capacity = c;
            }
        }

        if let Ok(percent) = std::env::var("FARELINE_GRATUITY_PERCENT") {
            if let Ok(p) = percent.parse::<f64>() {
                debug!(percent = p, "Overriding default gratuity from environment");
                self.pricing.gratuity_percent = p;
            }
        }

        if let Ok(fee) = std::env::var("FARELINE_AIRPORT_FEE") {
            if let Ok(f) = fee.parse::<f64>() {
                debug!(fee = f, "Overriding default airport fee from environment");
                self.pricing.airport_fee = f;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fareline", "engine")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the service ID.
    pub fn service_id(&self) -> &str {
        &self.service.id
    }

    /// Quote defaults converted to core fixed-point units.
    pub fn quote_defaults(&self) -> QuoteDefaults {
        QuoteDefaults {
            gratuity: Percent::from_percent(self.pricing.gratuity_percent),
            airport_fee: Money::from_dollars(self.pricing.airport_fee),
        }
    }
}
