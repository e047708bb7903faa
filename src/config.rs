//! Configuration management for the courier route planner
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RouteError;
use crate::models::{Coordinate, Location};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FUEL_PRICE: f64 = 130.0;
pub const DEFAULT_FUEL_EFFICIENCY: f64 = 15.0;
pub const DEFAULT_TRAFFIC_LEVEL: f64 = 0.2;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Geocoding service configuration
    pub geocoding: GeocodingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default route parameters
    pub defaults: DefaultsConfig,
    /// Points used when no location could be geocoded
    pub fallback: FallbackConfig,
}

/// OpenRouteService geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// API key; the command line and `ORS_API_KEY` take precedence
    pub api_key: Option<String>,
    /// Base URL for the OpenRouteService API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default route parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Fuel price per liter
    #[serde(default = "default_fuel_price")]
    pub fuel_price: f64,
    /// Fuel efficiency in km per liter
    #[serde(default = "default_fuel_efficiency")]
    pub fuel_efficiency: f64,
    /// Traffic level between 0 and 1
    #[serde(default = "default_traffic_level")]
    pub traffic_level: f64,
    /// Currency symbol used when printing costs
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default = "default_fallback_points")]
    pub points: Vec<FallbackPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl FallbackConfig {
    /// Fallback points as resolved locations
    #[must_use]
    pub fn locations(&self) -> Vec<Location> {
        self.points
            .iter()
            .map(|p| Location::resolved(p.name.clone(), Coordinate::new(p.latitude, p.longitude)))
            .collect()
    }
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

fn default_geocoding_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_fuel_price() -> f64 {
    DEFAULT_FUEL_PRICE
}

fn default_fuel_efficiency() -> f64 {
    DEFAULT_FUEL_EFFICIENCY
}

fn default_traffic_level() -> f64 {
    DEFAULT_TRAFFIC_LEVEL
}

fn default_currency() -> String {
    "₹".to_string()
}

// Katraj and Hadapsar, Pune
fn default_fallback_points() -> Vec<FallbackPoint> {
    vec![
        FallbackPoint {
            name: "Katraj".to_string(),
            latitude: 18.4575,
            longitude: 73.8580,
        },
        FallbackPoint {
            name: "Hadapsar".to_string(),
            latitude: 18.5000,
            longitude: 73.9300,
        },
    ]
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_geocoding_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            fuel_price: default_fuel_price(),
            fuel_efficiency: default_fuel_efficiency(),
            traffic_level: default_traffic_level(),
            currency: default_currency(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            points: default_fallback_points(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl RouteConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // A path given on the command line must exist
        let (config_file, required) = match config_path {
            Some(path) => (path, true),
            None => (
                Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml")),
                false,
            ),
        };

        if required || config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(required)
                    .format(config::FileFormat::Toml),
            );
        }

        // COURIER_ROUTE_GEOCODING__API_KEY, COURIER_ROUTE_DEFAULTS__FUEL_PRICE, ...
        builder = builder.add_source(
            Environment::with_prefix("COURIER_ROUTE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().with_context(|| {
            format!("Failed to load configuration from {}", config_file.display())
        })?;

        let mut config: RouteConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("courier-route").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.currency.is_empty() {
            self.defaults.currency = default_currency();
        }
        if self.fallback.points.is_empty() {
            self.fallback.points = default_fallback_points();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_fallback()?;
        Ok(())
    }

    /// Validate the geocoding credential, if one is configured
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.geocoding.api_key {
            if api_key.trim().is_empty() {
                return Err(RouteError::config(
                    "Geocoding API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoding.timeout_seconds > 300 {
            return Err(RouteError::config("Geocoding timeout cannot exceed 300 seconds").into());
        }

        let defaults = &self.defaults;
        if !defaults.fuel_price.is_finite() || defaults.fuel_price < 0.0 {
            return Err(RouteError::config("Default fuel price must be a non-negative number").into());
        }

        if !defaults.fuel_efficiency.is_finite() || defaults.fuel_efficiency <= 0.0 {
            return Err(RouteError::config("Default fuel efficiency must be greater than zero").into());
        }

        if !(0.0..=1.0).contains(&defaults.traffic_level) {
            return Err(RouteError::config("Default traffic level must be between 0 and 1").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RouteError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RouteError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.geocoding.base_url.starts_with("http://")
            && !self.geocoding.base_url.starts_with("https://")
        {
            return Err(RouteError::config(
                "Geocoding base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }

    fn validate_fallback(&self) -> Result<()> {
        if self.fallback.points.len() < 2 {
            return Err(RouteError::config("At least 2 fallback points are required").into());
        }
        for point in &self.fallback.points {
            if !Coordinate::new(point.latitude, point.longitude).is_valid() {
                return Err(RouteError::config(format!(
                    "Fallback point '{}' has invalid coordinates",
                    point.name
                ))
                .into());
            }
        }
        Ok(())
    }
}
