//! Error types and handling for the courier route planner

use thiserror::Error;

/// Main error type for route planning
#[derive(Error, Debug)]
pub enum RouteError {
    /// Configuration or request errors, raised before any lookup or computation
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input handed to a pipeline stage
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Fuel efficiency that cannot be divided by
    #[error("Invalid division: {message}")]
    DivisionInvalid { message: String },

    /// A single geocoding lookup failed
    #[error("Geocoding error: {message}")]
    Geocoding { message: String },

    /// HTTP communication errors
    #[error("API error: {message}")]
    Api { message: String },
}

impl RouteError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn division_invalid<S: Into<String>>(message: S) -> Self {
        Self::DivisionInvalid {
            message: message.into(),
        }
    }

    /// Create a new geocoding error
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::Geocoding {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Whether the error was caused by caller input rather than the environment
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RouteError::Config { .. }
                | RouteError::InvalidInput { .. }
                | RouteError::DivisionInvalid { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RouteError::Config { message } => {
                format!("Configuration error: {message}")
            }
            RouteError::InvalidInput { message } => {
                format!("Invalid input: {message}")
            }
            RouteError::DivisionInvalid { .. } => {
                "Fuel efficiency must be greater than zero.".to_string()
            }
            RouteError::Geocoding { message } => {
                format!("Could not geocode location: {message}")
            }
            RouteError::Api { .. } => {
                "Unable to connect to the geocoding service. Please check your internet connection and API key."
                    .to_string()
            }
        }
    }
}
