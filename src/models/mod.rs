//! Data models for the courier route planner
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and delivery stops
//! - Route: Tours over stop indices and their cost summary

pub mod location;
pub mod route;

// Re-export all public types for convenient access
pub use location::{Coordinate, Location};
pub use route::{RouteSummary, Tour};
