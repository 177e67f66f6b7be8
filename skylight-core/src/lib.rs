//! Core library for the `skylight` weather dashboard.
//!
//! This crate defines:
//! - The static location directory and bundled sunrise/sunset table
//! - The daylight calculator (day/night moment used for theming)
//! - The weather data aggregator over the CWB open-data services
//! - Persisted city selection
//!
//! It is used by `skylight-cli`, but can also be reused by other hosts.

pub mod aggregator;
pub mod daylight;
pub mod error;
pub mod location;
pub mod model;
pub mod source;
pub mod store;

pub use aggregator::WeatherAggregator;
pub use daylight::{Moment, SunriseTable, determine_moment};
pub use error::ServiceError;
pub use location::{Location, find_location};
pub use model::{CurrentConditions, ForecastSummary, Weather, WeatherState};
pub use source::{CwbClient, WeatherSource};
pub use store::{SelectionStore, Settings};
