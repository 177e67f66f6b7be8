//! Abstraction over the two upstream weather services.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::ServiceError;
use crate::model::{CurrentConditions, ForecastSummary};

pub mod cwb;

pub use cwb::CwbClient;

/// The two fetches the aggregator joins. Implemented by [`CwbClient`] for
/// the real services; tests substitute stubs.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Latest observation for a station, keyed by its observation name.
    async fn latest_observation(
        &self,
        location_name: &str,
    ) -> Result<CurrentConditions, ServiceError>;

    /// Short-term forecast for a city, keyed by its display name.
    async fn short_term_forecast(
        &self,
        city_name: &str,
    ) -> Result<ForecastSummary, ServiceError>;
}
