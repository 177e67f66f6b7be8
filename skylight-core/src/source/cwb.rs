use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{ServiceError, Upstream};
use crate::model::{CurrentConditions, ForecastSummary};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://opendata.cwb.gov.tw/api";

const OBSERVATION_DATASET: &str = "O-A0003-001";
const FORECAST_DATASET: &str = "F-C0032-001";

/// Elements kept from an observation body; everything else is dropped.
const OBSERVATION_ELEMENTS: [&str; 3] = ["WDSD", "TEMP", "HUMD"];
/// Elements kept from a forecast body.
const FORECAST_ELEMENTS: [&str; 3] = ["Wx", "PoP", "CI"];

/// Client for the CWB open-data datastore services.
#[derive(Debug, Clone)]
pub struct CwbClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl CwbClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host, e.g. a mock server in tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn fetch_body(
        &self,
        upstream: Upstream,
        dataset: &str,
        location_name: &str,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/v1/rest/datastore/{dataset}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("Authorization", self.api_key.as_str()),
                ("locationName", location_name),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Request(upstream, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ServiceError::Request(upstream, e))?;

        if !status.is_success() {
            return Err(ServiceError::Status {
                upstream,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationResponse {
    records: ObservationRecords,
}

#[derive(Debug, Deserialize)]
struct ObservationRecords {
    location: Vec<ObservationLocation>,
}

#[derive(Debug, Deserialize)]
struct ObservationLocation {
    #[serde(rename = "locationName")]
    location_name: String,
    time: ObservationTime,
    #[serde(rename = "weatherElement")]
    weather_element: Vec<ObservationElement>,
}

#[derive(Debug, Deserialize)]
struct ObservationTime {
    #[serde(rename = "obsTime")]
    obs_time: String,
}

#[derive(Debug, Deserialize)]
struct ObservationElement {
    #[serde(rename = "elementName")]
    element_name: String,
    #[serde(rename = "elementValue")]
    element_value: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    records: ForecastRecords,
}

#[derive(Debug, Deserialize)]
struct ForecastRecords {
    location: Vec<ForecastLocation>,
}

#[derive(Debug, Deserialize)]
struct ForecastLocation {
    #[serde(rename = "weatherElement")]
    weather_element: Vec<ForecastElement>,
}

#[derive(Debug, Deserialize)]
struct ForecastElement {
    #[serde(rename = "elementName")]
    element_name: String,
    time: Vec<ForecastTimeSlot>,
}

#[derive(Debug, Deserialize)]
struct ForecastTimeSlot {
    parameter: ForecastParameter,
}

#[derive(Debug, Deserialize)]
struct ForecastParameter {
    #[serde(rename = "parameterName")]
    parameter_name: String,
    #[serde(rename = "parameterValue")]
    parameter_value: Option<String>,
}

#[async_trait]
impl WeatherSource for CwbClient {
    async fn latest_observation(
        &self,
        location_name: &str,
    ) -> Result<CurrentConditions, ServiceError> {
        debug!(location_name, "fetching latest observation");

        let body = self
            .fetch_body(Upstream::Observation, OBSERVATION_DATASET, location_name)
            .await?;

        let parsed: ObservationResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Malformed(Upstream::Observation, e.to_string()))?;

        let location = parsed.records.location.into_iter().next().ok_or_else(|| {
            ServiceError::Malformed(Upstream::Observation, "no location in records".into())
        })?;

        let mut needed: HashMap<String, String> = HashMap::new();
        for element in location.weather_element {
            if OBSERVATION_ELEMENTS.contains(&element.element_name.as_str()) {
                needed.insert(element.element_name, element.element_value);
            }
        }

        let mut take = |name: &str| {
            needed.remove(name).ok_or_else(|| {
                ServiceError::Malformed(Upstream::Observation, format!("missing element {name}"))
            })
        };

        Ok(CurrentConditions {
            observation_time: location.time.obs_time,
            location_name: location.location_name,
            wind_speed: take("WDSD")?,
            temperature: take("TEMP")?,
            humid: take("HUMD")?,
        })
    }

    async fn short_term_forecast(
        &self,
        city_name: &str,
    ) -> Result<ForecastSummary, ServiceError> {
        debug!(city_name, "fetching short-term forecast");

        let body = self
            .fetch_body(Upstream::Forecast, FORECAST_DATASET, city_name)
            .await?;

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Malformed(Upstream::Forecast, e.to_string()))?;

        let location = parsed.records.location.into_iter().next().ok_or_else(|| {
            ServiceError::Malformed(Upstream::Forecast, "no location in records".into())
        })?;

        // Only the first time slot of each element matters here.
        let mut needed: HashMap<String, ForecastParameter> = HashMap::new();
        for element in location.weather_element {
            if FORECAST_ELEMENTS.contains(&element.element_name.as_str()) {
                if let Some(slot) = element.time.into_iter().next() {
                    needed.insert(element.element_name, slot.parameter);
                }
            }
        }

        let mut take = |name: &str| {
            needed.remove(name).ok_or_else(|| {
                ServiceError::Malformed(Upstream::Forecast, format!("missing element {name}"))
            })
        };

        let wx = take("Wx")?;
        let pop = take("PoP")?;
        let ci = take("CI")?;

        let weather_code = wx.parameter_value.ok_or_else(|| {
            ServiceError::Malformed(Upstream::Forecast, "Wx has no parameterValue".into())
        })?;

        Ok(ForecastSummary {
            description: wx.parameter_name,
            weather_code,
            rain_possibility: pop.parameter_name,
            comfortability: ci.parameter_name,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
