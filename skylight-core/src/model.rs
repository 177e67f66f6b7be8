use serde::{Deserialize, Serialize};

/// Partial record produced by the observation fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentConditions {
    pub observation_time: String,
    pub location_name: String,
    pub temperature: String,
    pub wind_speed: String,
    pub humid: String,
}

/// Partial record produced by the forecast fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastSummary {
    pub description: String,
    pub weather_code: String,
    pub rain_possibility: String,
    pub comfortability: String,
}

/// The flat record the display layer consumes. Replaced wholesale on each
/// successful fetch; values stay in the services' string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub observation_time: String,
    pub location_name: String,
    pub temperature: String,
    pub wind_speed: String,
    pub humid: String,
    pub description: String,
    pub weather_code: String,
    pub rain_possibility: String,
    pub comfortability: String,
}

impl Weather {
    pub fn merge(current: CurrentConditions, forecast: ForecastSummary) -> Self {
        Self {
            observation_time: current.observation_time,
            location_name: current.location_name,
            temperature: current.temperature,
            wind_speed: current.wind_speed,
            humid: current.humid,
            description: forecast.description,
            weather_code: forecast.weather_code,
            rain_possibility: forecast.rain_possibility,
            comfortability: forecast.comfortability,
        }
    }
}

/// The per-selection mutable slot the aggregator writes into.
///
/// `is_loading` toggles independently of the record; `error` carries the
/// last fetch failure and is cleared on the next success.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherState {
    pub weather: Weather,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_a_flat_union_of_both_partials() {
        let merged = Weather::merge(
            CurrentConditions {
                observation_time: "2024-01-01 12:00:00".into(),
                location_name: "臺北".into(),
                temperature: "26.5".into(),
                wind_speed: "2.1".into(),
                humid: "0.80".into(),
            },
            ForecastSummary {
                description: "多雲".into(),
                weather_code: "4".into(),
                rain_possibility: "30%".into(),
                comfortability: "舒適".into(),
            },
        );

        assert_eq!(merged.observation_time, "2024-01-01 12:00:00");
        assert_eq!(merged.location_name, "臺北");
        assert_eq!(merged.temperature, "26.5");
        assert_eq!(merged.wind_speed, "2.1");
        assert_eq!(merged.humid, "0.80");
        assert_eq!(merged.description, "多雲");
        assert_eq!(merged.weather_code, "4");
        assert_eq!(merged.rain_possibility, "30%");
        assert_eq!(merged.comfortability, "舒適");
    }
}
