//! Joins the observation and forecast fetches into one view-model record.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::error::ServiceError;
use crate::location::Location;
use crate::model::{Weather, WeatherState};
use crate::source::WeatherSource;

/// Owns the per-selection [`WeatherState`] slot and the fetch sequence.
///
/// `fetch_data` may be invoked again before an earlier call settles; the
/// fetches are never cancelled, but each invocation carries a generation
/// token and a completion whose token is no longer the newest is discarded
/// instead of overwriting a fresher result.
#[derive(Debug)]
pub struct WeatherAggregator<S> {
    source: S,
    state: Mutex<WeatherState>,
    generation: AtomicU64,
}

impl<S: WeatherSource> WeatherAggregator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(WeatherState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current view-model state.
    pub fn state(&self) -> WeatherState {
        self.lock_state().clone()
    }

    /// Run the whole fetch sequence for `location`.
    ///
    /// Sets `is_loading` before any request is issued, then fetches the
    /// observation (by `location_name`) and the forecast (by `city_name`)
    /// concurrently and waits for both. On success the merged record
    /// replaces the previous one; on failure `is_loading` is cleared and
    /// the error recorded in the state as well as returned.
    pub async fn fetch_data(&self, location: &Location) -> Result<(), ServiceError> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_state().is_loading = true;
        debug!(city = location.city_name, token, "fetch started");

        let result = tokio::try_join!(
            self.source.latest_observation(location.location_name),
            self.source.short_term_forecast(location.city_name),
        );

        let mut state = self.lock_state();
        if token != self.generation.load(Ordering::SeqCst) {
            // A newer fetch_data call owns the slot now.
            debug!(city = location.city_name, token, "discarding stale completion");
            return result.map(|_| ());
        }

        match result {
            Ok((current, forecast)) => {
                state.weather = Weather::merge(current, forecast);
                state.error = None;
                state.is_loading = false;
                info!(city = location.city_name, "weather updated");
                Ok(())
            }
            Err(err) => {
                state.is_loading = false;
                state.error = Some(err.to_string());
                warn!(city = location.city_name, error = %err, "fetch failed");
                Err(err)
            }
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WeatherState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Upstream;
    use crate::model::{CurrentConditions, ForecastSummary};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    const TAIPEI: Location = Location {
        city_name: "臺北市",
        location_name: "臺北",
        sunrise_city_name: "臺北",
    };

    fn conditions(temperature: &str) -> CurrentConditions {
        CurrentConditions {
            observation_time: "2024-01-01 12:00:00".into(),
            location_name: "臺北".into(),
            temperature: temperature.into(),
            wind_speed: "2.1".into(),
            humid: "0.80".into(),
        }
    }

    fn forecast() -> ForecastSummary {
        ForecastSummary {
            description: "多雲".into(),
            weather_code: "4".into(),
            rain_possibility: "30%".into(),
            comfortability: "舒適".into(),
        }
    }

    /// Stub whose first observation call signals `started` and then blocks
    /// until `release` fires; later calls resolve immediately.
    #[derive(Debug)]
    struct GatedSource {
        calls: AtomicU64,
        started: Mutex<Option<oneshot::Sender<()>>>,
        release: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl GatedSource {
        fn new() -> (Arc<Self>, oneshot::Receiver<()>, oneshot::Sender<()>) {
            let (started_tx, started_rx) = oneshot::channel();
            let (release_tx, release_rx) = oneshot::channel();
            let source = Arc::new(Self {
                calls: AtomicU64::new(0),
                started: Mutex::new(Some(started_tx)),
                release: Mutex::new(Some(release_rx)),
            });
            (source, started_rx, release_tx)
        }
    }

    #[async_trait]
    impl WeatherSource for Arc<GatedSource> {
        async fn latest_observation(
            &self,
            _location_name: &str,
        ) -> Result<CurrentConditions, ServiceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                let started = self.lock_started();
                if let Some(tx) = started {
                    let _ = tx.send(());
                }
                let release = self.lock_release();
                if let Some(rx) = release {
                    let _ = rx.await;
                }
                Ok(conditions("stale"))
            } else {
                Ok(conditions("fresh"))
            }
        }

        async fn short_term_forecast(
            &self,
            _city_name: &str,
        ) -> Result<ForecastSummary, ServiceError> {
            Ok(forecast())
        }
    }

    impl GatedSource {
        fn lock_started(&self) -> Option<oneshot::Sender<()>> {
            self.started.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take()
        }

        fn lock_release(&self) -> Option<oneshot::Receiver<()>> {
            self.release.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take()
        }
    }

    #[derive(Debug)]
    struct HappySource;

    #[async_trait]
    impl WeatherSource for HappySource {
        async fn latest_observation(
            &self,
            _location_name: &str,
        ) -> Result<CurrentConditions, ServiceError> {
            Ok(conditions("26.5"))
        }

        async fn short_term_forecast(
            &self,
            _city_name: &str,
        ) -> Result<ForecastSummary, ServiceError> {
            Ok(forecast())
        }
    }

    #[derive(Debug)]
    struct BrokenForecastSource;

    #[async_trait]
    impl WeatherSource for BrokenForecastSource {
        async fn latest_observation(
            &self,
            _location_name: &str,
        ) -> Result<CurrentConditions, ServiceError> {
            Ok(conditions("26.5"))
        }

        async fn short_term_forecast(
            &self,
            _city_name: &str,
        ) -> Result<ForecastSummary, ServiceError> {
            Err(ServiceError::Malformed(Upstream::Forecast, "boom".into()))
        }
    }

    #[tokio::test]
    async fn success_merges_both_partials_and_clears_loading() {
        let aggregator = WeatherAggregator::new(HappySource);
        assert!(!aggregator.state().is_loading);

        aggregator.fetch_data(&TAIPEI).await.expect("fetch succeeds");

        let state = aggregator.state();
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.weather.temperature, "26.5");
        assert_eq!(state.weather.description, "多雲");
        assert_eq!(state.weather.rain_possibility, "30%");
    }

    #[tokio::test]
    async fn failure_clears_loading_and_surfaces_the_error() {
        let aggregator = WeatherAggregator::new(BrokenForecastSource);

        let err = aggregator.fetch_data(&TAIPEI).await.expect_err("fetch fails");
        assert_eq!(err.upstream(), Upstream::Forecast);

        let state = aggregator.state();
        assert!(!state.is_loading, "loading must not stay stuck on failure");
        let message = state.error.expect("error is recorded in the state");
        assert!(message.contains("forecast"), "unexpected message: {message}");
        assert_eq!(state.weather, Weather::default());
    }

    #[tokio::test]
    async fn loading_is_observable_while_a_fetch_is_in_flight() {
        let (source, started, release) = GatedSource::new();
        let aggregator = Arc::new(WeatherAggregator::new(source));

        let task = tokio::spawn({
            let aggregator = Arc::clone(&aggregator);
            async move { aggregator.fetch_data(&TAIPEI).await }
        });

        started.await.expect("first fetch reaches the source");
        assert!(aggregator.state().is_loading);

        release.send(()).expect("gated fetch is still waiting");
        task.await.expect("task joins").expect("fetch succeeds");
        assert!(!aggregator.state().is_loading);
    }

    #[tokio::test]
    async fn stale_completion_does_not_overwrite_a_newer_result() {
        let (source, started, release) = GatedSource::new();
        let aggregator = Arc::new(WeatherAggregator::new(source));

        // First fetch blocks inside the source until released.
        let stale = tokio::spawn({
            let aggregator = Arc::clone(&aggregator);
            async move { aggregator.fetch_data(&TAIPEI).await }
        });
        started.await.expect("first fetch reaches the source");

        // Second fetch completes immediately and wins the slot.
        aggregator.fetch_data(&TAIPEI).await.expect("second fetch succeeds");
        assert_eq!(aggregator.state().weather.temperature, "fresh");

        // Now let the superseded fetch finish; its result must be dropped.
        release.send(()).expect("gated fetch is still waiting");
        stale.await.expect("task joins").expect("stale fetch itself succeeded");

        let state = aggregator.state();
        assert_eq!(state.weather.temperature, "fresh");
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }
}
