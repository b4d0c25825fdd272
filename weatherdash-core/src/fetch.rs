//! Live-or-synthetic snapshot acquisition.

use chrono::Local;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    error::UpstreamError,
    model::{Coordinates, WeatherSnapshot},
    normalize::normalize,
    provider::WeatherSource,
    synthetic::synthesize,
};

/// Fetches both OpenWeather payloads for a position and normalizes them, falling back
/// to synthetic data on any failure. No retries.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    source: Arc<dyn WeatherSource>,
}

impl WeatherFetcher {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Always returns a snapshot; check [`WeatherSnapshot::source`] to tell live from synthetic.
    pub async fn fetch(&self, at: Coordinates, display_name: Option<&str>) -> WeatherSnapshot {
        self.fetch_or_label(at, display_name, display_name).await
    }

    /// Like [`fetch`](Self::fetch), but demo data is labelled `fallback_name` while live
    /// data keeps the upstream place name unless `display_name` is set.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_or_label(
        &self,
        at: Coordinates,
        display_name: Option<&str>,
        fallback_name: Option<&str>,
    ) -> WeatherSnapshot {
        match self.fetch_live(at, display_name).await {
            Ok(snapshot) => {
                info!(location = %snapshot.location, "Loaded live weather");
                snapshot
            }
            Err(err) => {
                warn!(error = %err, "Live weather unavailable, using demo data");
                self.synthesize(Some(at), fallback_name)
            }
        }
    }

    /// The live path alone, with its error.
    pub async fn fetch_live(
        &self,
        at: Coordinates,
        display_name: Option<&str>,
    ) -> Result<WeatherSnapshot, UpstreamError> {
        let (current, forecast) =
            tokio::try_join!(self.source.current(at), self.source.forecast(at))?;

        let uv_index = rand::rng().random_range(0..=10);
        normalize(at, display_name, &current, &forecast, &Local, uv_index)
    }

    /// Demo data for `at`, labelled with `display_name`.
    pub fn synthesize(&self, at: Option<Coordinates>, display_name: Option<&str>) -> WeatherSnapshot {
        synthesize(&mut rand::rng(), at, display_name, &Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Condition, DataSource},
        provider::{Offline, openweather::{OpenWeatherClient, fixtures}},
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn here() -> Coordinates {
        Coordinates::new(38.72, -9.14)
    }

    async fn server_with(current: ResponseTemplate, forecast: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(current)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(forecast)
            .mount(&server)
            .await;
        server
    }

    fn fetcher_for(server: &MockServer) -> WeatherFetcher {
        WeatherFetcher::new(Arc::new(OpenWeatherClient::with_base_url(
            "KEY".into(),
            &server.uri(),
        )))
    }

    fn assert_well_formed(snap: &WeatherSnapshot) {
        assert!(snap.humidity <= 100);
        assert!(snap.uv_index <= 10);
        assert_eq!(snap.hourly.len(), 8);
        assert!(!snap.daily.is_empty() && snap.daily.len() <= 7);
    }

    fn assert_synthetic(snap: &WeatherSnapshot) {
        assert_eq!(snap.source, DataSource::Synthetic);
        assert!(Condition::SYNTHETIC.contains(&snap.condition));
        assert_eq!(snap.country, "US");
        assert_well_formed(snap);
    }

    #[tokio::test]
    async fn live_path_returns_normalized_snapshot() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(fixtures::current_json()),
            ResponseTemplate::new(200).set_body_json(fixtures::forecast_json(40)),
        )
        .await;

        let snap = fetcher_for(&server).fetch(here(), None).await;

        assert_eq!(snap.source, DataSource::Live);
        assert_eq!(snap.location, "Lisbon");
        assert_eq!(snap.country, "PT");
        assert_eq!(snap.coordinates, Some(here()));
        assert_well_formed(&snap);
    }

    #[tokio::test]
    async fn display_name_hint_is_used_on_live_path() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(fixtures::current_json()),
            ResponseTemplate::new(200).set_body_json(fixtures::forecast_json(40)),
        )
        .await;

        let snap = fetcher_for(&server).fetch(here(), Some("Alfama")).await;
        assert_eq!(snap.location, "Alfama");
    }

    #[tokio::test]
    async fn non_success_status_falls_back() {
        let server = server_with(
            ResponseTemplate::new(401).set_body_string("Invalid API key"),
            ResponseTemplate::new(200).set_body_json(fixtures::forecast_json(40)),
        )
        .await;

        let snap = fetcher_for(&server).fetch(here(), Some("Lisbon")).await;

        assert_synthetic(&snap);
        assert_eq!(snap.location, "Lisbon");
        assert_eq!(snap.coordinates, Some(here()));
    }

    #[tokio::test]
    async fn fallback_label_only_applies_to_demo_data() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(fixtures::current_json()),
            ResponseTemplate::new(200).set_body_json(fixtures::forecast_json(40)),
        )
        .await;

        let live = fetcher_for(&server)
            .fetch_or_label(here(), None, Some("Current Location"))
            .await;
        assert_eq!(live.location, "Lisbon");

        let demo = WeatherFetcher::new(Arc::new(Offline))
            .fetch_or_label(here(), None, Some("Current Location"))
            .await;
        assert_synthetic(&demo);
        assert_eq!(demo.location, "Current Location");
    }

    #[tokio::test]
    async fn forecast_failure_alone_falls_back() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_json(fixtures::current_json()),
            ResponseTemplate::new(500),
        )
        .await;

        let snap = fetcher_for(&server).fetch(here(), None).await;
        assert_synthetic(&snap);
        assert_eq!(snap.location, "New York");
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let server = server_with(
            ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
            ResponseTemplate::new(200).set_body_json(fixtures::forecast_json(40)),
        )
        .await;

        let snap = fetcher_for(&server).fetch(here(), None).await;
        assert_synthetic(&snap);
    }

    #[tokio::test]
    async fn network_error_falls_back() {
        // Nothing listens on the discard port.
        let fetcher = WeatherFetcher::new(Arc::new(OpenWeatherClient::with_base_url(
            "KEY".into(),
            "http://127.0.0.1:9",
        )));

        let snap = fetcher.fetch(here(), None).await;
        assert_synthetic(&snap);
    }

    #[tokio::test]
    async fn offline_source_is_permanent_demo_mode() {
        let fetcher = WeatherFetcher::new(Arc::new(Offline));

        let err = fetcher.fetch_live(here(), None).await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotConfigured));

        let snap = fetcher.fetch(here(), None).await;
        assert_synthetic(&snap);
    }
}
