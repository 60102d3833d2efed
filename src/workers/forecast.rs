use super::Source;
use crate::aemet::{AemetClient, DailyForecast, HourlyForecast};
use crate::error::FetchError;

/// Whatever part of the forecast could be fetched this round.
#[derive(Debug, Clone)]
pub struct ForecastUpdate {
    pub daily: Option<DailyForecast>,
    pub hourly: Option<HourlyForecast>,
}

/// Polls the daily and hourly municipality forecasts.
pub struct ForecastSource {
    client: AemetClient,
}

impl ForecastSource {
    pub fn new(client: AemetClient) -> Self {
        Self { client }
    }
}

impl Source for ForecastSource {
    type Output = ForecastUpdate;

    fn name(&self) -> &'static str {
        "forecast"
    }

    /// Fails only when both documents failed; a single failure is logged
    /// and the other document is still delivered.
    fn fetch(&mut self) -> Result<ForecastUpdate, FetchError> {
        let daily = self.client.daily_forecast();
        let hourly = self.client.hourly_forecast();

        match (daily, hourly) {
            (Err(daily_err), Err(hourly_err)) => {
                log::warn!("Daily forecast failed: {}", daily_err);
                Err(hourly_err)
            }
            (daily, hourly) => {
                if let Err(e) = &daily {
                    log::warn!("Daily forecast failed: {}", e);
                }
                if let Err(e) = &hourly {
                    log::warn!("Hourly forecast failed: {}", e);
                }
                Ok(ForecastUpdate {
                    daily: daily.ok(),
                    hourly: hourly.ok(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aemet::types::fixtures::{DAILY, HOURLY};
    use crate::config::AemetConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn source_for(server: &MockServer) -> ForecastSource {
        let config = AemetConfig {
            base_url: server.base_url(),
            ..AemetConfig::default()
        };
        ForecastSource::new(AemetClient::new(&config).unwrap())
    }

    #[test]
    fn test_both_documents() {
        let server = MockServer::start();
        for (kind, body) in [("diaria", DAILY), ("horaria", HOURLY)] {
            server.mock(|when, then| {
                when.path(format!("/prediccion/especifica/municipio/{}/29067", kind));
                then.status(200)
                    .json_body(json!({ "datos": server.url(format!("/sh/{}", kind)) }));
            });
            server.mock(|when, then| {
                when.path(format!("/sh/{}", kind));
                then.status(200).body(body);
            });
        }

        let update = source_for(&server).fetch().unwrap();
        assert!(update.daily.is_some());
        assert!(update.hourly.is_some());
    }

    #[test]
    fn test_partial_failure_still_succeeds() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.path("/prediccion/especifica/municipio/diaria/29067");
            then.status(200)
                .json_body(json!({ "datos": server.url("/sh/diaria") }));
        });
        server.mock(|when, then| {
            when.path("/sh/diaria");
            then.status(200).body(DAILY);
        });
        server.mock(|when, then| {
            when.path("/prediccion/especifica/municipio/horaria/29067");
            then.status(500);
        });

        let update = source_for(&server).fetch().unwrap();
        assert!(update.daily.is_some());
        assert!(update.hourly.is_none());
    }

    #[test]
    fn test_both_failing_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.path_contains("/prediccion/");
            then.status(429);
        });

        assert!(matches!(
            source_for(&server).fetch(),
            Err(FetchError::Status { status: 429, .. })
        ));
    }
}
