use crate::render::{render_current, render_forecast};
use anyhow::Result;
use tracing::debug;
use wthr_core::apis::WeatherClient;
use wthr_core::config::Configuration;
use wthr_core::error::ApiError;
use wthr_core::weather_service::{Overrides, WeatherService, WeatherServiceError};

/// Which report to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Current,
    Forecast,
}

/// `current` and `forecast` command handler.
pub struct WeatherHandler<W>
where
    W: WeatherClient,
{
    service: WeatherService<W>,
}

impl<W> WeatherHandler<W>
where
    W: WeatherClient,
{
    pub fn new(service: WeatherService<W>) -> Self {
        Self { service }
    }

    /// Run the weather flow.
    ///
    /// - Resolve coordinates and units: CLI overrides or stored settings.
    /// - Fetch the report and print human-readable output.
    /// - A request the provider rejects is reported, not treated as a failure.
    pub fn run(&self, config: &Configuration, report: Report, overrides: Overrides) -> Result<()> {
        debug!("Running {report:?} with {overrides:?}");
        match self.render(config, report, overrides) {
            Ok(output) => {
                println!("{output}");
                Ok(())
            }
            Err(WeatherServiceError::Api(err @ ApiError::BadRequest { .. })) => {
                println!("{err}");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn render(
        &self,
        config: &Configuration,
        report: Report,
        overrides: Overrides,
    ) -> Result<String, WeatherServiceError> {
        let output = match report {
            Report::Current => {
                let (query, current) = self.service.current(config, overrides)?;
                render_current(&current, query.units)
            }
            Report::Forecast => {
                let (query, forecast) = self.service.forecast(config, overrides)?;
                render_forecast(&forecast, query.units)
            }
        };

        Ok(output)
    }
}
