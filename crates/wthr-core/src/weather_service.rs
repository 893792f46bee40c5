use crate::apis::WeatherClient;
use crate::config::Configuration;
use crate::error::ApiError;
use crate::geolocation::coordinates_valid;
use crate::units::Units;
use crate::weather::{CurrentWeather, Forecast};
use thiserror::Error;
use tracing::debug;

/// Per-invocation values that take precedence over the stored configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Overrides {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub units: Option<Units>,
}

/// Resolved parameters of a single weather request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub lat: f64,
    pub lon: f64,
    pub units: Units,
}

#[derive(Debug, Error)]
pub enum WeatherServiceError {
    #[error(
        "invalid coordinates ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]"
    )]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug)]
pub struct WeatherService<W>
where
    W: WeatherClient,
{
    client: W,
}

impl<W> WeatherService<W>
where
    W: WeatherClient,
{
    pub fn new(client: W) -> Self {
        Self { client }
    }

    /// Current conditions at the home location unless overridden.
    pub fn current(
        &self,
        config: &Configuration,
        overrides: Overrides,
    ) -> Result<(Query, CurrentWeather), WeatherServiceError> {
        let query = resolve_query(config, overrides)?;
        let current = self
            .client
            .fetch_current(query.lat, query.lon, query.units, &config.settings.token)?;

        Ok((query, current))
    }

    /// Multi-day forecast at the home location unless overridden.
    pub fn forecast(
        &self,
        config: &Configuration,
        overrides: Overrides,
    ) -> Result<(Query, Forecast), WeatherServiceError> {
        let query = resolve_query(config, overrides)?;
        let forecast = self
            .client
            .fetch_forecast(query.lat, query.lon, query.units, &config.settings.token)?;

        Ok((query, forecast))
    }
}

/// Fill in whatever the caller did not override from `config`.
pub fn resolve_query(
    config: &Configuration,
    overrides: Overrides,
) -> Result<Query, WeatherServiceError> {
    let lat = overrides.lat.unwrap_or(config.home.lat);
    let lon = overrides.lon.unwrap_or(config.home.lon);
    let units = overrides.units.unwrap_or(config.settings.units);
    debug!("Resolved query: ({lat}, {lon}) in {units}");

    if !coordinates_valid(lat, lon) {
        return Err(WeatherServiceError::InvalidCoordinates { lat, lon });
    }

    Ok(Query { lat, lon, units })
}
