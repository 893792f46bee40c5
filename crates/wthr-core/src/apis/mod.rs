use crate::credentials::Token;
use crate::error::ApiError;
use crate::geolocation::Geolocation;
use crate::units::Units;
use crate::weather::{CurrentWeather, Forecast};
use reqwest::blocking::{RequestBuilder, Response};
use tracing::debug;

pub use ip::IpClient;
pub use open_weather::OpenWeatherClient;

mod ip;
mod open_weather;
#[cfg(test)]
mod test_server;

/// How many candidates a geocoding query asks for.
pub const GEOCODING_LIMIT: u8 = 5;

/// City used to check whether the provider accepts a token.
pub const VALIDATION_QUERY: &str = "London";

/// Outcome of a single geocoding query.
///
/// `NotFound` covers both "no matches" and "provider refused the query". In
/// both cases the caller asks the user for different input.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Always holds at least one candidate.
    Found(Vec<Geolocation>),
    NotFound,
}

impl Lookup {
    pub fn from_candidates(candidates: Vec<Geolocation>) -> Self {
        if candidates.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::Found(candidates)
        }
    }

    pub fn into_candidates(self) -> Vec<Geolocation> {
        match self {
            Lookup::Found(candidates) => candidates,
            Lookup::NotFound => Vec::new(),
        }
    }
}

/// Abstraction over the geocoding and IP lookup services.
pub trait Geocoder {
    /// Forward geocoding of free text such as `London, GB`.
    fn resolve_by_name(&self, query: &str, token: &Token) -> Result<Lookup, ApiError>;

    /// Reverse geocoding of a coordinate pair.
    fn resolve_by_coordinates(&self, lat: f64, lon: f64, token: &Token)
    -> Result<Lookup, ApiError>;

    /// Whether the provider accepts `token`.
    fn validate_credential(&self, token: &Token) -> Result<bool, ApiError>;

    /// Caller's externally visible IP address, `None` when the IP service
    /// can't tell.
    fn detect_public_ip(&self) -> Result<Option<String>, ApiError>;

    /// Rough coordinates of an IP address, if the provider can place it.
    fn coarse_location(&self, ip: &str) -> Result<Option<(f64, f64)>, ApiError>;

    /// Named place for an IP address.
    ///
    /// The coarse coordinates are reverse geocoded so the result carries a
    /// place name. The first candidate wins.
    fn locate_ip(&self, ip: &str, token: &Token) -> Result<Option<Geolocation>, ApiError> {
        let Some((lat, lon)) = self.coarse_location(ip)? else {
            debug!("No coarse location for IP {ip}");
            return Ok(None);
        };
        debug!("IP {ip} placed at ({lat}, {lon})");

        let location = self
            .resolve_by_coordinates(lat, lon, token)?
            .into_candidates()
            .into_iter()
            .next();
        debug!("IP {ip} resolved to {location:?}");

        Ok(location)
    }
}

/// Abstraction over the weather data endpoints.
pub trait WeatherClient {
    fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
        token: &Token,
    ) -> Result<CurrentWeather, ApiError>;

    fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
        token: &Token,
    ) -> Result<Forecast, ApiError>;
}

/// Production [`Geocoder`]: OpenWeather for places, ipify and ip-api for IPs.
#[derive(Debug, Default)]
pub struct HttpGeocoder {
    open_weather: OpenWeatherClient,
    ip: IpClient,
}

impl HttpGeocoder {
    pub fn new(open_weather: OpenWeatherClient, ip: IpClient) -> Self {
        Self { open_weather, ip }
    }
}

impl Geocoder for HttpGeocoder {
    fn resolve_by_name(&self, query: &str, token: &Token) -> Result<Lookup, ApiError> {
        self.open_weather.direct_geocoding(query, GEOCODING_LIMIT, token)
    }

    fn resolve_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        token: &Token,
    ) -> Result<Lookup, ApiError> {
        self.open_weather.reverse_geocoding(lat, lon, GEOCODING_LIMIT, token)
    }

    fn validate_credential(&self, token: &Token) -> Result<bool, ApiError> {
        self.open_weather.token_accepted(token)
    }

    fn detect_public_ip(&self) -> Result<Option<String>, ApiError> {
        self.ip.public_ip()
    }

    fn coarse_location(&self, ip: &str) -> Result<Option<(f64, f64)>, ApiError> {
        self.ip.coordinates(ip)
    }
}

/// Send a request, mapping any transport failure to
/// [`ApiError::NetworkUnavailable`].
///
/// Request urls carry the token in their query, so they are stripped from
/// every error kept as a source.
fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let resp = request
        .send()
        .map_err(|err| ApiError::NetworkUnavailable(err.without_url()))?;
    debug!("Response status {} from {}", resp.status(), resp.url().path());
    Ok(resp)
}

/// [`ApiError::Decode`] for a body that isn't what `what` should look like.
fn decode_error(what: &'static str) -> impl FnOnce(reqwest::Error) -> ApiError {
    move |source| ApiError::Decode {
        what,
        source: source.without_url(),
    }
}
