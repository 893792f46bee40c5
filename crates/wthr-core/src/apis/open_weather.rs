use crate::apis::{Lookup, VALIDATION_QUERY, WeatherClient, decode_error, send};
use crate::credentials::Token;
use crate::error::ApiError;
use crate::geolocation::Geolocation;
use crate::units::Units;
use crate::weather::{CurrentWeather, Forecast, Weather};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Http client for the OpenWeather geocoding and weather APIs.
///
/// Uses the blocking client's default 30 second timeout.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    url: String,
    client: Client,
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self::with_url("https://api.openweathermap.org/")
    }

    /// Point the client at another host, e.g. a local stub. `url` must end with `/`.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    pub fn direct_geocoding(&self, query: &str, limit: u8, token: &Token) -> Result<Lookup, ApiError> {
        debug!("Geocoding `{query}`");
        let limit = limit.to_string();
        let request = self.client.get(self.endpoint("geo/1.0/direct")).query(&[
            ("q", query),
            ("limit", limit.as_str()),
            ("appid", token.as_str()),
        ]);

        lookup_from_response(send(request)?)
    }

    pub fn reverse_geocoding(
        &self,
        lat: f64,
        lon: f64,
        limit: u8,
        token: &Token,
    ) -> Result<Lookup, ApiError> {
        debug!("Reverse geocoding ({lat}, {lon})");
        let request = self.client.get(self.endpoint("geo/1.0/reverse")).query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("limit", limit.to_string()),
            ("appid", token.as_str().to_string()),
        ]);

        lookup_from_response(send(request)?)
    }

    /// Minimal lookup with `token`; any success status means the key works.
    pub fn token_accepted(&self, token: &Token) -> Result<bool, ApiError> {
        let request = self
            .client
            .get(self.endpoint("geo/1.0/direct"))
            .query(&[("q", VALIDATION_QUERY), ("appid", token.as_str())]);

        let status = send(request)?.status();
        debug!("Token validation status: {status}");

        Ok(status.is_success())
    }

    fn weather_request(
        &self,
        path: &str,
        lat: f64,
        lon: f64,
        units: Units,
        token: &Token,
    ) -> Result<Response, ApiError> {
        let request = self.client.get(self.endpoint(path)).query(&[
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("units", units.as_str().to_string()),
            ("appid", token.as_str().to_string()),
        ]);

        let resp = send(request)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(bad_request(status, &body));
        }

        Ok(resp)
    }
}

impl Default for OpenWeatherClient {
    fn default() -> Self {
        OpenWeatherClient::new()
    }
}

impl WeatherClient for OpenWeatherClient {
    fn fetch_current(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
        token: &Token,
    ) -> Result<CurrentWeather, ApiError> {
        debug!("Fetching current weather for ({lat}, {lon}) in {units}");
        let body: CurrentResponse = self
            .weather_request("data/2.5/weather", lat, lon, units, token)?
            .json()
            .map_err(decode_error("current weather"))?;

        Ok(body.into())
    }

    fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
        token: &Token,
    ) -> Result<Forecast, ApiError> {
        debug!("Fetching forecast for ({lat}, {lon}) in {units}");
        let body: ForecastResponse = self
            .weather_request("data/2.5/forecast", lat, lon, units, token)?
            .json()
            .map_err(decode_error("forecast"))?;

        Ok(body.into())
    }
}

fn lookup_from_response(resp: Response) -> Result<Lookup, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        warn!("Geocoding request rejected with status {status}");
        return Ok(Lookup::NotFound);
    }

    let body: Vec<GeocodingEntry> = resp.json().map_err(decode_error("geocoding"))?;

    Ok(candidates(body))
}

fn candidates(entries: Vec<GeocodingEntry>) -> Lookup {
    let candidates = entries
        .into_iter()
        .map(Geolocation::from)
        .filter(|loc| {
            let valid = loc.has_valid_coordinates();
            if !valid {
                warn!("Dropping candidate with invalid coordinates: {loc}");
            }
            valid
        })
        .collect();

    Lookup::from_candidates(candidates)
}

/// Turn a rejected weather request into [`ApiError::BadRequest`], keeping
/// the provider's message when the body carries one.
fn bad_request(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|err| err.message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string());

    ApiError::BadRequest {
        code: status.as_u16(),
        message,
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    let time = DateTime::from_timestamp(secs, 0);
    if time.is_none() {
        warn!("Ignoring out of range timestamp {secs}");
    }
    time
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeocodingEntry {
    name: String,
    country: String,
    #[serde(default)]
    state: String,
    lat: f64,
    lon: f64,
}

impl From<GeocodingEntry> for Geolocation {
    fn from(entry: GeocodingEntry) -> Self {
        Geolocation::new(entry.name, entry.country, entry.state, entry.lat, entry.lon)
    }
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Description {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    pressure: u32,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    coord: Coord,
    weather: Vec<Description>,
    main: Main,
    wind: Wind,
    #[serde(default)]
    rain: HashMap<String, f64>,
    #[serde(default)]
    snow: HashMap<String, f64>,
    dt: i64,
    sys: CurrentSys,
    name: String,
}

impl From<CurrentResponse> for CurrentWeather {
    fn from(body: CurrentResponse) -> Self {
        CurrentWeather {
            time: timestamp(body.dt),
            sunrise: timestamp(body.sys.sunrise),
            sunset: timestamp(body.sys.sunset),
            location: Geolocation::new(
                body.name,
                body.sys.country,
                "",
                body.coord.lat,
                body.coord.lon,
            ),
            weather: weather(
                body.weather,
                body.main,
                body.wind,
                body.rain.get("1h").copied(),
                body.snow.get("1h").copied(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: Main,
    weather: Vec<Description>,
    wind: Wind,
    #[serde(default)]
    rain: HashMap<String, f64>,
    #[serde(default)]
    snow: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastCity {
    name: String,
    #[serde(default)]
    country: String,
    coord: Coord,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: ForecastCity,
}

impl From<ForecastResponse> for Forecast {
    fn from(body: ForecastResponse) -> Self {
        Forecast {
            location: Geolocation::new(
                body.city.name,
                body.city.country,
                "",
                body.city.coord.lat,
                body.city.coord.lon,
            ),
            entries: body
                .list
                .into_iter()
                .filter_map(|entry| {
                    Some((
                        timestamp(entry.dt)?,
                        weather(
                            entry.weather,
                            entry.main,
                            entry.wind,
                            entry.rain.get("3h").copied(),
                            entry.snow.get("3h").copied(),
                        ),
                    ))
                })
                .collect(),
        }
    }
}

fn weather(
    descriptions: Vec<Description>,
    main: Main,
    wind: Wind,
    rain: Option<f64>,
    snow: Option<f64>,
) -> Weather {
    Weather {
        descriptions: descriptions.into_iter().map(|d| d.description).collect(),
        temp: main.temp,
        temp_feel: main.feels_like,
        pressure: main.pressure,
        humidity: main.humidity,
        wind_speed: wind.speed,
        wind_deg: wind.deg,
        rain,
        snow,
    }
}
