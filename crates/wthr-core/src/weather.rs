use crate::geolocation::Geolocation;
use chrono::{DateTime, Utc};
use std::fmt;

/// Conditions at a single point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    pub descriptions: Vec<String>,
    pub temp: f64,
    pub temp_feel: f64,
    /// hPa
    pub pressure: u32,
    /// %
    pub humidity: u32,
    /// As reported by the API for the requested units.
    pub wind_speed: f64,
    /// Direction the wind blows from, when reported.
    pub wind_deg: Option<f64>,
    /// Precipitation over the last hour (current) or three hours (forecast), mm.
    pub rain: Option<f64>,
    pub snow: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub time: Option<DateTime<Utc>>,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    pub location: Geolocation,
    pub weather: Weather,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub location: Geolocation,
    pub entries: Vec<(DateTime<Utc>, Weather)>,
}

/// Compass point the wind is blowing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    /// Map meteorological degrees onto eight 45° sectors centred on north.
    /// Returns `None` outside [0, 360].
    pub fn from_degrees(deg: f64) -> Option<Self> {
        if !(0.0..=360.0).contains(&deg) {
            return None;
        }

        let direction = match deg {
            d if d < 22.5 => WindDirection::N,
            d if d < 67.5 => WindDirection::NE,
            d if d < 112.5 => WindDirection::E,
            d if d < 157.5 => WindDirection::SE,
            d if d < 202.5 => WindDirection::S,
            d if d < 247.5 => WindDirection::SW,
            d if d < 292.5 => WindDirection::W,
            d if d < 337.5 => WindDirection::NW,
            _ => WindDirection::N,
        };

        Some(direction)
    }

    /// Arrow pointing where the wind blows to.
    pub fn arrow(&self) -> char {
        match self {
            WindDirection::N => '↓',
            WindDirection::NE => '↙',
            WindDirection::E => '←',
            WindDirection::SE => '↖',
            WindDirection::S => '↑',
            WindDirection::SW => '↗',
            WindDirection::W => '→',
            WindDirection::NW => '↘',
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WindDirection::N => "N",
            WindDirection::NE => "NE",
            WindDirection::E => "E",
            WindDirection::SE => "SE",
            WindDirection::S => "S",
            WindDirection::SW => "SW",
            WindDirection::W => "W",
            WindDirection::NW => "NW",
        };
        write!(f, "{} {name}", self.arrow())
    }
}
