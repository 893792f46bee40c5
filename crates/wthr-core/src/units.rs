use serde::{Deserialize, Serialize};
use std::fmt;

/// Units of measurement understood by OpenWeather.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub const ALL: [Units; 3] = [Units::Metric, Units::Imperial, Units::Standard];

    /// Value of the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn wind_speed_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
            Units::Standard => "m/s",
        }
    }

    /// Convert a wind speed as reported by the API into the unit of
    /// [`Units::wind_speed_symbol`]. Metric is reported in m/s.
    pub fn display_wind_speed(&self, reported: f64) -> f64 {
        match self {
            Units::Metric => reported * 3.6,
            Units::Imperial | Units::Standard => reported,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
