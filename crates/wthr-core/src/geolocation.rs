use std::fmt;

/// A resolved place.
#[derive(Debug, Clone, PartialEq)]
pub struct Geolocation {
    pub name: String,
    pub country: String,
    /// Empty when the provider does not report one.
    pub state: String,
    pub lat: f64,
    pub lon: f64,
}

impl Geolocation {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        state: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            state: state.into(),
            lat,
            lon,
        }
    }

    pub fn has_valid_coordinates(&self) -> bool {
        coordinates_valid(self.lat, self.lon)
    }
}

impl fmt::Display for Geolocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state.is_empty() {
            write!(f, "{}, {}", self.name, self.country)?;
        } else {
            write!(f, "{}, {}, {}", self.name, self.state, self.country)?;
        }
        write!(f, " ({}, {})", self.lat, self.lon)
    }
}

/// Latitude in [-90, 90] and longitude in [-180, 180], both inclusive.
pub fn coordinates_valid(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Parse user input like `27.51434,83.099336` or `27.51434, 83.099336`.
///
/// Whitespace anywhere in the input is ignored. Returns `None` unless the
/// input holds exactly two comma separated finite numbers. Range checks are
/// left to [`coordinates_valid`].
pub fn parse_coordinate_pair(text: &str) -> Option<(f64, f64)> {
    if text.len() < 3 || !text.contains(',') {
        return None;
    }

    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let (lat, lon) = cleaned.split_once(',')?;
    if lon.contains(',') {
        return None;
    }

    let lat: f64 = lat.parse().ok()?;
    let lon: f64 = lon.parse().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    Some((lat, lon))
}
