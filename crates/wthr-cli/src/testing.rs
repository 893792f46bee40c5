//! Test doubles shared by the handler and flow tests.

use std::cell::RefCell;
use std::collections::HashMap;
use wthr_core::apis::{Geocoder, Lookup};
use wthr_core::credentials::Token;
use wthr_core::error::ApiError;
use wthr_core::geolocation::Geolocation;

pub const TOKEN: &str = "0123456789abcdef0123456789abcdef";

pub fn token() -> Token {
    Token::parse(TOKEN).expect("test token is well-formed")
}

pub fn london() -> Geolocation {
    Geolocation::new("London", "GB", "", 51.5074, -0.1278)
}

/// In-memory [`Geocoder`] with canned answers.
///
/// Unknown queries resolve to [`Lookup::NotFound`]. Every query is recorded.
#[derive(Debug, Default)]
pub struct CannedGeocoder {
    pub by_name: HashMap<String, Vec<Geolocation>>,
    pub by_coordinates: Vec<((f64, f64), Vec<Geolocation>)>,
    pub accepted_tokens: Vec<String>,
    pub ip: Option<String>,
    pub coarse: Option<(f64, f64)>,
    pub offline: bool,
    pub name_queries: RefCell<Vec<String>>,
    pub coordinate_queries: RefCell<Vec<(f64, f64)>>,
}

impl CannedGeocoder {
    pub fn with_name(mut self, query: &str, candidates: Vec<Geolocation>) -> Self {
        self.by_name.insert(query.to_string(), candidates);
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lon: f64, candidates: Vec<Geolocation>) -> Self {
        self.by_coordinates.push(((lat, lon), candidates));
        self
    }

    pub fn with_ip(mut self, ip: &str, coarse: Option<(f64, f64)>) -> Self {
        self.ip = Some(ip.to_string());
        self.coarse = coarse;
        self
    }

    pub fn accepting(mut self, token: &str) -> Self {
        self.accepted_tokens.push(token.to_string());
        self
    }

    fn network(&self) -> Result<(), ApiError> {
        if self.offline {
            let err = reqwest::blocking::Client::new()
                .get("http://")
                .send()
                .expect_err("request to an empty host must fail");
            return Err(ApiError::NetworkUnavailable(err.without_url()));
        }
        Ok(())
    }
}

impl Geocoder for CannedGeocoder {
    fn resolve_by_name(&self, query: &str, _token: &Token) -> Result<Lookup, ApiError> {
        self.network()?;
        self.name_queries.borrow_mut().push(query.to_string());
        let candidates = self.by_name.get(query).cloned().unwrap_or_default();
        Ok(Lookup::from_candidates(candidates))
    }

    fn resolve_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        _token: &Token,
    ) -> Result<Lookup, ApiError> {
        self.network()?;
        self.coordinate_queries.borrow_mut().push((lat, lon));
        let candidates = self
            .by_coordinates
            .iter()
            .find(|(coords, _)| *coords == (lat, lon))
            .map(|(_, candidates)| candidates.clone())
            .unwrap_or_default();
        Ok(Lookup::from_candidates(candidates))
    }

    fn validate_credential(&self, token: &Token) -> Result<bool, ApiError> {
        self.network()?;
        Ok(self.accepted_tokens.iter().any(|t| t == token.as_str()))
    }

    fn detect_public_ip(&self) -> Result<Option<String>, ApiError> {
        self.network()?;
        Ok(self.ip.clone())
    }

    fn coarse_location(&self, _ip: &str) -> Result<Option<(f64, f64)>, ApiError> {
        self.network()?;
        Ok(self.coarse)
    }
}
