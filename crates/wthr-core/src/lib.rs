//! Core library for the `wthr` CLI.
//!
//! Holds the domain types (locations, units, API token, persisted
//! configuration), the HTTP clients for geocoding, IP lookup and weather
//! data, and the coordinate rules shared by every frontend.

pub mod apis;
pub mod config;
pub mod credentials;
pub mod error;
pub mod geolocation;
pub mod units;
pub mod weather;
pub mod weather_service;
