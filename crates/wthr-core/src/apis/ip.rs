use crate::apis::{decode_error, send};
use crate::error::ApiError;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Http client for public IP detection (ipify) and IP geolocation (ip-api).
#[derive(Debug, Clone)]
pub struct IpClient {
    ip_url: String,
    locate_url: String,
    client: Client,
}

impl IpClient {
    pub fn new() -> Self {
        Self::with_urls("https://api.ipify.org", "http://ip-api.com/json/")
    }

    /// `locate_url` must end with `/`, the IP is appended to it.
    pub fn with_urls(ip_url: impl Into<String>, locate_url: impl Into<String>) -> Self {
        Self {
            ip_url: ip_url.into(),
            locate_url: locate_url.into(),
            client: Client::new(),
        }
    }

    /// `None` when the service answers with an error or an empty body.
    pub fn public_ip(&self) -> Result<Option<String>, ApiError> {
        let resp = send(self.client.get(&self.ip_url))?;
        let status = resp.status();
        if !status.is_success() {
            warn!("Public IP lookup rejected with status {status}");
            return Ok(None);
        }

        let ip = resp.text().map_err(decode_error("public IP"))?.trim().to_string();
        if ip.is_empty() {
            warn!("Public IP lookup returned an empty body");
            return Ok(None);
        }
        debug!("Public IP: {ip}");

        Ok(Some(ip))
    }

    pub fn coordinates(&self, ip: &str) -> Result<Option<(f64, f64)>, ApiError> {
        let request = self
            .client
            .get(format!("{}{ip}", self.locate_url))
            .query(&[("fields", "status,message,lat,lon")]);

        let resp = send(request)?;
        let status = resp.status();
        if !status.is_success() {
            warn!("IP geolocation rejected with status {status}");
            return Ok(None);
        }

        let body: IpLocationResponse = resp.json().map_err(decode_error("IP geolocation"))?;

        Ok(body.coordinates())
    }
}

impl Default for IpClient {
    fn default() -> Self {
        IpClient::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocationResponse {
    fn coordinates(self) -> Option<(f64, f64)> {
        if self.status != "success" {
            warn!(
                "IP geolocation failed: {}",
                self.message.as_deref().unwrap_or("no reason given")
            );
            return None;
        }

        Some((self.lat?, self.lon?))
    }
}
