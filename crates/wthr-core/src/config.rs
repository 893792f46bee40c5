use crate::credentials::Token;
use crate::error::ConfigError;
use crate::geolocation::Geolocation;
use crate::units::Units;
use std::path::Path;

/// The `SETTINGS` section.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub token: Token,
    pub units: Units,
}

/// Everything `wthr` persists between runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub settings: Settings,
    /// The `HOME` section, used when no coordinates are given.
    pub home: Geolocation,
}

impl Configuration {
    pub fn new(token: Token, units: Units, home: Geolocation) -> Self {
        Self {
            settings: Settings { token, units },
            home,
        }
    }
}

/// Abstraction over durable storage of the [`Configuration`].
///
/// Frontends pick the medium. The CLI keeps a TOML file in the user's home.
pub trait ConfigStore {
    /// Load the stored record.
    ///
    /// Fails with [`ConfigError::NotFound`] when nothing has been stored yet.
    fn read(&self) -> Result<Configuration, ConfigError>;

    /// Build a record from its parts, persist it (replacing any existing one)
    /// and return it.
    fn create(
        &mut self,
        token: Token,
        units: Units,
        home: Geolocation,
    ) -> Result<Configuration, ConfigError>;

    /// Where the record lives, for user-facing messages.
    fn path(&self) -> &Path;
}
