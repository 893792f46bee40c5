use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wthr_core::config::{ConfigStore, Configuration};
use wthr_core::credentials::Token;
use wthr_core::error::ConfigError;
use wthr_core::geolocation::Geolocation;
use wthr_core::units::Units;

/// Where the settings file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigContext {
    pub dir: PathBuf,
    pub file_name: String,
}

impl ConfigContext {
    pub const DIR_NAME: &'static str = ".wthr";
    pub const FILE_NAME: &'static str = "wthr.toml";

    /// `<home>/.wthr/wthr.toml`
    pub fn from_home() -> Result<Self> {
        let dirs =
            directories::UserDirs::new().context("failed to determine user home directory")?;

        Ok(Self::in_dir(dirs.home_dir().join(Self::DIR_NAME)))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: Self::FILE_NAME.to_string(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// On-disk settings format.
///
/// Example TOML:
/// ```toml
/// [SETTINGS]
/// token = "0123456789abcdef0123456789abcdef"
/// units = "metric"
///
/// [HOME]
/// name = "London"
/// "state/region" = ""
/// country = "GB"
/// lat = "51.5074"
/// lon = "-0.1278"
/// ```
///
/// Coordinates are kept as decimal strings so they are written exactly as
/// accepted, with no rounding.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(rename = "SETTINGS")]
    settings: SettingsSection,
    #[serde(rename = "HOME")]
    home: HomeSection,
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsSection {
    token: Token,
    units: Units,
}

#[derive(Debug, Serialize, Deserialize)]
struct HomeSection {
    name: String,
    #[serde(rename = "state/region", default)]
    state: String,
    country: String,
    lat: String,
    lon: String,
}

impl From<&Configuration> for SettingsFile {
    fn from(config: &Configuration) -> Self {
        let home = &config.home;
        Self {
            settings: SettingsSection {
                token: config.settings.token.clone(),
                units: config.settings.units,
            },
            home: HomeSection {
                name: home.name.clone(),
                state: home.state.clone(),
                country: home.country.clone(),
                lat: home.lat.to_string(),
                lon: home.lon.to_string(),
            },
        }
    }
}

impl SettingsFile {
    fn into_configuration(self, path: &Path) -> Result<Configuration, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let home = self.home;
        let lat: f64 = home
            .lat
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("invalid latitude `{}`", home.lat)))?;
        let lon: f64 = home
            .lon
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("invalid longitude `{}`", home.lon)))?;

        let location = Geolocation::new(home.name, home.country, home.state, lat, lon);
        if !location.has_valid_coordinates() {
            return Err(parse_error(format!(
                "home coordinates ({lat}, {lon}) are out of range"
            )));
        }

        Ok(Configuration::new(
            self.settings.token,
            self.settings.units,
            location,
        ))
    }
}

/// TOML-file-based implementation of `ConfigStore`.
///
/// Stored in:
///   `<home>/.wthr/wthr.toml` unless another directory is given
pub struct TomlFileConfigStore {
    path: PathBuf,
}

impl TomlFileConfigStore {
    pub fn new(context: &ConfigContext) -> Self {
        Self {
            path: context.path(),
        }
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn save_file(&self, config: &Configuration) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let data = toml::to_string_pretty(&SettingsFile::from(config))
            .map_err(|err| ConfigError::Serialize(err.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, data).map_err(|source| ConfigError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;

        Ok(())
    }
}

impl ConfigStore for TomlFileConfigStore {
    fn read(&self) -> Result<Configuration, ConfigError> {
        debug!("Reading settings from {}", self.path.display());
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()));
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let file: SettingsFile = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })?;

        file.into_configuration(&self.path)
    }

    fn create(
        &mut self,
        token: Token,
        units: Units,
        home: Geolocation,
    ) -> Result<Configuration, ConfigError> {
        let config = Configuration::new(token, units, home);
        self.save_file(&config)?;
        info!("Settings saved to {}", self.path.display());

        Ok(config)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
