use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use wthr_core::units::Units;
use wthr_core::weather_service::Overrides;

/// Top-level CLI for the `wthr` command.
///
/// Examples:
///   wthr
///   wthr current --lat 51.5074 --lon -0.1278
///   wthr forecast --units imperial
///   wthr config
///   wthr config --show
#[derive(Debug, Parser)]
#[command(
    name = "wthr",
    version,
    about = "Weather forecast in your command line",
    long_about = "Shows the weather at your home location, set up on first run. \
                  Location and units can be overridden for a single call."
)]
pub struct Cli {
    /// Directory holding the settings file. Defaults to `~/.wthr`.
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Command to run. Defaults to `current`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather conditions.
    Current(WeatherArgs),

    /// Show a 5 day forecast in 3 hour steps.
    Forecast(WeatherArgs),

    /// Create the settings file, replacing any existing one.
    Config {
        /// Print the current settings instead of recreating them.
        #[arg(long)]
        show: bool,
    },
}

/// Per-call overrides of the stored settings.
#[derive(Debug, Default, Clone, Args)]
pub struct WeatherArgs {
    /// Latitude, in [-90, 90].
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude, in [-180, 180].
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Units for this call only.
    #[arg(long, value_enum)]
    pub units: Option<UnitsCli>,
}

impl From<WeatherArgs> for Overrides {
    fn from(args: WeatherArgs) -> Self {
        Overrides {
            lat: args.lat,
            lon: args.lon,
            units: args.units.map(Into::into),
        }
    }
}

/// Supported units of measurement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum UnitsCli {
    /// °C, km/h
    #[value(name = "metric")]
    Metric,

    /// °F, mph
    #[value(name = "imperial")]
    Imperial,

    /// K, m/s
    #[value(name = "standard")]
    Standard,
}

impl From<UnitsCli> for Units {
    fn from(units: UnitsCli) -> Self {
        match units {
            UnitsCli::Metric => Self::Metric,
            UnitsCli::Imperial => Self::Imperial,
            UnitsCli::Standard => Self::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_current() {
        let cli = Cli::try_parse_from(["wthr"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_negative_coordinates_and_units() {
        let cli = Cli::try_parse_from([
            "wthr", "forecast", "--lat", "-33.87", "--lon", "-151.21", "--units", "imperial",
        ])
        .unwrap();

        let Some(Command::Forecast(args)) = cli.command else {
            panic!("expected forecast command");
        };
        let overrides = Overrides::from(args);
        assert_eq!(overrides.lat, Some(-33.87));
        assert_eq!(overrides.lon, Some(-151.21));
        assert_eq!(overrides.units, Some(Units::Imperial));
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["wthr", "current", "--lat", "10"]).is_err());
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["wthr", "--config-dir", "/tmp/x", "config", "--show"]).unwrap();

        assert!(matches!(cli.command, Some(Command::Config { show: true })));
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/x")));
    }
}
