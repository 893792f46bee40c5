use crate::cli::Command;
use crate::handlers::configure::ConfigureHandler;
use crate::handlers::weather::{Report, WeatherHandler};
use crate::prompter::InquirePrompter;
use crate::store::{ConfigContext, TomlFileConfigStore};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use wthr_core::apis::{HttpGeocoder, OpenWeatherClient};
use wthr_core::weather_service::WeatherService;

mod acquisition;
mod cli;
mod handlers;
mod prompter;
mod render;
mod resolver;
mod store;
#[cfg(test)]
mod testing;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = cli::Cli::parse();

    let context = match args.config_dir {
        Some(dir) => ConfigContext::in_dir(dir),
        None => ConfigContext::from_home()?,
    };
    let mut configure = ConfigureHandler::new(
        TomlFileConfigStore::new(&context),
        InquirePrompter::new(),
        HttpGeocoder::default(),
    );

    let (report, weather_args) = match args.command {
        Some(Command::Config { show: true }) => return configure.display(),
        Some(Command::Config { show: false }) => return configure.run().map(|_| ()),
        Some(Command::Current(weather_args)) => (Report::Current, weather_args),
        Some(Command::Forecast(weather_args)) => (Report::Forecast, weather_args),
        None => (Report::Current, Default::default()),
    };

    let config = configure.ensure()?;

    let handler = WeatherHandler::new(WeatherService::new(OpenWeatherClient::new()));
    handler.run(&config, report, weather_args.into())
}

/// Initialize global tracing subscriber.
///
/// - Uses `RUST_LOG` if set (e.g. `RUST_LOG=wthr_cli=debug,wthr_core=trace`)
/// - Otherwise only warnings from our crates, to keep prompts readable.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wthr_cli=warn,wthr_core=warn"));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
