use crate::acquisition::LocationAcquisitionFlow;
use crate::prompter::Prompter;
use crate::render::render_configuration;
use anyhow::{Context, Result};
use tracing::{debug, info};
use wthr_core::apis::Geocoder;
use wthr_core::config::{ConfigStore, Configuration};
use wthr_core::credentials::Token;
use wthr_core::error::ConfigError;
use wthr_core::units::Units;

/// `config` command handler, also the guard every other command goes through.
pub struct ConfigureHandler<S, P, G>
where
    S: ConfigStore,
    P: Prompter,
    G: Geocoder,
{
    store: S,
    prompter: P,
    geocoder: G,
}

impl<S, P, G> ConfigureHandler<S, P, G>
where
    S: ConfigStore,
    P: Prompter,
    G: Geocoder,
{
    pub fn new(store: S, prompter: P, geocoder: G) -> Self {
        Self {
            store,
            prompter,
            geocoder,
        }
    }

    /// Walk the user through token, units and home location, then save the
    /// result. Any existing settings are overwritten.
    pub fn run(&mut self) -> Result<Configuration> {
        let token = self.acquire_token()?;
        let units = self.acquire_units()?;
        debug!("Units: {units}");

        let home = LocationAcquisitionFlow::new(&mut self.prompter, &self.geocoder, &token).run()?;
        debug!("Home location: {home}");

        let config = self
            .store
            .create(token, units, home)
            .context("failed to save settings")?;
        info!("Configuration created");

        println!("Settings were saved to {}.", self.store.path().display());

        Ok(config)
    }

    /// Stored settings, created interactively on first use.
    pub fn ensure(&mut self) -> Result<Configuration> {
        match self.store.read() {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(path)) => {
                debug!("No settings at {}", path.display());
                println!("Settings file not found. Creating configuration...");
                self.run()
            }
            Err(err) => Err(err).context("failed to read settings"),
        }
    }

    /// Print stored settings. Offers to create them when there are none.
    pub fn display(&mut self) -> Result<()> {
        let config = match self.store.read() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => {
                let create = self
                    .prompter
                    .confirm("Settings file not found. Do you want to create one?", true)?;
                debug!("Create settings: {create}");

                if !create {
                    return Ok(());
                }
                self.run()?
            }
            Err(err) => return Err(err).context("failed to read settings"),
        };

        println!("{}", render_configuration(&config, self.store.path()));

        Ok(())
    }

    /// Ask until the token is well-formed and accepted by the provider.
    fn acquire_token(&mut self) -> Result<Token> {
        loop {
            let input = self.prompter.text(
                "Please provide an API key:",
                Some("A free API key can be obtained at https://home.openweathermap.org/users/sign_up"),
            )?;

            let Ok(token) = Token::parse(input.trim()) else {
                println!("Incorrect API key format. Please check if it was pasted correctly.");
                continue;
            };

            if !self.geocoder.validate_credential(&token)? {
                println!(
                    "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
                );
                continue;
            }
            debug!("Token accepted: {token:?}");

            return Ok(token);
        }
    }

    fn acquire_units(&mut self) -> Result<Units> {
        let options: Vec<String> = Units::ALL.iter().map(|u| u.to_string()).collect();
        let default = Units::ALL
            .iter()
            .position(|u| *u == Units::default())
            .unwrap_or(0);

        let index = self
            .prompter
            .select("Please choose units:", &options, default)?;

        Units::ALL
            .get(index)
            .copied()
            .with_context(|| format!("no units at index {index}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompter::scripted::{Answer, ScriptedPrompter, text};
    use crate::store::{ConfigContext, TomlFileConfigStore};
    use crate::testing::{CannedGeocoder, TOKEN, london, token};
    use std::path::{Path, PathBuf};
    use wthr_core::geolocation::Geolocation;

    /// In-memory implementation of ConfigStore for tests.
    #[derive(Default)]
    struct InMemoryStore {
        config: Option<Configuration>,
        creates: usize,
    }

    impl ConfigStore for &mut InMemoryStore {
        fn read(&self) -> Result<Configuration, ConfigError> {
            self.config
                .clone()
                .ok_or_else(|| ConfigError::NotFound(PathBuf::from("memory")))
        }

        fn create(
            &mut self,
            token: Token,
            units: Units,
            home: Geolocation,
        ) -> Result<Configuration, ConfigError> {
            let config = Configuration::new(token, units, home);
            self.config = Some(config.clone());
            self.creates += 1;
            Ok(config)
        }

        fn path(&self) -> &Path {
            Path::new("memory")
        }
    }

    fn stored() -> Configuration {
        Configuration::new(
            token(),
            Units::Imperial,
            Geolocation::new("Paris", "FR", "", 48.8566, 2.3522),
        )
    }

    /// Answers that take the wizard through token, units and a London home.
    fn wizard_answers() -> Vec<Answer> {
        vec![
            text(TOKEN),
            Answer::Select(0),
            Answer::Select(0),
            text("London"),
            Answer::Confirm(true),
        ]
    }

    #[test]
    fn ensure_returns_existing_settings_without_prompting() {
        let mut store = InMemoryStore {
            config: Some(stored()),
            ..InMemoryStore::default()
        };
        let mut prompter = ScriptedPrompter::default();

        let config = ConfigureHandler::new(&mut store, &mut prompter, CannedGeocoder::default())
            .ensure()
            .expect("ensure should succeed");

        assert_eq!(config, stored());
        assert!(prompter.asked.is_empty());
        assert_eq!(store.creates, 0);
    }

    #[test]
    fn ensure_runs_wizard_when_settings_are_missing() {
        let mut store = InMemoryStore::default();
        let mut prompter = ScriptedPrompter::new(wizard_answers());
        let geocoder = CannedGeocoder::default()
            .accepting(TOKEN)
            .with_name("London", vec![london()]);

        let config = ConfigureHandler::new(&mut store, &mut prompter, geocoder)
            .ensure()
            .expect("ensure should succeed");

        assert_eq!(config.home.name, "London");
        assert_eq!(config.home.lat, 51.5074);
        assert_eq!(config.home.lon, -0.1278);
        assert_eq!(config.settings.units, Units::Metric);
        assert_eq!(store.config, Some(config));
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn first_run_writes_accepted_location_to_file() {
        let tmpdir = tempfile::tempdir().expect("create temp dir");
        let context = ConfigContext::in_dir(tmpdir.path());
        let mut prompter = ScriptedPrompter::new(wizard_answers());
        let geocoder = CannedGeocoder::default()
            .accepting(TOKEN)
            .with_name("London", vec![london()]);

        let mut handler =
            ConfigureHandler::new(TomlFileConfigStore::new(&context), &mut prompter, geocoder);
        let created = handler.ensure().expect("ensure should create settings");
        let again = handler.ensure().expect("second ensure should read settings");

        assert_eq!(created, again);
        let raw = std::fs::read_to_string(context.path()).unwrap();
        assert!(raw.contains(r#"name = "London""#), "{raw}");
        assert!(raw.contains(r#"lat = "51.5074""#), "{raw}");
        assert!(raw.contains(r#"lon = "-0.1278""#), "{raw}");
    }

    #[test]
    fn token_is_asked_until_well_formed_and_accepted() {
        let rejected = "ffffffffffffffffffffffffffffffff";
        let mut store = InMemoryStore::default();
        let mut answers = vec![text("not-a-key"), text(rejected)];
        answers.extend(wizard_answers());
        let mut prompter = ScriptedPrompter::new(answers);
        let geocoder = CannedGeocoder::default()
            .accepting(TOKEN)
            .with_name("London", vec![london()]);

        let config = ConfigureHandler::new(&mut store, &mut prompter, geocoder)
            .run()
            .expect("wizard should succeed");

        assert_eq!(config.settings.token.as_str(), TOKEN);
        assert_eq!(prompter.times_asked("API key"), 3);
    }

    #[test]
    fn run_overwrites_existing_settings() {
        let mut store = InMemoryStore {
            config: Some(stored()),
            ..InMemoryStore::default()
        };
        let mut prompter = ScriptedPrompter::new(wizard_answers());
        let geocoder = CannedGeocoder::default()
            .accepting(TOKEN)
            .with_name("London", vec![london()]);

        ConfigureHandler::new(&mut store, &mut prompter, geocoder)
            .run()
            .expect("wizard should succeed");

        assert_eq!(store.creates, 1);
        assert_eq!(store.config.unwrap().home, london());
    }

    #[test]
    fn wizard_stores_chosen_units() {
        let mut store = InMemoryStore::default();
        let mut prompter = ScriptedPrompter::new([
            text(TOKEN),
            Answer::Select(2),
            Answer::Select(0),
            text("London"),
            Answer::Confirm(true),
        ]);
        let geocoder = CannedGeocoder::default()
            .accepting(TOKEN)
            .with_name("London", vec![london()]);

        let config = ConfigureHandler::new(&mut store, &mut prompter, geocoder)
            .run()
            .unwrap();

        assert_eq!(config.settings.units, Units::Standard);
    }

    /// Prompter that types a valid key and selects past the offered options.
    struct OutOfRangeSelect;

    impl Prompter for OutOfRangeSelect {
        fn text(&mut self, _message: &str, _help: Option<&str>) -> Result<String> {
            Ok(TOKEN.to_string())
        }

        fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
            Ok(default)
        }

        fn select(&mut self, _message: &str, options: &[String], _default: usize) -> Result<usize> {
            Ok(options.len())
        }

        fn number(&mut self, _message: &str) -> Result<i64> {
            Ok(1)
        }
    }

    #[test]
    fn out_of_range_units_choice_is_an_error() {
        let mut store = InMemoryStore::default();

        let err = ConfigureHandler::new(
            &mut store,
            OutOfRangeSelect,
            CannedGeocoder::default().accepting(TOKEN),
        )
        .run()
        .unwrap_err();

        assert!(err.to_string().contains("no units"), "{err}");
        assert_eq!(store.creates, 0);
    }

    #[test]
    fn display_declined_leaves_store_untouched() {
        let mut store = InMemoryStore::default();
        let mut prompter = ScriptedPrompter::new([Answer::Confirm(false)]);

        ConfigureHandler::new(&mut store, &mut prompter, CannedGeocoder::default())
            .display()
            .expect("display should succeed");

        assert_eq!(store.creates, 0);
        assert!(store.config.is_none());
    }

    #[test]
    fn display_accepted_runs_wizard() {
        let mut store = InMemoryStore::default();
        let mut answers = vec![Answer::Confirm(true)];
        answers.extend(wizard_answers());
        let mut prompter = ScriptedPrompter::new(answers);
        let geocoder = CannedGeocoder::default()
            .accepting(TOKEN)
            .with_name("London", vec![london()]);

        ConfigureHandler::new(&mut store, &mut prompter, geocoder)
            .display()
            .expect("display should succeed");

        assert_eq!(store.creates, 1);
    }

    #[test]
    fn display_existing_settings_does_not_prompt() {
        let mut store = InMemoryStore {
            config: Some(stored()),
            ..InMemoryStore::default()
        };
        let mut prompter = ScriptedPrompter::default();

        ConfigureHandler::new(&mut store, &mut prompter, CannedGeocoder::default())
            .display()
            .expect("display should succeed");

        assert!(prompter.asked.is_empty());
        assert_eq!(store.creates, 0);
    }
}
