use crate::prompter::Prompter;
use crate::resolver::disambiguate;
use anyhow::{Context, Result};
use tracing::debug;
use wthr_core::apis::{Geocoder, Lookup};
use wthr_core::credentials::Token;
use wthr_core::geolocation::{Geolocation, coordinates_valid, parse_coordinate_pair};

const NAME_HELP: &str = "Valid example formats are: London | London, GB | London, Kentucky, US";

/// Ways of entering a location by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    ByName,
    ByCoordinates,
}

impl Strategy {
    const ALL: [Strategy; 2] = [Strategy::ByName, Strategy::ByCoordinates];

    fn label(&self) -> &'static str {
        match self {
            Strategy::ByName => "city name",
            Strategy::ByCoordinates => "latitude, longitude",
        }
    }
}

/// Interactive acquisition of the home location.
///
/// Tries the IP based guess first. Once the user turns it down, they choose
/// between typing a place name and typing coordinates. Each way keeps asking
/// until a location is accepted. Network failures end the flow.
pub struct LocationAcquisitionFlow<'a, P, G>
where
    P: Prompter + ?Sized,
    G: Geocoder + ?Sized,
{
    prompter: &'a mut P,
    geocoder: &'a G,
    token: &'a Token,
}

impl<'a, P, G> LocationAcquisitionFlow<'a, P, G>
where
    P: Prompter + ?Sized,
    G: Geocoder + ?Sized,
{
    pub fn new(prompter: &'a mut P, geocoder: &'a G, token: &'a Token) -> Self {
        Self {
            prompter,
            geocoder,
            token,
        }
    }

    pub fn run(&mut self) -> Result<Geolocation> {
        if let Some(location) = self.auto_detect()? {
            return Ok(location);
        }

        let labels: Vec<String> = Strategy::ALL.iter().map(|s| s.label().to_string()).collect();
        let index = self
            .prompter
            .select("Please choose preferred way of setting your location:", &labels, 0)?;
        let strategy = Strategy::ALL
            .get(index)
            .copied()
            .with_context(|| format!("no location strategy at index {index}"))?;
        debug!("Chosen strategy: {strategy:?}");

        match strategy {
            Strategy::ByName => self.by_name(),
            Strategy::ByCoordinates => self.by_coordinates(),
        }
    }

    /// Offer the location derived from the public IP address, once.
    fn auto_detect(&mut self) -> Result<Option<Geolocation>> {
        let Some(ip) = self.geocoder.detect_public_ip()? else {
            println!("Your location couldn't be determined automatically.");
            return Ok(None);
        };

        let Some(location) = self.geocoder.locate_ip(&ip, self.token)? else {
            println!("Your location couldn't be determined automatically.");
            return Ok(None);
        };

        let keep = self.prompter.confirm(
            &format!(
                "Based on your IP address ({ip}), your default location has been set to {location}. \
                 Do you want to keep this setting?"
            ),
            true,
        )?;
        debug!("Keep IP based location: {keep}");

        Ok(keep.then_some(location))
    }

    fn by_name(&mut self) -> Result<Geolocation> {
        loop {
            let query = self
                .prompter
                .text("Please provide a name of a location:", Some(NAME_HELP))?;
            let query = query.trim();
            if query.is_empty() {
                println!("No location name provided. Please try again.");
                continue;
            }

            let Lookup::Found(candidates) = self.geocoder.resolve_by_name(query, self.token)? else {
                println!("Provided name couldn't be geocoded. Please try again.");
                continue;
            };

            if let Some(location) =
                disambiguate(&mut *self.prompter, &candidates, "provide a different name")?
            {
                return Ok(location);
            }
        }
    }

    fn by_coordinates(&mut self) -> Result<Geolocation> {
        loop {
            let input = self.prompter.text(
                "Please input geographic coordinates (lat, lon) separated by a comma:",
                Some("example: 27.51434,83.099336"),
            )?;

            let Some((lat, lon)) = parse_coordinate_pair(&input) else {
                println!(
                    "Incorrect value typed. The correct format is latitude,longitude \
                     using '.' as decimal separator."
                );
                continue;
            };

            if !coordinates_valid(lat, lon) {
                println!(
                    "Incorrect coordinates. Latitude must be in range [-90, 90] \
                     and longitude in [-180, 180]."
                );
                continue;
            }

            let Lookup::Found(candidates) =
                self.geocoder.resolve_by_coordinates(lat, lon, self.token)?
            else {
                println!("No location available for given coordinates. Please try again.");
                continue;
            };

            if let Some(location) =
                disambiguate(&mut *self.prompter, &candidates, "provide different coordinates")?
            {
                return Ok(location);
            }
        }
    }
}
