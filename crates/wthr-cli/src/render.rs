use chrono::{DateTime, Local, Utc};
use std::fmt::Write;
use std::path::Path;
use wthr_core::config::Configuration;
use wthr_core::units::Units;
use wthr_core::weather::{CurrentWeather, Forecast, Weather, WindDirection};

pub fn render_configuration(config: &Configuration, path: &Path) -> String {
    let home = &config.home;
    let mut out = String::new();

    let _ = writeln!(out, "Settings file: {}", path.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "[SETTINGS]");
    let _ = writeln!(out, "token = {}", config.settings.token.masked());
    let _ = writeln!(out, "units = {}", config.settings.units);
    let _ = writeln!(out);
    let _ = writeln!(out, "[HOME]");
    let _ = writeln!(out, "name = {}", home.name);
    let _ = writeln!(out, "state/region = {}", home.state);
    let _ = writeln!(out, "country = {}", home.country);
    let _ = writeln!(out, "lat = {}", home.lat);
    let _ = write!(out, "lon = {}", home.lon);

    out
}

pub fn render_current(current: &CurrentWeather, units: Units) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Current weather");
    let _ = writeln!(out, "Location: {}", current.location);
    let times: Vec<String> = [
        current
            .time
            .map(|t| format!("Time: {}", local(t).format("%b %d, %Y %H:%M"))),
        current
            .sunrise
            .map(|t| format!("Sunrise {}", local(t).format("%H:%M"))),
        current
            .sunset
            .map(|t| format!("Sunset {}", local(t).format("%H:%M"))),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !times.is_empty() {
        let _ = writeln!(out, "{}", times.join("   "));
    }
    let _ = writeln!(out, "{}", describe(&current.weather));
    let _ = writeln!(
        out,
        "Temperature: {}, feels like {}",
        temperature(current.weather.temp, units),
        temperature(current.weather.temp_feel, units),
    );
    let _ = writeln!(out, "Wind: {}", wind(&current.weather, units));
    let _ = write!(
        out,
        "Pressure: {} hPa, humidity {}%",
        current.weather.pressure, current.weather.humidity
    );
    if let Some(rain) = current.weather.rain {
        let _ = write!(out, "\nRain: {rain} mm last hour");
    }
    if let Some(snow) = current.weather.snow {
        let _ = write!(out, "\nSnow: {snow} mm last hour");
    }

    out
}

/// One line per entry, with a header whenever the local date changes.
pub fn render_forecast(forecast: &Forecast, units: Units) -> String {
    let mut out = String::new();
    let _ = write!(out, "Forecast for {}", forecast.location);

    let mut current_day = None;
    for (time, weather) in &forecast.entries {
        let time = local(*time);
        let day = time.date_naive();
        if current_day != Some(day) {
            current_day = Some(day);
            let _ = write!(out, "\n\n{}", time.format("%a, %b %d"));
        }

        let _ = write!(
            out,
            "\n  {}  {:>8}  {:<14}  {}",
            time.format("%H:%M"),
            temperature(weather.temp, units),
            wind(weather, units),
            describe(weather),
        );
        if let Some(rain) = weather.rain {
            let _ = write!(out, ", rain {rain} mm");
        }
        if let Some(snow) = weather.snow {
            let _ = write!(out, ", snow {snow} mm");
        }
    }

    out
}

fn local(time: DateTime<Utc>) -> DateTime<Local> {
    time.with_timezone(&Local)
}

fn temperature(value: f64, units: Units) -> String {
    format!("{value:+.1}{}", units.temperature_symbol())
}

fn wind(weather: &Weather, units: Units) -> String {
    let speed = units.display_wind_speed(weather.wind_speed) as i64;
    match weather.wind_deg.and_then(WindDirection::from_degrees) {
        Some(direction) => format!("{speed} {} {direction}", units.wind_speed_symbol()),
        None => format!("{speed} {}", units.wind_speed_symbol()),
    }
}

fn describe(weather: &Weather) -> String {
    weather
        .descriptions
        .iter()
        .map(|d| capitalize(d))
        .collect::<Vec<_>>()
        .join(", ")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
