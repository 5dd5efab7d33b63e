use std::{fmt, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Text};
use weatherapp_core::{
    Config, ControllerSettings, FilePreferenceStore, PlatformLocationProvider,
    StaticLocationSource, UiState, WeatherController, WeatherService,
    provider::provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version, about = "Current weather by city or location")]
pub struct Cli {
    /// Without a subcommand, show the last searched city and then the current
    /// location, if location access is allowed.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, fallback city and location settings.
    Configure,

    /// Show weather for a city and remember it.
    Search {
        /// City name, e.g. "Dallas".
        city: String,
    },

    /// Show weather at the current location, or at the fallback city when no
    /// fix is available.
    Locate,

    /// Show weather for the last searched city.
    Last,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        let Some(command) = self.command else {
            return launch(&config).await;
        };

        match command {
            Command::Configure => {
                configure(&mut config)?;
                config.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
            Command::Search { city } => {
                let controller = build_controller(&config)?;
                controller.search(&city).await;
                show(&controller.state(), &config.img_base);
            }
            Command::Locate => {
                let controller = build_controller(&config)?;
                controller.use_current_location().await;
                show(&controller.state(), &config.img_base);
            }
            Command::Last => {
                let controller = build_controller(&config)?;
                controller.load_last_searched().await;

                let state = controller.state();
                if state == UiState::default() {
                    println!("No city searched yet. Try `weatherapp search <city>`.");
                } else {
                    show(&state, &config.img_base);
                }
            }
        }

        Ok(())
    }
}

/// Startup flow: repeat the last search, then look up the device location
/// once location access is allowed.
async fn launch(config: &Config) -> anyhow::Result<()> {
    let controller = build_controller(config)?;

    controller.load_last_searched().await;
    let last = controller.state();
    if last != UiState::default() {
        show(&last, &config.img_base);
    }

    if !config.location.permissions().any_granted() {
        if last == UiState::default() {
            println!("No city searched yet. Try `weatherapp search <city>`.");
        }
        return Ok(());
    }

    controller.use_current_location().await;
    show(&controller.state(), &config.img_base);

    Ok(())
}

fn build_controller(config: &Config) -> anyhow::Result<WeatherController> {
    let api_key = config.resolve_api_key()?;
    let store = FilePreferenceStore::open_default().context("Failed to open preference store")?;
    let location = PlatformLocationProvider::new(
        config.location.permissions(),
        StaticLocationSource::new(config.location.fix()),
    );

    let service = WeatherService::new(provider_from_config(config), Arc::new(store), Arc::new(location));

    Ok(WeatherController::new(
        Arc::new(service),
        ControllerSettings {
            api_key,
            fallback_city: config.fallback_city.clone(),
        },
    ))
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    config.fallback_city = Text::new("Fallback city:")
        .with_default(&config.fallback_city)
        .prompt()
        .context("Failed to read fallback city")?;

    let allow = Confirm::new("Allow location access?")
        .with_default(config.location.fine || config.location.coarse)
        .prompt()
        .context("Failed to read location permission")?;
    config.location.fine = allow;
    config.location.coarse = allow;

    if allow {
        config.location.latitude = CustomType::<f64>::new("Latitude (Esc to skip):")
            .prompt_skippable()
            .context("Failed to read latitude")?;
        config.location.longitude = CustomType::<f64>::new("Longitude (Esc to skip):")
            .prompt_skippable()
            .context("Failed to read longitude")?;
    }

    Ok(())
}

fn show(state: &UiState, img_base: &str) {
    if let Some(Err(err)) = &state.last_outcome {
        tracing::info!(error = %err, "lookup failed");
    }
    print!("{}", Rendered::new(state, img_base));
}

/// Human-readable rendering of the controller state.
struct Rendered<'a> {
    state: &'a UiState,
    img_base: &'a str,
}

impl<'a> Rendered<'a> {
    fn new(state: &'a UiState, img_base: &'a str) -> Self {
        Self { state, img_base }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state.last_outcome {
            Some(Ok(weather)) => {
                writeln!(f, "City: {}", weather.location_name)?;
                writeln!(f, "Temperature: {} °C", weather.temperature_c)?;
                writeln!(f, "Humidity: {}%", weather.humidity_pct)?;
                writeln!(f, "Description: {}", weather.description)?;
                writeln!(f, "Icon: {}", weather.icon_url(self.img_base))?;
            }
            Some(Err(_)) => {
                if let Some(message) = self.state.failure_message() {
                    writeln!(f, "{message}")?;
                }
            }
            None => {}
        }

        if let Some(message) = &self.state.error_message {
            writeln!(f, "{message}")?;
        }

        Ok(())
    }
}
