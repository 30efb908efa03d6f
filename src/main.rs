use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use weatherpro::api::AppState;
use weatherpro::dashboard::{CycleState, Dashboard, ErrorSurface, Trigger};
use weatherpro::location_resolver::{DeviceLocator, FixedLocation, NoDeviceLocation};
use weatherpro::models::Coordinates;
use weatherpro::view::{DashboardView, SectionView, SuggestionView};
use weatherpro::{
    Aggregator, LocationResolver, SuggestionBox, SuggestionOutcome, WeatherApiClient,
    WeatherProConfig, WeatherProError, WeatherProvider, telemetry, web,
};

#[derive(Parser, Debug)]
#[command(name = "weatherpro", version, about = "Weather dashboard for any location")]
struct Cli {
    /// Configuration file (defaults to <config dir>/weatherpro/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the dashboard for a place, coordinates, or your current location
    Weather {
        /// City name, postcode, or "lat,lon"
        #[arg(short, long, conflicts_with_all = ["lat", "lon"])]
        location: Option<String>,
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up location suggestions
    Search {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// Serve the JSON API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Failure messages go to stderr
struct StderrSurface;

impl ErrorSurface for StderrSurface {
    fn show_error(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let message = e
                .downcast_ref::<WeatherProError>()
                .map_or_else(|| format!("{e:#}"), WeatherProError::user_message);
            tracing::error!("{:#}", e);
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = WeatherProConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    telemetry::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config.web);

    let provider: Arc<dyn WeatherProvider> = Arc::new(WeatherApiClient::new(&config.provider)?);
    let device: Arc<dyn DeviceLocator> = match config.location.device_coordinates()? {
        Some(coordinates) => Arc::new(FixedLocation(coordinates)),
        None => Arc::new(NoDeviceLocation),
    };

    match cli.command {
        Command::Weather {
            location,
            lat,
            lon,
            json,
        } => {
            let trigger = match (location, lat, lon) {
                (Some(text), _, _) => Trigger::Search(text),
                (None, Some(lat), Some(lon)) => Trigger::Coordinates(Coordinates::new(lat, lon)?),
                _ => Trigger::CurrentLocation,
            };
            show_weather(&config, provider, device, trigger, json).await
        }
        Command::Search { text, json } => {
            let suggestions = match SuggestionBox::from_config(provider, &config.search)
                .input(&text)
                .await
            {
                SuggestionOutcome::Ready(suggestions) => suggestions,
                SuggestionOutcome::Failed(e) => {
                    return Err(
                        anyhow::Error::new(e).context("Failed to load location suggestions")
                    );
                }
                SuggestionOutcome::Cleared
                | SuggestionOutcome::Superseded
                | SuggestionOutcome::Stale => Vec::new(),
            };
            let views: Vec<SuggestionView> = suggestions.iter().map(SuggestionView::from).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if views.is_empty() {
                println!("No results found");
            } else {
                for view in &views {
                    println!("{}  ({:.4}, {:.4})", view.label, view.latitude, view.longitude);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve { port } => {
            let state = Arc::new(AppState::new(
                provider,
                device,
                config.forecast.days,
                config.search.min_query_chars,
            ));
            let port = port.unwrap_or(config.web.port);
            info!("Starting WeatherPro API on {}:{}", config.web.bind, port);
            web::run(state, &config.web.bind, port).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn show_weather(
    config: &WeatherProConfig,
    provider: Arc<dyn WeatherProvider>,
    device: Arc<dyn DeviceLocator>,
    trigger: Trigger,
    json: bool,
) -> Result<ExitCode> {
    let mut dashboard = Dashboard::new(
        LocationResolver::new(provider.clone(), device),
        Aggregator::new(provider, config.forecast.days),
        Arc::new(StderrSurface),
    );

    match dashboard.trigger(trigger).await {
        CycleState::Success(weather) => {
            let view = DashboardView::from(&**weather);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_dashboard(&view);
            }
            Ok(ExitCode::SUCCESS)
        }
        CycleState::Idle => {
            eprintln!("Please enter a location to search for.");
            Ok(ExitCode::FAILURE)
        }
        CycleState::Loading | CycleState::Failed(_) => Ok(ExitCode::FAILURE),
    }
}

fn print_dashboard(view: &DashboardView) {
    println!("{}  ({})", view.title, view.coordinates);
    if let Some(local_time) = &view.local_time {
        println!("{local_time}");
    }

    let current = &view.current;
    println!();
    println!(
        "{}  {} (feels like {})",
        current.condition, current.temperature, current.feels_like
    );
    println!(
        "Humidity {}  Wind {}  Pressure {}  Visibility {}  UV {}  Cloud {}",
        current.humidity,
        current.wind,
        current.pressure,
        current.visibility,
        current.uv,
        current.cloud
    );
    if let Some(aq) = &view.air_quality {
        println!(
            "Air quality: {} (EPA {})  PM2.5 {}  PM10 {}  O3 {}  NO2 {}",
            aq.category,
            aq.index.map_or_else(|| "--".to_string(), |i| i.to_string()),
            aq.pm2_5,
            aq.pm10,
            aq.o3,
            aq.no2
        );
    }

    for alert in &view.alerts {
        println!();
        println!("ALERT [{}] {}", alert.severity, alert.headline);
    }

    println!();
    let hourly: Vec<String> = view
        .hourly
        .iter()
        .map(|hour| format!("{} {}", hour.label, hour.temperature))
        .collect();
    println!("Next hours: {}", hourly.join(" | "));

    println!();
    for day in &view.daily {
        println!(
            "{:<10} {:<7} {:>5} / {:<5} {:<24} rain {}  wind {}",
            day.weekday, day.date, day.max, day.min, day.condition, day.chance_of_rain, day.max_wind
        );
    }

    println!();
    match &view.astronomy {
        SectionView::Available(astro) => println!(
            "Sunrise {}  Sunset {}  Moon {} ({})",
            astro.sunrise, astro.sunset, astro.moon_phase, astro.moon_illumination
        ),
        SectionView::Unavailable { message } => println!("{message}"),
    }

    match &view.marine {
        SectionView::Available(days) => {
            for day in days {
                let tides: Vec<String> = day
                    .tides
                    .iter()
                    .map(|tide| format!("{} {} {}", tide.kind, tide.time, tide.height))
                    .collect();
                println!("Marine {}: {}", day.date, tides.join(", "));
            }
        }
        SectionView::Unavailable { message } => println!("{message}"),
    }
}
