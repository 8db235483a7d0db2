mod report;
mod startup;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vendmap_map::{Coordinate, SearchField};

#[derive(Debug, Parser)]
#[command(name = "vendmap")]
#[command(about = "Vending location map engine, driven headless from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load both datasets and print what was admitted
    Summary,
    /// Print the location directory sorted by city, then name
    Directory,
    /// Filter locations and show the resulting map state
    Search {
        /// Fields to match against
        #[arg(long, value_enum, default_value_t = SearchBy::Location)]
        by: SearchBy,
        /// Search term; empty resets the map
        #[arg(default_value = "")]
        term: String,
    },
    /// Center the map on a position as if the device reported it
    Locate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SearchBy {
    /// City or zip code
    Location,
    Name,
}

impl From<SearchBy> for SearchField {
    fn from(value: SearchBy) -> Self {
        match value {
            SearchBy::Location => SearchField::Location,
            SearchBy::Name => SearchField::Name,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vendmap_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("vendmap ready; run `vendmap --help` for commands");
        return Ok(());
    };

    let map_config = startup::resolve_map_config(&config)?;
    let mut session = startup::start_session(&config, &map_config).await?;

    match command {
        Commands::Summary => report::print_summary(&session),
        Commands::Directory => report::print_directory(&session),
        Commands::Search { by, term } => {
            let query = vendmap_map::SearchQuery::new(&term, by.into());
            let matches = session.search(&query);
            session.pump_events();
            report::print_search(&session, &query, &matches);
        }
        Commands::Locate { lat, lon } => {
            let result = Coordinate::new(lat, lon).ok_or_else(|| {
                vendmap_map::GeolocationError::Unavailable("non-finite coordinate".to_string())
            });
            session.show_current_location(result);
            session.pump_events();
            report::print_locate(&session);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
