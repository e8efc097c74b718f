mod view;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use neighborhood_map_core::config::{
    DEFAULT_LOOKUP_TIMEOUT_MS, DEFAULT_MAX_ARTICLES, DEFAULT_MAX_PLACE_RESULTS,
    DEFAULT_SEARCH_RADIUS_METERS, GOOGLE_GEOCODE_ENDPOINT, GOOGLE_TEXT_SEARCH_ENDPOINT,
    WIKIPEDIA_API_ENDPOINT, WIKIPEDIA_ARTICLE_BASE,
};
use neighborhood_map_core::{
    ArticleProvider, GoogleMapsProvider, HeadlessMap, MapConfig, MapController, MapSurface,
    PlaceProvider, QueryEncoding, WikipediaProvider,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use view::{print_snapshot, TerminalView};

#[derive(Parser)]
#[command(name = "neighborhood-map", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Google Maps web services API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    api_key: String,

    #[command(flatten)]
    settings: Settings,

    /// Print every view update as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args)]
struct Settings {
    /// Place search radius in meters
    #[arg(long, default_value_t = DEFAULT_SEARCH_RADIUS_METERS)]
    radius: u32,

    /// Maximum number of places kept from a search.
    #[arg(long, default_value_t = DEFAULT_MAX_PLACE_RESULTS)]
    max_results: usize,

    /// Maximum number of articles shown for a selected place.
    #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES)]
    max_articles: usize,

    /// Article lookup timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_LOOKUP_TIMEOUT_MS)]
    lookup_timeout_ms: u64,

    /// Keep `&` in article queries and percent-encode it instead of deleting it.
    #[arg(long, default_value_t = false)]
    percent_encode: bool,

    /// Geocoding endpoint
    #[arg(long, default_value = GOOGLE_GEOCODE_ENDPOINT)]
    geocode_url: String,

    /// Places text search endpoint
    #[arg(long, default_value = GOOGLE_TEXT_SEARCH_ENDPOINT)]
    places_url: String,

    /// MediaWiki API endpoint
    #[arg(long, default_value = WIKIPEDIA_API_ENDPOINT)]
    wiki_url: String,

    /// Prefix for article links
    #[arg(long, default_value = WIKIPEDIA_ARTICLE_BASE)]
    wiki_article_url: String,
}

impl Settings {
    fn into_config(self) -> MapConfig {
        MapConfig {
            search_radius_meters: self.radius,
            max_place_results: self.max_results,
            max_articles: self.max_articles,
            lookup_timeout_ms: self.lookup_timeout_ms,
            article_query_encoding: if self.percent_encode {
                QueryEncoding::PercentEncode
            } else {
                QueryEncoding::StripSeparators
            },
            geocode_endpoint: self.geocode_url,
            place_search_endpoint: self.places_url,
            article_endpoint: self.wiki_url,
            article_base_url: self.wiki_article_url,
            ..MapConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an address, search nearby places and optionally read about one.
    Explore {
        /// Address or city to center on.
        #[arg(long)]
        address: String,
        /// Places of interest to search for near the address.
        #[arg(long)]
        refine: String,
        /// Only list places whose name contains this text.
        #[arg(long)]
        filter: Option<String>,
        /// 1-based position in the listed results to look up.
        #[arg(long)]
        select: Option<usize>,
    },
    /// Interactive session reading commands from stdin.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.settings.into_config();
    config.validate()?;

    let places = GoogleMapsProvider::from_config(&cli.api_key, &config);
    let articles = WikipediaProvider::from_config(&config)?;
    let map = HeadlessMap::new(config.initial_view);
    let mut controller = MapController::new(places, articles, map, config);
    let mut view = TerminalView::new(controller.subscribe(), cli.json);

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "neighborhood-map boot"
    );

    match cli.command {
        Command::Explore {
            address,
            refine,
            filter,
            select,
        } => {
            let outcome = controller.submit_address(&address).await;
            view.flush()?;
            outcome?;

            let outcome = controller.submit_refine(&refine).await;
            view.flush()?;
            outcome?;

            if let Some(filter) = filter {
                controller.apply_filter(&filter);
                view.flush()?;
            }

            if let Some(position) = select {
                let id = view
                    .place_at(position)
                    .ok_or_else(|| anyhow::anyhow!("no listed place at position {position}"))?;
                controller.select(id).await?;
                view.flush()?;
            }
        }
        Command::Repl => run_repl(&mut controller, &mut view).await?,
    }

    Ok(())
}

const REPL_HELP: &str = "commands:
  search <address>   geocode an address and center the map on it
  refine <query>     search places of interest near the address
  filter [text]      show only places whose name contains text
  select <n>         look up the n-th listed place
  clear              remove all results
  show               print the current view
  help               print this help
  quit               leave";

async fn run_repl<P, A, M>(
    controller: &mut MapController<P, A, M>,
    view: &mut TerminalView,
) -> anyhow::Result<()>
where
    P: PlaceProvider + Send + Sync,
    A: ArticleProvider + Send + Sync,
    M: MapSurface,
{
    println!("{}", controller.snapshot().page_title);
    println!("{}", controller.snapshot().page_directions);
    println!("{REPL_HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = match line.split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "search" | "address" => {
                let _ = controller.submit_address(argument).await;
            }
            "refine" => {
                let _ = controller.submit_refine(argument).await;
            }
            "filter" => {
                controller.apply_filter(argument);
            }
            "clear" => controller.clear(),
            "select" => {
                let Some(id) = argument
                    .parse::<usize>()
                    .ok()
                    .and_then(|position| view.place_at(position))
                else {
                    eprintln!("error: select needs the number of a listed place");
                    continue;
                };
                if let Err(error) = controller.select(id).await {
                    warn!(error = %error, "selection rejected");
                    eprintln!("error: {error}");
                }
            }
            "show" => {
                print_snapshot(&controller.snapshot());
                continue;
            }
            "help" => {
                println!("{REPL_HELP}");
                continue;
            }
            "quit" | "exit" => break,
            other => {
                eprintln!("error: unknown command `{other}` (try `help`)");
                continue;
            }
        }

        view.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_fall_back_to_library_defaults() {
        let cli = Cli::try_parse_from(["neighborhood-map", "--api-key", "key", "repl"])
            .expect("minimal arguments should parse");
        let config = cli.settings.into_config();
        let defaults = MapConfig::default();

        assert_eq!(config.search_radius_meters, defaults.search_radius_meters);
        assert_eq!(config.max_place_results, defaults.max_place_results);
        assert_eq!(config.max_articles, defaults.max_articles);
        assert_eq!(config.lookup_timeout_ms, defaults.lookup_timeout_ms);
        assert_eq!(config.article_query_encoding, QueryEncoding::StripSeparators);
        assert!(config.validate().is_ok());
    }
}
