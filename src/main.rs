use cinescope::{
    BACKDROP_SIZE, Catalog, CineScopeError, Config, DiscoverFilters, EmbedServer,
    EpisodePosition, FileStore, HomeRows, KeyValueStore, LastWatched, ListingContext,
    ListingFeed, MediaDetails, MediaItem, MediaKind, POSTER_SIZE, PROFILE_SIZE, PlayerUrls,
    SortKey, Watchlist, image_url, parse_optional, parse_year,
};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use std::io;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cinescope", about = "Browse movies and tv shows from the terminal")]
struct Cli {
    /// TMDB API key, overrides CINESCOPE_TMDB_API_KEY / TMDB_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Directory for history, watchlist and last-watched data
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show trending, popular and upcoming titles
    Home,
    /// Search titles by name
    Search {
        query: String,
        #[arg(long, default_value = "movie")]
        kind: MediaKind,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Browse titles by genre, year, origin country and sort order
    Discover {
        #[arg(default_value = "movie")]
        kind: MediaKind,
        /// Genre id, or "all"
        #[arg(long, default_value = "all")]
        genre: String,
        /// Release year, or "all"
        #[arg(long, default_value = "all")]
        year: String,
        #[arg(long, default_value = "popularity")]
        sort: SortKey,
        /// Origin country code, or "all"
        #[arg(long, default_value = "all")]
        region: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show the detail page of a title
    Details { kind: MediaKind, id: u64 },
    /// List the episodes of a season
    Season { series_id: u64, season: u32 },
    /// Show a person and their credits
    Person { id: u64 },
    /// List genres and origin countries available as filters
    Genres {
        #[arg(default_value = "movie")]
        kind: MediaKind,
    },
    /// Recently viewed titles
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Titles saved for later
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },
    /// Print the embed player URL of a title
    Play {
        kind: MediaKind,
        id: u64,
        #[arg(long, default_value = "vidsrc")]
        server: EmbedServer,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        episode: Option<u32>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum WatchlistAction {
    List,
    Add { kind: MediaKind, id: u64 },
    Remove { id: u64 },
    Toggle { kind: MediaKind, id: u64 },
}

/// Prints one listing line
fn print_item(index: usize, item: &MediaItem) {
    let quality = item
        .quality
        .as_deref()
        .map(|q| format!(" [{}]", q))
        .unwrap_or_default();
    let rating = item
        .rating
        .map(|r| format!(" ★ {:.1}", r))
        .unwrap_or_default();
    println!(
        "{:>3}. {} ({}) {} #{}{}{}",
        index + 1,
        item.title,
        item.year().unwrap_or("----"),
        item.kind,
        item.id,
        rating,
        quality
    );
}

fn print_row(heading: &str, items: &[MediaItem]) {
    println!("\n=== {} ===", heading);
    if items.is_empty() {
        println!("Nothing to show.");
    }
    for (index, item) in items.iter().enumerate() {
        print_item(index, item);
    }
}

fn print_home(rows: &HomeRows) {
    print_row("Trending This Week", &rows.trending);
    print_row("Popular Movies", &rows.popular_movies);
    print_row("Popular TV Shows", &rows.popular_tv);
    print_row("Upcoming Movies", &rows.upcoming_movies);
}

fn print_details(config: &Config, details: &MediaDetails) {
    let item = &details.item;
    println!("\n=== {} ===", item.title);
    println!("  Kind: {}  Id: {}", item.kind, item.id);
    if let Some(date) = &item.release_date {
        println!("  Released: {}", date);
    }
    if let Some(rating) = item.rating {
        println!("  Rating: {:.1}", rating);
    }
    if let Some(runtime) = details.runtime {
        println!("  Runtime: {} min", runtime);
    }
    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        println!("  Genres: {}", names.join(", "));
    }
    if let Some(poster) = &item.poster_path {
        println!("  Poster: {}", image_url(&config.image_base_url, POSTER_SIZE, poster));
    }
    if let Some(backdrop) = &item.backdrop_path {
        println!(
            "  Backdrop: {}",
            image_url(&config.image_base_url, BACKDROP_SIZE, backdrop)
        );
    }
    if let Some(overview) = &item.overview {
        println!("\n{}", overview);
    }

    if !details.cast.is_empty() {
        println!("\nCast:");
        for member in details.cast.iter().take(10) {
            println!("  {} as {} (#{})", member.name, member.character, member.person_id);
            if let Some(profile) = &member.profile_path {
                println!(
                    "    {}",
                    image_url(&config.image_base_url, PROFILE_SIZE, profile)
                );
            }
        }
    }

    if !details.seasons.is_empty() {
        println!("\nSeasons:");
        for season in &details.seasons {
            println!(
                "  {:>2}. {} ({} episodes)",
                season.number, season.name, season.episode_count
            );
        }
    }

    for trailer in details.trailers() {
        println!("\nTrailer: https://www.youtube.com/watch?v={}", trailer.key);
    }

    if let Some(providers) = details.watch_providers.as_ref().filter(|p| !p.is_empty()) {
        println!("\nWhere to watch ({}):", providers.region);
        for (label, list) in [
            ("Stream", &providers.flatrate),
            ("Rent", &providers.rent),
            ("Buy", &providers.buy),
        ] {
            if !list.is_empty() {
                let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
                println!("  {}: {}", label, names.join(", "));
            }
        }
    }

    print_row("Recommendations", &details.recommendations);
}

/// Loads `pages` pages of a listing and prints them
async fn print_listing(
    catalog: &Catalog,
    context: ListingContext,
    pages: u32,
) -> Result<(), CineScopeError> {
    let mut feed = ListingFeed::new(catalog.clone());
    feed.open(context).await?;
    for _ in 1..pages {
        if !feed.load_more().await? {
            break;
        }
    }

    let pagination = feed.cursor().pagination();
    print_row(
        &format!("Page {} of {}", pagination.page, pagination.total_pages),
        feed.items(),
    );
    Ok(())
}

/// Fetches the listing view of a single title
async fn fetch_item(
    catalog: &Catalog,
    config: &Config,
    kind: MediaKind,
    id: u64,
) -> Result<MediaItem, CineScopeError> {
    let details = catalog
        .metadata()
        .details(kind, id, &config.watch_region)
        .await?;
    Ok(details.item)
}

async fn run(cli: Cli) -> Result<(), CineScopeError> {
    let mut config = Config::from_env()?;
    if let Some(key) = cli.api_key {
        config.tmdb_api_key = Some(key);
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.resolve_data_dir()?)?);
    let catalog = Catalog::from_config(&config, store.clone())?;
    let watchlist = Watchlist::new(store.clone());
    let last_watched = LastWatched::new(store);

    match cli.command {
        Command::Home => {
            print_home(&catalog.home().await);
        }
        Command::Search { query, kind, pages } => {
            print_listing(&catalog, ListingContext::Search { kind, query }, pages).await?;
        }
        Command::Discover {
            kind,
            genre,
            year,
            sort,
            region,
            pages,
        } => {
            let invalid = |name: &'static str, value: &str| {
                CineScopeError::Configuration(cinescope::ConfigurationError::InvalidValue {
                    name,
                    value: value.to_string(),
                })
            };
            let filters = DiscoverFilters {
                genre: parse_optional(&genre).map_err(|_| invalid("genre", &genre))?,
                year: parse_year(&year).map_err(|_| invalid("year", &year))?,
                sort,
                region: parse_optional::<String>(&region)
                    .map_err(|_| invalid("region", &region))?
                    .map(|r| r.to_ascii_uppercase()),
            };
            print_listing(&catalog, ListingContext::Discover { kind, filters }, pages).await?;
        }
        Command::Details { kind, id } => {
            let details = catalog.details(kind, id).await?;
            print_details(&config, &details);
        }
        Command::Season { series_id, season } => {
            let season = catalog.season(series_id, season).await?;
            println!("\n=== {} ===", season.name);
            if !season.overview.is_empty() {
                println!("{}\n", season.overview);
            }
            for episode in &season.episodes {
                println!(
                    "  E{:02} - {} ({})",
                    episode.number,
                    episode.name,
                    episode.air_date.as_deref().unwrap_or("TBA")
                );
            }
        }
        Command::Person { id } => {
            let page = catalog.person(id).await?;
            println!("\n=== {} ===", page.person.name);
            if let Some(department) = &page.person.known_for_department {
                println!("  Known for: {}", department);
            }
            if let Some(birthday) = &page.person.birthday {
                println!("  Born: {}", birthday);
            }
            if !page.person.biography.is_empty() {
                println!("\n{}", page.person.biography);
            }
            print_row("Credits", &page.credits);
        }
        Command::Genres { kind } => {
            let options = catalog.filter_options(kind).await;
            println!("\n=== Genres ({}) ===", kind);
            for genre in &options.genres {
                println!("  {:>6}  {}", genre.id, genre.name);
            }
            println!("\n=== Countries ===");
            for country in &options.countries {
                println!("  {}  {}", country.code, country.english_name);
            }
        }
        Command::History { action } => match action {
            HistoryAction::List => {
                let entries = catalog.history().entries()?;
                println!("\n=== Recently Viewed ===");
                if entries.is_empty() {
                    println!("No history yet.");
                }
                for (index, entry) in entries.iter().enumerate() {
                    println!(
                        "{:>3}. {} {} #{} (viewed {})",
                        index + 1,
                        entry.title,
                        entry.kind,
                        entry.id,
                        entry.viewed_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
            HistoryAction::Clear { yes } => {
                let confirmed = yes
                    || Confirm::new()
                        .with_prompt("Clear the viewing history?")
                        .default(false)
                        .interact()
                        .map_err(|e| io::Error::other(e.to_string()))?;
                if confirmed {
                    catalog.history().clear()?;
                    println!("History cleared.");
                } else {
                    println!("Aborted; history was not modified.");
                }
            }
        },
        Command::Watchlist { action } => match action {
            WatchlistAction::List => {
                let entries = watchlist.entries()?;
                println!("\n=== Watchlist ===");
                if entries.is_empty() {
                    println!("Your watchlist is empty.");
                }
                for (index, entry) in entries.iter().enumerate() {
                    println!("{:>3}. {} {} #{}", index + 1, entry.title, entry.kind, entry.id);
                }
            }
            WatchlistAction::Add { kind, id } => {
                let item = fetch_item(&catalog, &config, kind, id).await?;
                if watchlist.add(&item)? {
                    println!("Added '{}' to the watchlist.", item.title);
                } else {
                    println!("'{}' is already on the watchlist.", item.title);
                }
            }
            WatchlistAction::Remove { id } => {
                if watchlist.remove(id)? {
                    println!("Removed #{} from the watchlist.", id);
                } else {
                    println!("#{} is not on the watchlist.", id);
                }
            }
            WatchlistAction::Toggle { kind, id } => {
                let item = fetch_item(&catalog, &config, kind, id).await?;
                if watchlist.toggle(&item)? {
                    println!("Added '{}' to the watchlist.", item.title);
                } else {
                    println!("Removed '{}' from the watchlist.", item.title);
                }
            }
        },
        Command::Play {
            kind,
            id,
            server,
            season,
            episode,
        } => {
            let position = match kind {
                MediaKind::Movie => None,
                MediaKind::Tv => {
                    let mut position: EpisodePosition = last_watched.get_or_default(id)?;
                    if let Some(season) = season {
                        position = position.with_season(season);
                    }
                    if let Some(episode) = episode {
                        position = position.with_episode(episode);
                    }
                    last_watched.set(id, position)?;
                    Some(position)
                }
            };

            if let Some(position) = position {
                println!(
                    "Playing S{:02}E{:02} on {}",
                    position.season, position.episode, server
                );
            }
            println!("{}", PlayerUrls::new(&config).embed_url(server, kind, id, position));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinescope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
