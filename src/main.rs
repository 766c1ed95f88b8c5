use anyhow::Result;
use clap::Parser;
use cinedex::{
    application::TOP_SEARCHES_LIMIT,
    commands::{self, Config, Settings},
    http::{Cancelled, DEFAULT_MAX_RETRIES},
    runtime::RealRuntime,
    tmdb::{MediaKind, MovieCategory, SearchMode, TimeWindow, TrendingScope, TvCategory},
};

/// cinedex - browse movies and TV shows from the terminal
///
/// Lists trending and popular titles, discovers titles by genre, searches,
/// and shows details, trailers, seasons and episodes.
///
/// Requires an API read access token in the TMDB_API_TOKEN environment
/// variable. Searches are counted when APPWRITE_ENDPOINT,
/// APPWRITE_PROJECT_ID, APPWRITE_DATABASE_ID and APPWRITE_COLLECTION_ID are
/// set (APPWRITE_API_KEY is optional).
///
/// Examples:
///   cinedex home                  # Featured lists
///   cinedex movies top-rated      # Top rated movies
///   cinedex search "blade runner" # Search movies and shows
#[derive(Parser, Debug)]
#[command(author, version = env!("CINEDEX_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (defaults to https://api.themoviedb.org/3)
    #[arg(long = "api-url", env = "CINEDEX_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Image CDN base URL (defaults to https://image.tmdb.org/t/p)
    #[arg(
        long = "image-url",
        env = "CINEDEX_IMAGE_URL",
        value_name = "URL",
        global = true
    )]
    pub image_url: Option<String>,

    /// How many times a failed request is retried
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRIES, global = true)]
    pub retries: usize,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Show trending, popular and top rated lists
    Home,

    /// Show trending titles
    Trending(TrendingArgs),

    /// Show a movie list (now-playing, popular, top-rated, upcoming)
    Movies(MoviesArgs),

    /// Show a TV list (airing-today, on-the-air, popular, top-rated)
    Tv(TvArgs),

    /// List genres for movies or TV
    Genres(GenresArgs),

    /// Show titles of one genre
    Discover(DiscoverArgs),

    /// Search movies and TV shows
    Search(SearchArgs),

    /// Show details of a movie
    Movie(IdArgs),

    /// Show details of a TV show
    Show(IdArgs),

    /// Show the episodes of a season
    Season(SeasonArgs),

    /// Show the most searched queries
    TopSearches(TopSearchesArgs),
}

#[derive(clap::Args, Debug)]
pub struct TrendingArgs {
    /// What to include: all, movie or tv
    #[arg(long, value_name = "KIND", default_value = "all")]
    pub kind: TrendingScope,

    /// Trending window: day or week
    #[arg(long, value_name = "WINDOW", default_value = "day")]
    pub window: TimeWindow,

    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(clap::Args, Debug)]
pub struct MoviesArgs {
    #[arg(value_name = "CATEGORY")]
    pub category: MovieCategory,

    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(clap::Args, Debug)]
pub struct TvArgs {
    #[arg(value_name = "CATEGORY")]
    pub category: TvCategory,

    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(clap::Args, Debug)]
pub struct GenresArgs {
    /// movie or tv
    #[arg(value_name = "KIND")]
    pub kind: MediaKind,
}

#[derive(clap::Args, Debug)]
pub struct DiscoverArgs {
    /// movie or tv
    #[arg(value_name = "KIND")]
    pub kind: MediaKind,

    /// Genre ID, see `cinedex genres`
    #[arg(long, value_name = "ID")]
    pub genre: u64,

    /// How many pages to load
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// multi, movie or tv
    #[arg(long, value_name = "MODE", default_value = "multi")]
    pub mode: SearchMode,

    /// How many pages to load
    #[arg(long, value_name = "N", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    #[arg(value_name = "ID")]
    pub id: u64,
}

#[derive(clap::Args, Debug)]
pub struct SeasonArgs {
    #[arg(value_name = "TV_ID")]
    pub tv_id: u64,

    #[arg(value_name = "SEASON")]
    pub season: u32,
}

#[derive(clap::Args, Debug)]
pub struct TopSearchesArgs {
    /// How many queries to show
    #[arg(long, value_name = "N", default_value_t = TOP_SEARCHES_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let settings = Settings {
        api_url: cli.api_url,
        image_url: cli.image_url,
        retries: cli.retries,
    };
    let config = Config::new(&runtime, &settings)?;

    let (cancel, ctrl_c_handler) = commands::cancel_on_ctrl_c();
    let cancel = &cancel;

    let result = match cli.command {
        Commands::Home => commands::home(&config, cancel).await,
        Commands::Trending(args) => {
            commands::trending(&config, args.kind, args.window, args.page, cancel).await
        }
        Commands::Movies(args) => commands::movies(&config, args.category, args.page, cancel).await,
        Commands::Tv(args) => commands::tv(&config, args.category, args.page, cancel).await,
        Commands::Genres(args) => commands::genres(&config, args.kind, cancel).await,
        Commands::Discover(args) => {
            let pages = args.pages as usize;
            commands::discover(&config, args.kind, args.genre, pages, cancel).await
        }
        Commands::Search(args) => {
            let pages = args.pages as usize;
            commands::search(&config, &args.query, args.mode, pages, cancel).await
        }
        Commands::Movie(args) => commands::movie(&config, args.id, cancel).await,
        Commands::Show(args) => commands::show(&config, args.id, cancel).await,
        Commands::Season(args) => commands::season(&config, args.tv_id, args.season, cancel).await,
        Commands::TopSearches(args) => commands::top_searches(&config, args.limit, cancel).await,
    };

    ctrl_c_handler.abort();

    match result {
        Err(e) if e.downcast_ref::<Cancelled>().is_some() => {
            std::process::exit(commands::INTERRUPTED_EXIT_CODE)
        }
        other => other,
    }
}
