//! Named lists the API exposes, mapped to their endpoint paths.

use std::fmt;
use std::str::FromStr;

/// What a trending list contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingScope {
    #[default]
    All,
    Movie,
    Tv,
}

impl TrendingScope {
    pub fn as_path(&self) -> &'static str {
        match self {
            TrendingScope::All => "all",
            TrendingScope::Movie => "movie",
            TrendingScope::Tv => "tv",
        }
    }
}

impl FromStr for TrendingScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TrendingScope::All),
            "movie" | "movies" => Ok(TrendingScope::Movie),
            "tv" | "shows" => Ok(TrendingScope::Tv),
            _ => anyhow::bail!("Unknown trending scope: {}. Expected all, movie or tv.", s),
        }
    }
}

/// Trending window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_path(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl FromStr for TimeWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            _ => anyhow::bail!("Unknown time window: {}. Expected day or week.", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieCategory {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl MovieCategory {
    pub fn as_path(&self) -> &'static str {
        match self {
            MovieCategory::NowPlaying => "now_playing",
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::Upcoming => "upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovieCategory::NowPlaying => "Now Playing",
            MovieCategory::Popular => "Popular Movies",
            MovieCategory::TopRated => "Top Rated Movies",
            MovieCategory::Upcoming => "Upcoming",
        }
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MovieCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "now_playing" => Ok(MovieCategory::NowPlaying),
            "popular" => Ok(MovieCategory::Popular),
            "top_rated" => Ok(MovieCategory::TopRated),
            "upcoming" => Ok(MovieCategory::Upcoming),
            _ => anyhow::bail!(
                "Unknown movie list: {}. Expected now-playing, popular, top-rated or upcoming.",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvCategory {
    AiringToday,
    OnTheAir,
    Popular,
    TopRated,
}

impl TvCategory {
    pub fn as_path(&self) -> &'static str {
        match self {
            TvCategory::AiringToday => "airing_today",
            TvCategory::OnTheAir => "on_the_air",
            TvCategory::Popular => "popular",
            TvCategory::TopRated => "top_rated",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TvCategory::AiringToday => "Airing Today",
            TvCategory::OnTheAir => "On The Air",
            TvCategory::Popular => "Popular TV Shows",
            TvCategory::TopRated => "Top Rated TV Shows",
        }
    }
}

impl fmt::Display for TvCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TvCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "airing_today" => Ok(TvCategory::AiringToday),
            "on_the_air" => Ok(TvCategory::OnTheAir),
            "popular" => Ok(TvCategory::Popular),
            "top_rated" => Ok(TvCategory::TopRated),
            _ => anyhow::bail!(
                "Unknown TV list: {}. Expected airing-today, on-the-air, popular or top-rated.",
                s
            ),
        }
    }
}

/// Which search endpoint to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Multi,
    Movie,
    Tv,
}

impl SearchMode {
    pub fn as_path(&self) -> &'static str {
        match self {
            SearchMode::Multi => "multi",
            SearchMode::Movie => "movie",
            SearchMode::Tv => "tv",
        }
    }
}

impl FromStr for SearchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multi" | "all" => Ok(SearchMode::Multi),
            "movie" | "movies" => Ok(SearchMode::Movie),
            "tv" | "shows" => Ok(SearchMode::Tv),
            _ => anyhow::bail!("Unknown search mode: {}. Expected multi, movie or tv.", s),
        }
    }
}
