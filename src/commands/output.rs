//! Plain-text rendering for command output.

use std::fmt::Write;

use crate::application::{HomeFeed, Listing, MovieDetail, ShowDetail};
use crate::counter::SearchRecord;
use crate::tmdb::{Content, Genre, ImageSize, ImageUrls, SeasonDetails, Video};

/// `  438631  movie  Dune (2021)  7.8`
pub fn content_line(item: &Content) -> String {
    let year = item.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    format!(
        "{:>8}  {:<5}  {}{}  {:.1}",
        item.id(),
        item.kind(),
        item.title(),
        year,
        item.vote_average()
    )
}

pub fn listing(title: &str, listing: &Listing) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    for item in &listing.items {
        let _ = writeln!(out, "{}", content_line(item));
    }
    if let Some(total) = listing.total_results {
        let more = if listing.has_more { ", more available" } else { "" };
        let _ = writeln!(
            out,
            "Showing {} of {} result(s){}",
            listing.items.len(),
            total,
            more
        );
    }
    out
}

pub fn home_feed(feed: &HomeFeed) -> String {
    let mut out = String::new();
    for (i, (label, items)) in feed.sections().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "== {} ==", label);
        if items.is_empty() {
            let _ = writeln!(out, "(nothing here yet)");
        }
        for item in items.iter() {
            let _ = writeln!(out, "{}", content_line(item));
        }
    }
    out
}

/// ` 1. dune  ->  Dune  (9 searches)`
pub fn top_searches(records: &[SearchRecord]) -> String {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let plural = if record.count == 1 { "" } else { "es" };
            format!(
                "{:>2}. {}  ->  {}  ({} search{})\n",
                i + 1,
                record.query,
                record.title,
                record.count,
                plural
            )
        })
        .collect()
}

pub fn genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| format!("{:>6}  {}\n", g.id, g.name))
        .collect()
}

/// `116` becomes `1h 56m`.
pub fn runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

fn year_of(date: Option<&str>) -> Option<&str> {
    date.filter(|d| !d.is_empty()).and_then(|d| d.get(..4))
}

fn genre_names(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn heading(title: &str, date: Option<&str>) -> String {
    match year_of(date) {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    }
}

fn trailer_line(out: &mut String, trailer: Option<&Video>) {
    if let Some(url) = trailer.and_then(Video::watch_url) {
        let _ = writeln!(out, "Trailer: {}", url);
    }
}

fn field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{}: {}", label, value);
    }
}

pub fn movie_detail(detail: &MovieDetail, images: &ImageUrls) -> String {
    let movie = &detail.details;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        heading(&movie.title, movie.release_date.as_deref())
    );
    if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\"{}\"", tagline);
    }
    field(&mut out, "Genres", &genre_names(&movie.genres));
    if let Some(minutes) = movie.runtime.filter(|m| *m > 0) {
        field(&mut out, "Runtime", &runtime(minutes));
    }
    field(
        &mut out,
        "Rating",
        &format!("{:.1} ({} votes)", movie.vote_average, movie.vote_count),
    );
    field(&mut out, "Status", movie.status.as_deref().unwrap_or_default());
    if let Some(url) = images.poster_or_backdrop(
        movie.poster_path.as_deref(),
        movie.backdrop_path.as_deref(),
        ImageSize::W500,
    ) {
        field(&mut out, "Poster", &url);
    }
    trailer_line(&mut out, detail.trailer());
    if !movie.overview.is_empty() {
        let _ = writeln!(out, "\n{}", movie.overview);
    }
    out
}

pub fn show_detail(detail: &ShowDetail, images: &ImageUrls) -> String {
    let show = &detail.details;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}",
        heading(&show.name, show.first_air_date.as_deref())
    );
    if let Some(tagline) = show.tagline.as_deref().filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\"{}\"", tagline);
    }
    field(&mut out, "Genres", &genre_names(&show.genres));
    field(
        &mut out,
        "Seasons",
        &format!(
            "{} ({} episodes)",
            show.number_of_seasons, show.number_of_episodes
        ),
    );
    field(
        &mut out,
        "Rating",
        &format!("{:.1} ({} votes)", show.vote_average, show.vote_count),
    );
    field(&mut out, "Status", show.status.as_deref().unwrap_or_default());
    if let Some(url) = images.poster_or_backdrop(
        show.poster_path.as_deref(),
        show.backdrop_path.as_deref(),
        ImageSize::W500,
    ) {
        field(&mut out, "Poster", &url);
    }
    trailer_line(&mut out, detail.trailer());
    if !show.overview.is_empty() {
        let _ = writeln!(out, "\n{}", show.overview);
    }
    if !show.seasons.is_empty() {
        let _ = writeln!(out);
        for season in &show.seasons {
            let aired = season
                .air_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(|d| format!(", {}", d))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  S{:02}  {}  ({} episodes{})",
                season.season_number, season.name, season.episode_count, aired
            );
        }
    }
    out
}

pub fn season(season: &SeasonDetails, images: &ImageUrls) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", heading(&season.name, season.air_date.as_deref()));
    if !season.overview.is_empty() {
        let _ = writeln!(out, "{}", season.overview);
    }
    for episode in &season.episodes {
        let mut extra = Vec::new();
        if let Some(minutes) = episode.runtime.filter(|m| *m > 0) {
            extra.push(runtime(minutes));
        }
        if let Some(date) = episode.air_date.as_deref().filter(|d| !d.is_empty()) {
            extra.push(date.to_string());
        }
        let extra = if extra.is_empty() {
            String::new()
        } else {
            format!("  ({})", extra.join(", "))
        };
        let _ = writeln!(
            out,
            "  E{:02}  {}{}",
            episode.episode_number, episode.name, extra
        );
        if let Some(still) = images.url(episode.still_path.as_deref(), ImageSize::W780) {
            let _ = writeln!(out, "       {}", still);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{Episode, Movie, MovieDetails, SeasonSummary, TvShow, TvShowDetails};

    fn dune() -> Content {
        Content::Movie(Movie {
            id: 438631,
            title: "Dune".to_string(),
            release_date: Some("2021-09-15".to_string()),
            vote_average: 7.79,
            ..Default::default()
        })
    }

    #[test]
    fn test_content_line() {
        assert_eq!(content_line(&dune()), "  438631  movie  Dune (2021)  7.8");

        let show = Content::Tv(TvShow {
            id: 1,
            name: "Untitled".to_string(),
            ..Default::default()
        });
        assert_eq!(content_line(&show), "       1  tv     Untitled  0.0");
    }

    #[test]
    fn test_listing_footer() {
        let listing = Listing {
            items: vec![dune()],
            pages_loaded: 1,
            total_results: Some(40),
            has_more: true,
        };
        let out = super::listing("Popular Movies", &listing);
        assert!(out.starts_with("Popular Movies\n"));
        assert!(out.ends_with("Showing 1 of 40 result(s), more available\n"));
    }

    #[test]
    fn test_home_feed_empty_section() {
        let feed = HomeFeed {
            trending: vec![dune()],
            ..Default::default()
        };
        let out = home_feed(&feed);
        assert!(out.starts_with("== Trending Today ==\n  438631  movie  Dune (2021)  7.8\n"));
        assert!(out.contains("== Popular Movies ==\n(nothing here yet)\n"));
    }

    #[test]
    fn test_top_searches() {
        let records = vec![
            SearchRecord {
                query: "dune".to_string(),
                title: "Dune".to_string(),
                count: 12,
                ..Default::default()
            },
            SearchRecord {
                query: "heat".to_string(),
                title: "Heat".to_string(),
                count: 1,
                ..Default::default()
            },
        ];
        assert_eq!(
            top_searches(&records),
            " 1. dune  ->  Dune  (12 searches)\n 2. heat  ->  Heat  (1 search)\n"
        );
    }

    #[test]
    fn test_runtime() {
        assert_eq!(runtime(45), "45m");
        assert_eq!(runtime(120), "2h");
        assert_eq!(runtime(116), "1h 56m");
    }

    #[test]
    fn test_genres() {
        let list = vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 10751,
                name: "Family".to_string(),
            },
        ];
        assert_eq!(genres(&list), "    28  Action\n 10751  Family\n");
    }

    #[test]
    fn test_movie_detail() {
        let detail = MovieDetail {
            details: MovieDetails {
                id: 329865,
                title: "Arrival".to_string(),
                release_date: Some("2016-11-10".to_string()),
                runtime: Some(116),
                poster_path: Some("/arrival.jpg".to_string()),
                overview: "Linguist meets heptapods.".to_string(),
                genres: vec![Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                }],
                ..Default::default()
            },
            videos: vec![Video {
                key: "tFMo3UJ4B4g".to_string(),
                site: "YouTube".to_string(),
                kind: "Trailer".to_string(),
                official: true,
                ..Default::default()
            }],
        };

        let out = movie_detail(&detail, &ImageUrls::default());

        assert!(out.starts_with("Arrival (2016)\n"));
        assert!(out.contains("Genres: Science Fiction\n"));
        assert!(out.contains("Runtime: 1h 56m\n"));
        assert!(out.contains("Poster: https://image.tmdb.org/t/p/w500/arrival.jpg\n"));
        assert!(out.contains("Trailer: https://www.youtube.com/watch?v=tFMo3UJ4B4g\n"));
        assert!(out.ends_with("\nLinguist meets heptapods.\n"));
        assert!(!out.contains("Status"));
    }

    #[test]
    fn test_show_detail_lists_seasons() {
        let detail = ShowDetail {
            details: TvShowDetails {
                name: "Dark".to_string(),
                number_of_seasons: 3,
                number_of_episodes: 26,
                seasons: vec![SeasonSummary {
                    season_number: 1,
                    name: "Season 1".to_string(),
                    episode_count: 10,
                    air_date: Some("2017-12-01".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            },
            videos: vec![],
        };

        let out = show_detail(&detail, &ImageUrls::default());

        assert!(out.starts_with("Dark\n"));
        assert!(out.contains("Seasons: 3 (26 episodes)\n"));
        assert!(out.contains("  S01  Season 1  (10 episodes, 2017-12-01)\n"));
        assert!(!out.contains("Trailer"));
        assert!(!out.contains("Poster"));
    }

    #[test]
    fn test_season_episodes() {
        let details = SeasonDetails {
            name: "Season 1".to_string(),
            air_date: Some("2011-04-17".to_string()),
            episodes: vec![
                Episode {
                    episode_number: 1,
                    name: "Winter Is Coming".to_string(),
                    runtime: Some(62),
                    air_date: Some("2011-04-17".to_string()),
                    still_path: Some("/still.jpg".to_string()),
                    ..Default::default()
                },
                Episode {
                    episode_number: 2,
                    name: "The Kingsroad".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let out = season(&details, &ImageUrls::new("http://cdn.local"));

        assert!(out.starts_with("Season 1 (2011)\n"));
        assert!(out.contains("  E01  Winter Is Coming  (1h 2m, 2011-04-17)\n"));
        assert!(out.contains("       http://cdn.local/w780/still.jpg\n"));
        assert!(out.contains("  E02  The Kingsroad\n"));
    }
}
