use clap::ValueEnum;
use serde_json::json;

use phimdex_core::CatalogRefreshOutcome;
use phimdex_models::{Movie, StreamSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn print_refresh(outcome: &CatalogRefreshOutcome, cached_total: usize, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!(
                "Refreshed {} page(s): {} fetched, {} created, {} updated, {} enriched",
                outcome.pages_fetched,
                outcome.fetched,
                outcome.created,
                outcome.updated,
                outcome.enriched
            );
            println!("Cached movies: {}", cached_total);
            for error in &outcome.errors {
                println!("warning: {}", error);
            }
        }
        OutputFormat::Json => {
            let value = json!({
                "pages_fetched": outcome.pages_fetched,
                "fetched": outcome.fetched,
                "created": outcome.created,
                "updated": outcome.updated,
                "enriched": outcome.enriched,
                "cached_total": cached_total,
                "errors": outcome.errors,
            });
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        }
    }
}

pub fn print_sources(sources: &[StreamSource], format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            if sources.is_empty() {
                println!("No stream sources found.");
                return;
            }
            for source in sources {
                println!(
                    "{}  {}  [{} / {}]  {} episode(s)",
                    source.provider,
                    source.server_name,
                    source.language,
                    if source.quality.is_empty() {
                        "?"
                    } else {
                        source.quality.as_str()
                    },
                    source.episodes.len()
                );
                for episode in &source.episodes {
                    let url = if !episode.stream_url.is_empty() {
                        &episode.stream_url
                    } else if !episode.embed_url.is_empty() {
                        &episode.embed_url
                    } else {
                        "(no url)"
                    };
                    println!("    {:>3}  {}  {}", episode.episode_number, episode.title, url);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(sources).unwrap_or_default());
        }
    }
}

pub fn print_movie(movie: &Movie, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!("{}  ({})", movie.title, movie.media_type);
            println!("  id:           {}", movie.id);
            println!(
                "  external id:  {}",
                movie.external_id.as_deref().unwrap_or("-")
            );
            if let Some(original_title) = &movie.original_title {
                println!("  original:     {}", original_title);
            }
            if let Some(provider) = &movie.provider {
                println!("  provider:     {}", provider);
            }
            if let Some(trailer_url) = &movie.trailer_url {
                println!("  trailer:      {}", trailer_url);
            }
            if !movie.genres.is_empty() {
                println!("  genres:       {}", movie.genres.join(", "));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(movie).unwrap_or_default());
        }
    }
}

pub fn print_providers(rows: &[(String, bool, bool)], format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            if rows.is_empty() {
                println!("No providers registered.");
                return;
            }
            for (name, title_search, catalog) in rows {
                let mut capabilities = vec!["streams"];
                if *title_search {
                    capabilities.push("title-search");
                }
                if *catalog {
                    capabilities.push("catalog");
                }
                println!("{}  [{}]", name, capabilities.join(", "));
            }
        }
        OutputFormat::Json => {
            let value: Vec<_> = rows
                .iter()
                .map(|(name, title_search, catalog)| {
                    json!({
                        "name": name,
                        "title_search": title_search,
                        "catalog": catalog,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        }
    }
}
