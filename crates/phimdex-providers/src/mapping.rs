use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

use phimdex_models::Episode;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("literal pattern"))
}

/// Episode number rule shared by all adapters: the first run of digits in
/// the display name wins; a name without digits falls back to the 1-based
/// position in the provider's list.
pub fn parse_episode_number(name: &str, index: usize) -> u32 {
    digit_run()
        .find(name)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or((index + 1) as u32)
}

/// Build a canonical episode from one provider item.
pub fn build_episode(
    name: &str,
    slug: &str,
    stream_url: Option<&str>,
    embed_url: Option<&str>,
    index: usize,
) -> Episode {
    Episode {
        id: Uuid::new_v4().to_string(),
        episode_number: parse_episode_number(name, index),
        title: name.to_string(),
        slug: slug.to_string(),
        stream_url: stream_url.unwrap_or_default().to_string(),
        embed_url: embed_url.unwrap_or_default().to_string(),
    }
}
