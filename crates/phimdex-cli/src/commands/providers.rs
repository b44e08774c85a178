use color_eyre::Result;

use phimdex_config::Config;
use phimdex_providers::{ProviderCapabilities, ProviderRegistry};

use crate::output::{self, OutputFormat};

pub fn run_providers(config: &Config, format: OutputFormat) -> Result<()> {
    let registry = ProviderRegistry::from_config(config);

    let rows: Vec<(String, bool, bool)> = registry
        .providers()
        .iter()
        .map(|provider| {
            (
                provider.provider_name().to_string(),
                provider.supports_title_search(),
                provider.supports_movie_catalog(),
            )
        })
        .collect();

    output::print_providers(&rows, format);
    Ok(())
}
