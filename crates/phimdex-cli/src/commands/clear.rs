use color_eyre::Result;
use tracing::info;

use phimdex_config::PathManager;
use phimdex_core::MovieStore;

pub async fn run_clear(paths: &PathManager) -> Result<()> {
    let store = MovieStore::open(paths.movies_file())?;
    let removed = store.len().await;
    store.clear().await?;
    info!("Cleared movie cache at {:?}", paths.movies_file());
    println!("Removed {} cached movie record(s).", removed);
    Ok(())
}
