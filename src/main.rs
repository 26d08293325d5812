use kolbot::config::Config;
use kolbot::domain::Storage;
use kolbot::error::Result;
use kolbot::infrastructure::FileSystemStore;
use kolbot::services::ParsingService;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    let level = Level::from_str(&config.args.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    config.ensure_directories()?;

    let store = config
        .args
        .data_dir
        .clone()
        .map(|dir| Arc::new(FileSystemStore::new(dir)) as Arc<dyn Storage>);

    let service = ParsingService::new(config, store);
    service.run().await?;

    info!("Done");
    Ok(())
}
