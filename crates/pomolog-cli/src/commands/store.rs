use clap::Subcommand;
use pomolog_core::{BackendStore, Config, LogStore};

#[derive(Subcommand)]
pub enum StoreAction {
    /// Create the log table or header row if missing
    Init,
}

pub async fn run(action: StoreAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StoreAction::Init => {
            let config = Config::load()?;
            let mut store = BackendStore::from_config(&config)?;
            store.ensure_schema().await?;
            println!("{} log store ready", store.name());
        }
    }
    Ok(())
}
