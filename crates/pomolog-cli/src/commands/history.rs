use clap::Args;
use pomolog_core::{BackendStore, Config, HistoryTable, LogStore};

#[derive(Args)]
pub struct HistoryArgs {
    /// Number of sessions to show (defaults to log.history_limit)
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = BackendStore::from_config(&config)?;
    let limit = args.limit.unwrap_or(config.log.history_limit);
    let records = store.read_recent(limit).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", HistoryTable::new(&records));
    }
    Ok(())
}
