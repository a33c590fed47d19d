use clap::Args;
use pomolog_core::storage::LogBackend;
use pomolog_core::{BackendStore, Config};

const SQLITE_ONLY: &str = "stats are only available with the sqlite backend";

#[derive(Args)]
pub struct StatsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if config.log.backend != LogBackend::Sqlite {
        return Err(SQLITE_ONLY.into());
    }

    let store = BackendStore::from_config(&config)?;
    let db = store
        .as_sqlite()
        .ok_or(SQLITE_ONLY)?;
    let stats = db.stats()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Today:    {} sessions, {} min", stats.today_sessions, stats.today_minutes);
        println!("All time: {} sessions, {} min", stats.total_sessions, stats.total_minutes);
        println!("Test runs: {}", stats.test_runs);
    }
    Ok(())
}
