mod run;

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use budgetrule::config::AppConfig;
use budgetrule::db::SqliteStore;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let config = load_config(&mut args)?;
    init_tracing(&config);

    let db_path = config.database_path()?;
    let mut store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    store.seed_default_categories(&config.user)?;

    run::as_cli(&args, &store, &config)
}

/// Read `--config <path>` out of the arguments, falling back to the platform
/// config file.
fn load_config(args: &mut Vec<String>) -> Result<AppConfig> {
    let explicit = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => {
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            Some(path)
        }
        Some(_) => anyhow::bail!("--config needs a path"),
        None => None,
    };

    match explicit {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AppConfig::load_or_default(&AppConfig::default_path()?)?),
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
