//! Creates (or checks) the database named by `DATABASE_URL`, optionally
//! loading initial users from a TOML file.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use realworld_core::{seed, ArticleRepository, Config, Db, UserRepository};

#[derive(Parser, Debug)]
#[command(name = "realworld-core")]
#[command(version, about = "Bootstrap a realworld-core database")]
struct Args {
    /// Create the users listed in this TOML file after setting up the schema
    #[arg(long)]
    seed: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(error) = run(args) {
        tracing::error!(%error, "database bootstrap failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> realworld_core::Result<()> {
    let config = Config::from_env()?;
    tracing::info!(?config, "opening database");

    let db = Db::from_config(&config)?;
    db.setup()?;

    if let Some(path) = &args.seed {
        let users = seed::seed_file(&UserRepository::new(db.clone()), path)?;
        tracing::info!(users = users.len(), path = %path.display(), "seeded database");
    }

    let tags = ArticleRepository::new(db).get_tags()?;
    tracing::info!(tags = tags.len(), "database ready");
    Ok(())
}
