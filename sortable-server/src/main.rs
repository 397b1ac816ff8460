mod config;

use std::{env, sync::Arc};

use clap::{Arg, ArgMatches, Command};
use config::{DATABASE_URL_ENV, ServerConfig, StoreTarget};
use sortable_api_http::server::{ContextData, HttpServer};
use sortable_common::{
    error::Error,
    reindexer::PositionReindexer,
    state::{BaseDbTrait, DatabaseTrait, MemoryStateDb},
};
use sortable_migration::{Migrator, MigratorTrait};
use sortable_persistence_pg::PostgresStateDb;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Path to the configuration file")
        .default_value("./sortable.yaml")
        .action(clap::ArgAction::Set)
}

fn cli() -> Command {
    Command::new("sortable")
        .about("Sortable position service")
        .version("0.1.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Starts the HTTP server")
                .arg(config_arg())
                .arg(
                    Arg::new("listen_addr")
                        .short('l')
                        .long("listen_addr")
                        .help("Address to listen on, overrides the configuration file")
                        .action(clap::ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("migrate")
                .about("Applies pending database migrations and exits")
                .arg(config_arg()),
        )
}

fn load_config(matches: &ArgMatches) -> Result<ServerConfig, Error> {
    let path = matches
        .get_one::<String>("config")
        .ok_or_else(|| Error::Config("missing --config".into()))?;

    ServerConfig::load(path)
}

async fn connect(database_url: &str) -> Result<PostgresStateDb, Error> {
    let state_db = PostgresStateDb::new(database_url).await?;
    state_db.ping().await?;

    Ok(state_db)
}

async fn open_store(
    config: &ServerConfig,
    env_url: Option<String>,
) -> Result<Arc<dyn DatabaseTrait>, Error> {
    match config.store_target(env_url)? {
        StoreTarget::Memory => {
            warn!("Using the in-memory store, positions are lost on shutdown");
            Ok(Arc::new(MemoryStateDb::new()))
        }
        StoreTarget::Postgres(url) => {
            let state_db = connect(&url).await?;
            if config.run_migrations {
                run_migrations(&state_db).await?;
            }

            Ok(Arc::new(state_db))
        }
    }
}

async fn run_migrations(state_db: &PostgresStateDb) -> Result<(), Error> {
    Migrator::up(state_db.connection(), None)
        .await
        .map_err(|e| Error::Database(format!("Failed to apply migrations: {e}")))?;

    info!("Database migrations applied");
    Ok(())
}

async fn serve(matches: &ArgMatches) -> Result<(), Error> {
    let config = load_config(matches)?;
    let registry = config.registry()?;

    let listen_addr = matches
        .get_one::<String>("listen_addr")
        .cloned()
        .unwrap_or_else(|| config.listen_addr.clone());

    let state_db = open_store(&config, env::var(DATABASE_URL_ENV).ok()).await?;

    info!(resources = registry.len(), "Loaded sortable resources");

    let reindexer = PositionReindexer::new(state_db);
    let ctx = ContextData::new(reindexer, registry, &config.base_path)?;

    let http_server = HttpServer::new(ctx, &listen_addr)?;
    let server_handle = http_server.serve().await?;

    tokio::select! {
        res = server_handle => {
            if let Err(e) = res {
                error!("HTTP server task failed: {}", e);
            }
        }

        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down server");
        }
    }

    Ok(())
}

async fn migrate(matches: &ArgMatches) -> Result<(), Error> {
    let config = load_config(matches)?;

    match config.store_target(env::var(DATABASE_URL_ENV).ok())? {
        StoreTarget::Memory => Err(Error::Config(
            "The in-memory store has no schema to migrate".into(),
        )),
        StoreTarget::Postgres(url) => {
            let state_db = connect(&url).await?;
            run_migrations(&state_db).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // A missing .env file is fine, the environment may already be set
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_level(true)
        .with_target(true)
        .init();

    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("serve", sub_matches)) => serve(sub_matches).await,
        Some(("migrate", sub_matches)) => migrate(sub_matches).await,
        _ => Err(Error::Config("Invalid subcommand".into())),
    };

    if let Err(e) = &result {
        error!("{e}");
    }

    result
}
