#![forbid(unsafe_code)]

mod config;
mod jsonrpc;
mod response;
mod server;
mod stdio;

use config::{Backend, ServerConfig};
use dash_storage::{
    DocumentStore, JsonFileStore, Repository, SqliteDocumentStore, StoreError,
};
use server::DashServer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const SERVER_NAME: &str = "dash_server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn usage() -> &'static str {
    "dash_server: dashboard category/widget store (JSON-RPC over stdio)\n\n\
USAGE:\n\
  dash_server [--data-dir DIR] [--backend json|sqlite] [--log-json]\n\
\n\
FLAGS:\n\
  -h, --help       Print this help and exit\n\
  -V, --version    Print version and exit\n\
\n\
ENVIRONMENT:\n\
  DASHBOARD_DATA_DIR   Directory holding categories.json (default: data)\n\
  DASHBOARD_BACKEND    json (default) or sqlite\n\
  DASHBOARD_LOG_JSON   1 to emit JSON log lines on stderr\n\
  RUST_LOG             Log filter (default: info)\n\
\n\
METHODS:\n\
  categories/list, categories/get, categories/create,\n\
  widgets/create, widgets/update, widgets/delete, ping\n"
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol; logs always go to stderr.
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn open_store(config: &ServerConfig) -> Result<Box<dyn DocumentStore>, StoreError> {
    let store: Box<dyn DocumentStore> = match config.backend {
        Backend::JsonFile => Box::new(JsonFileStore::open(&config.data_dir)?),
        Backend::Sqlite => Box::new(SqliteDocumentStore::open(&config.data_dir)?),
    };
    Ok(store)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print!("{}", usage());
        return Ok(());
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        println!("{SERVER_NAME} {SERVER_VERSION}");
        return Ok(());
    }

    let config = ServerConfig::from_env_and_args(&args)?;
    init_tracing(config.log_json);

    let store = open_store(&config)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        backend = config.backend.as_str(),
        version = SERVER_VERSION,
        "dash_server starting"
    );

    let mut server = DashServer::new(Repository::new(store));
    match stdio::serve(&mut server, std::io::stdin().lock(), std::io::stdout().lock()) {
        Ok(handled) => {
            tracing::info!(handled, "stdin closed, shutting down");
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "transport failed");
            Err(err.into())
        }
    }
}
