pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use shared::app_state::AppState;
use shared::config::{self, Config};
use shared::import::ImportContext;
use shared::sheet::store::XlsxSheetStore;
use usecases::u501_seed_from_sheet::{SeedExecutor, SeedTarget};

#[derive(Debug, Parser)]
#[command(name = "backend")]
#[command(about = "Bulk CSV import server and workbook seeder")]
struct Cli {
    /// Без подкоманды запускается сервер
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Seed the database from the configured workbook and sync the tabs back
    SeedExcel {
        #[arg(value_enum, ignore_case = true)]
        target: SeedTarget,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let command = Cli::parse().command.unwrap_or(Command::Serve);

    let config = config::load_config()?;
    let db_path = config::get_database_path(&config);
    let db = shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
    let import_ctx = ImportContext::new(&config.import.default_member_password)?;

    match command {
        Command::Serve => serve(AppState::new(db, config, import_ctx)).await,
        Command::SeedExcel { target } => seed(db, &config, import_ctx, target).await,
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let port = state.config.server.port;
    let app = routes::configure_routes(state);
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;
    Ok(())
}

async fn seed(
    db: sea_orm::DatabaseConnection,
    config: &Config,
    import_ctx: ImportContext,
    target: SeedTarget,
) -> anyhow::Result<()> {
    let workbook = config::get_workbook_path(config);
    tracing::info!("Seeding '{}' from {}", target, workbook.display());

    let executor = SeedExecutor::new(db, XlsxSheetStore::new(workbook), Arc::new(import_ctx));
    let report = executor.execute(target).await?;
    for tab in &report.tabs {
        tracing::info!(
            "Tab '{}': {} written, {} ids generated, {} appended from store",
            tab.tab,
            tab.written,
            tab.backfilled_ids,
            tab.appended
        );
    }
    Ok(())
}
