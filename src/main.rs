use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

use kalaha_engine::config::{load_config, load_default_config, StoreBackend};
use kalaha_engine::server::proto::kalaha_service_server::KalahaServiceServer;
use kalaha_engine::server::KalahaServer;
use kalaha_engine::service::GameService;
use kalaha_engine::store::{FileRepository, GameRepository, MemoryRepository};

#[derive(Parser)]
#[command(name = "kalaha-engine", about = "Kalaha game gRPC server")]
struct Cli {
    /// Port to listen on (default: from config, else 50051)
    #[arg(short, long, env = "KALAHA_ENGINE_PORT")]
    port: Option<u16>,

    /// Path to kalaha.toml (default: auto-discover)
    #[arg(long, env = "KALAHA_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for game documents; selects the file store
    #[arg(long, env = "KALAHA_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => load_config(path)?,
        None => load_default_config(),
    };
    if let Some(dir) = cli.data_dir {
        config.store.backend = StoreBackend::File;
        config.store.data_dir = dir;
    }
    let port = cli.port.unwrap_or(config.server.port);

    let repository: Arc<dyn GameRepository> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryRepository::new()),
        StoreBackend::File => Arc::new(FileRepository::open(config.store.data_dir.clone())?),
    };
    tracing::info!(
        backend = ?config.store.backend,
        cache_capacity = config.store.cache_capacity,
        "game store ready"
    );

    let service = Arc::new(GameService::new(repository, config.store.cache_capacity));
    tracing::info!(
        player_counts = ?service.registry().supported_player_counts(),
        "registered sowing rules"
    );
    let server = KalahaServer::new(service, config.game);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    tracing::info!(%addr, "starting gRPC server");

    Server::builder()
        .add_service(KalahaServiceServer::new(server))
        .serve(addr)
        .await?;

    Ok(())
}
