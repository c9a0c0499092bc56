//! petitiond: entry point for running the petitions service, plus a small
//! command-line client for it.

mod proof_file;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use petition_client::{view, ClientConfig, PetitionSession, VerificationOutcome};
use petition_rpc::{router, ApiMetrics, AppState, RpcServer, ServerConfig, StorageBackend};
use petition_store::{MemoryPetitionStore, PetitionStore};
use petition_store_lmdb::LmdbPetitionStore;
use petition_utils::{init_logging, LogFormat, ShutdownController};
use petition_verification::{AppId, CloudVerifier};

use crate::proof_file::ProofFileWidget;

#[derive(Parser)]
#[command(name = "petitiond", about = "Petitions service and client")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file's value for `serve`, "warn" otherwise.
    #[arg(long, global = true, env = "PETITION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "PETITION_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Print the current petitions.
    List {
        #[arg(long, default_value = "http://localhost:3000", env = "PETITION_SERVER")]
        server: String,
    },
    /// Verify with a proof file, then create a petition.
    Create(CreateArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "PETITION_BIND_ADDRESS")]
    bind_address: Option<String>,

    #[arg(long, env = "PETITION_PORT")]
    port: Option<u16>,

    /// Storage backend: "memory" or "lmdb".
    #[arg(long, env = "PETITION_STORAGE")]
    storage: Option<StorageBackend>,

    /// Data directory for the LMDB backend.
    #[arg(long, env = "PETITION_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Identity provider application id (`app_...`).
    #[arg(long, env = "WLD_APP_ID")]
    app_id: Option<String>,

    /// Identity provider action id.
    #[arg(long, env = "WLD_ACTION")]
    action: Option<String>,

    /// Base URL of the cloud verification API.
    #[arg(long, env = "PETITION_VERIFY_BASE_URL")]
    verify_base_url: Option<String>,

    /// Enable Prometheus metrics endpoint.
    #[arg(long, env = "PETITION_ENABLE_METRICS")]
    metrics: bool,
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long, default_value = "http://localhost:3000", env = "PETITION_SERVER")]
    server: String,

    #[arg(long)]
    title: String,

    #[arg(long)]
    description: String,

    /// Proof JSON produced by the verification widget.
    #[arg(long)]
    proof: PathBuf,

    #[arg(long, env = "WLD_APP_ID")]
    app_id: Option<String>,

    #[arg(long, env = "WLD_ACTION")]
    action: Option<String>,
}

impl ServeArgs {
    /// File settings (or defaults), then every flag that was given.
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path.display().to_string();
                let config = ServerConfig::from_toml_file(&path)?;
                tracing::info!("Loaded config from {path}");
                config
            }
            None => ServerConfig::default(),
        };

        if let Some(bind_address) = self.bind_address {
            config.bind_address = bind_address;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(app_id) = self.app_id {
            config.app_id = Some(AppId::new(app_id)?);
        }
        if let Some(action) = self.action {
            config.action = Some(action);
        }
        if let Some(url) = self.verify_base_url {
            config.verify_base_url = url;
        }
        config.enable_metrics |= self.metrics;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let mut config = args.into_config()?;
            if let Some(level) = cli.log_level {
                config.log_level = level;
            }
            if let Some(format) = cli.log_format {
                config.log_format = format;
            }
            init_logging(config.log_format, &config.log_level);
            serve(config).await
        }
        Command::List { server } => {
            init_client_logging(cli.log_format, cli.log_level.as_deref());
            list(&server).await
        }
        Command::Create(args) => {
            init_client_logging(cli.log_format, cli.log_level.as_deref());
            create(args).await
        }
    }
}

fn init_client_logging(format: Option<LogFormat>, level: Option<&str>) {
    init_logging(format.unwrap_or_default(), level.unwrap_or("warn"));
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let metrics = Arc::new(ApiMetrics::new()?);
    let verifier = config.cloud_verifier()?.map(Arc::new);
    if verifier.is_none() {
        tracing::warn!("app_id or action not set; /api/verify will answer 503");
    }

    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; petitions are lost on restart");
            run(&config, Arc::new(MemoryPetitionStore::new()), verifier, metrics).await
        }
        StorageBackend::Lmdb => {
            let store =
                LmdbPetitionStore::open_with_map_size(&config.data_dir, config.lmdb_map_size)
                    .with_context(|| {
                        format!("opening LMDB store at {}", config.data_dir.display())
                    })?;
            run(&config, Arc::new(store), verifier, metrics).await
        }
    }
}

async fn run<S>(
    config: &ServerConfig,
    store: Arc<S>,
    verifier: Option<Arc<CloudVerifier>>,
    metrics: Arc<ApiMetrics>,
) -> anyhow::Result<()>
where
    S: PetitionStore + 'static,
{
    let stored = store.count()?;
    metrics.set_stored(stored);

    tracing::info!(
        "Starting petitions service (storage: {}, petitions: {stored}, metrics: {})",
        config.storage,
        if config.enable_metrics { "on" } else { "off" },
    );

    let app = router(AppState::new(store, verifier, metrics), config.enable_metrics);

    // Subscribe before the signal task can fire.
    let shutdown = ShutdownController::new();
    let stopped = shutdown.signalled();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    RpcServer::new(config.listen_addr())
        .start(app, stopped)
        .await?;

    tracing::info!("petitiond exited cleanly");
    Ok(())
}

async fn list(server: &str) -> anyhow::Result<()> {
    let api = petition_client::PetitionApi::new(server)?;
    let petitions = api.list().await?;
    let model = petition_client::ViewModel {
        petitions,
        ..Default::default()
    };
    print!("{}", view::render(&model));
    Ok(())
}

async fn create(args: CreateArgs) -> anyhow::Result<()> {
    let config = ClientConfig::new(&args.server, args.app_id.as_deref(), args.action.as_deref())?;
    let mut session = PetitionSession::new(config, ProofFileWidget::new(args.proof))?;

    if let Err(e) = session.refresh().await {
        tracing::warn!("could not load petitions before verifying: {e}");
    }

    let cancel = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    match session.verify(cancel).await? {
        VerificationOutcome::Verified { nullifier_hash } => {
            tracing::info!(%nullifier_hash, "verified");
        }
        VerificationOutcome::Failed(detail) => anyhow::bail!("Verification failed: {detail}"),
        VerificationOutcome::Cancelled => anyhow::bail!("Verification cancelled"),
        VerificationOutcome::TimedOut => anyhow::bail!("Verification timed out"),
    }

    session.set_title(args.title);
    session.set_description(args.description);
    session.submit().await?;

    print!("{}", view::render(session.view()));
    Ok(())
}
