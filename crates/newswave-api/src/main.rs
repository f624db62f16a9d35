//! NewsWave API - IPFS storage for news documents

use clap::{Parser, ValueEnum};
use newswave_api::{run_server, ApiConfig, DeploymentMode};
use newswave_storage::thirdweb::{DEFAULT_GATEWAY_TEMPLATE, DEFAULT_UPLOAD_URL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Fixed routes with a CID path parameter
    Standalone,
    /// One function per operation, CID taken from the trailing path segment
    Serverless,
}

impl From<Mode> for DeploymentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Standalone => DeploymentMode::Standalone,
            Mode::Serverless => DeploymentMode::Serverless,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "newswave-api")]
#[command(about = "IPFS upload, fetch and gateway API for NewsWave")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "NEWSWAVE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3001", env = "NEWSWAVE_PORT")]
    port: u16,

    /// Route layout
    #[arg(short, long, value_enum, default_value = "standalone", env = "NEWSWAVE_MODE")]
    mode: Mode,

    /// thirdweb secret key
    #[arg(long, env = "THIRDWEB_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// thirdweb IPFS upload endpoint
    #[arg(long, default_value = DEFAULT_UPLOAD_URL, env = "THIRDWEB_UPLOAD_URL")]
    upload_url: String,

    /// Gateway URL template with `{clientId}` and `{cid}` placeholders
    #[arg(long, default_value = DEFAULT_GATEWAY_TEMPLATE, env = "THIRDWEB_GATEWAY_TEMPLATE")]
    gateway_template: String,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, env = "NEWSWAVE_MEMORY_STORE")]
    memory_store: bool,

    /// Enable debug logging
    #[arg(short, long, env = "NEWSWAVE_DEBUG")]
    debug: bool,

    /// Provider request timeout in seconds
    #[arg(long, default_value = "30", env = "NEWSWAVE_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[arg(long, default_value = "1048576", env = "NEWSWAVE_MAX_BODY_SIZE")]
    max_body_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "newswave_api={level},newswave_storage={level},tower_http=debug",
                level = log_level
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NewsWave API on {}:{}", args.host, args.port);
    tracing::info!("Upload endpoint: {}", args.upload_url);

    if args.memory_store {
        tracing::warn!("⚠️  Using in-memory storage - data will NOT persist!");
    }

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        mode: args.mode.into(),
        secret_key: args.secret_key,
        upload_url: args.upload_url,
        gateway_template: args.gateway_template,
        use_memory_store: args.memory_store,
        request_timeout_secs: args.request_timeout_secs,
        max_body_size: args.max_body_size,
    };

    run_server(config).await
}
