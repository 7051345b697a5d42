//! Book catalog command line interface
//!
//! Usage:
//!   catalog start          - Start the API server
//!   catalog token          - Mint a token for a subject and role

use clap::{Parser, Subcommand};

use catalog_api::middleware::encode_token;
use catalog_api::{run_server, Claims, JwtConfig, Role, ServerConfig};

/// Environment variable holding the shared token secret.
const JWT_SECRET_ENV: &str = "CATALOG_JWT_SECRET";

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Book catalog API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Start {
        /// Host to bind to (overrides CATALOG_BIND_ADDR)
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Port to listen on (overrides CATALOG_PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Data directory for the document store (overrides CATALOG_DATA_PATH)
        #[arg(short, long)]
        data_dir: Option<String>,
    },

    /// Mint a signed token for a subject and role
    Token {
        /// Subject ID to embed in the claim
        #[arg(short, long)]
        subject: String,
        /// Role name (CREATOR or READER)
        #[arg(short, long, default_value = "CREATOR")]
        role: String,
        /// Validity in seconds
        #[arg(long, default_value_t = 3600)]
        ttl: u64,
    },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            host,
            port,
            data_dir,
        } => {
            let mut config = ServerConfig::from_env();
            if let Some(host) = host {
                config.bind_addr = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_path = data_dir;
            }

            let jwt = JwtConfig::try_from_env(JWT_SECRET_ENV)?;

            tracing::info!(
                addr = %config.bind_address(),
                data = %config.data_path,
                "starting catalog server"
            );

            run_server(config, jwt)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
        }

        Commands::Token { subject, role, ttl } => {
            if Role::from_str(&role).is_none() {
                anyhow::bail!("unknown role: {}", role);
            }

            let jwt = JwtConfig::try_from_env(JWT_SECRET_ENV)?;
            let claims = Claims::new(subject, role, ttl);
            let token = encode_token(&claims, &jwt)?;

            println!("{}", token);
        }
    }

    Ok(())
}
