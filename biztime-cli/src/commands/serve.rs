//! HTTP server command for the BizTime API

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use biztime_server::db::{create_pool_with_options, migrations, pool::DEFAULT_MAX_CONNECTIONS};
use biztime_server::http::{run_server, ServerConfig};

use super::require_database_url;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIZTIME_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, env = "BIZTIME_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Skip applying the schema on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = require_database_url(args.database_url)?;

    tracing::info!("Starting biztime server on {}", args.bind);

    let pool = create_pool_with_options(&database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    if args.no_migrate {
        tracing::info!("Skipping schema migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to apply schema migrations")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
