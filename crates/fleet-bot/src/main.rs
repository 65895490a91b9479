//! Satellite Bot Fleet
//!
//! Runs six Discord bot identities in one process. Each identity holds
//! its own gateway connection, rotates its presence status, and serves a
//! shared cross-posting relay: a DM to any identity can be rebroadcast
//! through every identity into one shared channel.

mod config;
mod handlers;
mod health;
mod inbound;
mod presence;
mod sink;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_relay::{AuditLog, DispatchWorker, RelayQueue, SlidingWindow, SystemClock};

use crate::config::Config;
use crate::handlers::Handler;
use crate::health::AppState;
use crate::inbound::RelayContext;
use crate::sink::ChannelSink;

/// Satellite fleet CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/fleet-bot.toml")]
    config: String,

    /// Shared destination channel id (overrides config file)
    #[arg(long, env = "RELAY_CHANNEL_ID")]
    channel_id: Option<u64>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_bot=debug,fleet_relay=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting satellite fleet");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };
    if let Some(channel_id) = args.channel_id {
        config.relay.channel_id = channel_id;
    }

    for w in config.access.warnings() {
        warn!("Access config: {}", w);
    }
    info!(
        "Fleet of {} identities, relay channel {}",
        config.identities.len(),
        config.relay.channel_id
    );

    // Shared relay state, injected into every identity at construction.
    let queue = Arc::new(RelayQueue::new(config.identities.len()));
    let limiter = SlidingWindow::new(
        Duration::from_secs(config.rate.window_secs),
        config.rate.max_per_window,
        SystemClock,
    );
    let audit = Arc::new(match &config.audit.path {
        Some(path) => AuditLog::new(path, config.audit.max_bytes)?,
        None => AuditLog::disabled(),
    });
    let relay = Arc::new(RelayContext::new(
        Arc::clone(&queue),
        limiter,
        config.access.clone(),
        Arc::clone(&audit),
    ));

    // Health check server
    let health_state = AppState::new(
        Arc::clone(&queue),
        config.identities.iter().map(|i| i.name.clone()),
    );
    let health_state_clone = health_state.clone();
    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state_clone, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    let intents = GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;
    let dispatch_period = Duration::from_secs(config.relay.dispatch_interval_secs);
    let presence_period = Duration::from_secs(config.relay.presence_interval_secs);

    let mut shard_managers = Vec::new();
    let mut gateway_tasks = Vec::new();

    for identity in &config.identities {
        let handler = Handler::new(
            identity.name.clone(),
            Arc::clone(&relay),
            health_state.clone(),
            presence_period,
        );

        let mut client = Client::builder(&identity.token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                anyhow::anyhow!("Failed to create Discord client for {}: {}", identity.name, e)
            })?;

        // Each identity's dispatch worker posts through that identity's
        // own HTTP handle.
        let sink = ChannelSink::new(client.http.clone(), config.relay.channel_id);
        let worker = DispatchWorker::new(
            identity.name.clone(),
            Arc::clone(&queue),
            sink,
            Arc::clone(&audit),
        );
        tokio::spawn(worker.run(dispatch_period));

        shard_managers.push(client.shard_manager.clone());
        let name = identity.name.clone();
        gateway_tasks.push(tokio::spawn(async move {
            info!("[{}] starting gateway connection", name);
            if let Err(e) = client.start().await {
                error!("[{}] gateway error: {}", name, e);
            }
        }));
    }

    // Graceful shutdown: close every identity's shards on SIGTERM or Ctrl+C.
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping satellites...");
        for shard_manager in shard_managers {
            shard_manager.shutdown_all().await;
        }
    });

    for task in gateway_tasks {
        let _ = task.await;
    }

    info!("Satellite fleet stopped");
    Ok(())
}
