//! Serenity event handler, one instance per satellite identity

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::health::AppState;
use crate::inbound::RelayContext;
use crate::presence;

/// Per-identity gateway event handler. Holds a handle to the shared
/// relay state; the identity name is the only thing that differs
/// between the six instances.
pub struct Handler {
    identity: String,
    relay: Arc<RelayContext>,
    health: AppState,
    presence_period: Duration,
    presence_started: AtomicBool,
}

impl Handler {
    pub fn new(
        identity: String,
        relay: Arc<RelayContext>,
        health: AppState,
        presence_period: Duration,
    ) -> Self {
        Self {
            identity,
            relay,
            health,
            presence_period,
            presence_started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("[{}] connected as {}", self.identity, ready.user.name);
        self.health.set_connected(&self.identity).await;

        // Reconnects fire ready again; the rotation task survives them.
        if !self.presence_started.swap(true, Ordering::SeqCst) {
            let identity = self.identity.clone();
            let period = self.presence_period;
            tokio::spawn(presence::rotate_presence(ctx, identity, period));
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Relay input is direct messages from humans only.
        if msg.author.bot || msg.guild_id.is_some() {
            return;
        }

        let reply = self
            .relay
            .handle_inbound(&self.identity, msg.author.id.get(), &msg.content);

        if let Err(e) = msg.reply(&ctx.http, reply).await {
            error!(
                "[{}] failed to reply to sender {}: {}",
                self.identity, msg.author.id, e
            );
        }
    }
}
