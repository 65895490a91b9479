//! Gateway-backed relay sink
//!
//! Posts relayed content into the shared destination channel through one
//! identity's HTTP handle, with mention expansion suppressed so relayed
//! `@` sequences never ping.

use std::sync::Arc;

use serenity::builder::{CreateAllowedMentions, CreateMessage};
use serenity::http::{Http, HttpError};
use serenity::model::id::ChannelId;

use fleet_relay::{RelaySink, SinkError};

/// Discord JSON error code for an unknown channel.
const UNKNOWN_CHANNEL: isize = 10003;

/// One identity's connection to the shared destination channel.
pub struct ChannelSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelSink {
    pub fn new(http: Arc<Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: ChannelId::new(channel_id),
        }
    }
}

impl RelaySink for ChannelSink {
    async fn send(&self, content: &str) -> Result<(), SinkError> {
        let builder = CreateMessage::new().content(content).allowed_mentions(
            CreateAllowedMentions::new()
                .everyone(false)
                .all_users(false)
                .all_roles(false),
        );

        self.channel_id
            .send_message(&*self.http, builder)
            .await
            .map(|_| ())
            .map_err(classify_send_error)
    }
}

/// Distinguish a structurally invalid destination from other delivery
/// failures. Neither is retried; the split only drives log wording.
fn classify_send_error(err: serenity::Error) -> SinkError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            let status = resp.status_code.as_u16();
            if status == 404 || resp.error.code == UNKNOWN_CHANNEL {
                SinkError::InvalidDestination(resp.error.message.clone())
            } else {
                SinkError::Delivery(format!("HTTP {}: {}", status, resp.error.message))
            }
        }
        _ => SinkError::Delivery(err.to_string()),
    }
}
