//! Inbound direct-message pipeline
//!
//! Authorize → rate-limit → classify → enqueue, producing exactly one
//! reply string per inbound message. Pure with respect to the gateway:
//! the serenity handler feeds it sender id + body and sends back
//! whatever it returns.

#[path = "inbound_tests.rs"]
mod inbound_tests;

use std::sync::Arc;

use fleet_relay::{AuditKind, AuditLog, Clock, RelayQueue, SlidingWindow, SystemClock};
use fleet_types::{
    help_text, parse_command, BroadcastScope, ParsedCommand, RelayError, RelayJob, SenderPolicy,
};
use tracing::debug;

/// Shared inbound state: every identity's handler feeds into the same
/// queue, limiter, policy, and audit trail.
pub struct RelayContext<C: Clock = SystemClock> {
    queue: Arc<RelayQueue>,
    limiter: SlidingWindow<C>,
    policy: SenderPolicy,
    audit: Arc<AuditLog>,
}

impl<C: Clock> RelayContext<C> {
    pub fn new(
        queue: Arc<RelayQueue>,
        limiter: SlidingWindow<C>,
        policy: SenderPolicy,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            queue,
            limiter,
            policy,
            audit,
        }
    }

    pub fn queue(&self) -> &Arc<RelayQueue> {
        &self.queue
    }

    /// Handle one DM received by `identity` from `sender_id`. Returns the
    /// reply to send back — every branch replies exactly once.
    pub fn handle_inbound(&self, identity: &str, sender_id: u64, body: &str) -> String {
        let sender = sender_id.to_string();
        self.audit.record(
            AuditKind::InboundDm,
            identity,
            &sender,
            &format!("len={}", body.chars().count()),
        );

        if !self.policy.is_allowed(sender_id) {
            self.audit
                .record(AuditKind::Rejected, identity, &sender, "unauthorized");
            return RelayError::Unauthorized.to_string();
        }

        if !self.limiter.check_and_record(sender_id) {
            self.audit
                .record(AuditKind::Rejected, identity, &sender, "rate limited");
            return RelayError::RateLimited.to_string();
        }

        match parse_command(body, identity) {
            Err(e) => {
                self.audit.record(
                    AuditKind::Rejected,
                    identity,
                    &sender,
                    &format!("validation: {}", e),
                );
                e.to_string()
            }
            Ok(ParsedCommand::Help) => {
                self.audit.record(AuditKind::HelpServed, identity, &sender, "-");
                help_text().to_string()
            }
            Ok(ParsedCommand::Broadcast { content, scope }) => {
                let job = RelayJob::new(content, scope.clone());
                let id = self.queue.enqueue(job);
                debug!(identity, sender_id, job = %id, "enqueued relay job");

                match &scope {
                    BroadcastScope::AllIdentities => {
                        self.audit.record(
                            AuditKind::JobEnqueued,
                            identity,
                            &sender,
                            &format!("job={} scope=all", id),
                        );
                        format!(
                            "Queued for broadcast through all {} satellites.",
                            self.queue.n_identities()
                        )
                    }
                    BroadcastScope::SingleIdentity(name) => {
                        self.audit.record(
                            AuditKind::JobEnqueued,
                            identity,
                            &sender,
                            &format!("job={} scope={}", id, name),
                        );
                        format!("Queued for relay to the shared channel via {}.", name)
                    }
                }
            }
        }
    }
}
