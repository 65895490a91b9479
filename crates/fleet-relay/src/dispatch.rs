//! Per-identity dispatch loop
//!
//! Each identity runs one worker on a fixed tick. A pass snapshots the
//! jobs addressed to this identity, releases the queue lock, performs the
//! sends, and only re-acquires the lock to commit each result. The lock
//! is never held across the outbound I/O, so one identity's slow send
//! cannot stall the other five ticks.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::audit::{AuditKind, AuditLog};
use crate::queue::{MarkOutcome, RelayQueue};
use crate::sink::RelaySink;

/// One identity's claim-and-send worker over the shared queue.
pub struct DispatchWorker<S: RelaySink> {
    identity: String,
    queue: Arc<RelayQueue>,
    sink: S,
    audit: Arc<AuditLog>,
    /// Jobs this identity has already delivered (or given up on).
    /// Exclusively owned; append-only for the worker's lifetime. Keeps a
    /// job from being re-sent when it stays visible across ticks while
    /// other identities catch up.
    processed: HashSet<Uuid>,
}

impl<S: RelaySink> DispatchWorker<S> {
    pub fn new(
        identity: impl Into<String>,
        queue: Arc<RelayQueue>,
        sink: S,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            identity: identity.into(),
            queue,
            sink,
            audit,
            processed: HashSet::new(),
        }
    }

    /// Run forever, one pass per `period`. Terminal only on shutdown
    /// (the owning task is aborted).
    pub async fn run(mut self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.run_pass().await;
        }
    }

    /// One dispatch pass: claim, send, commit — in queue order.
    ///
    /// A send failure is logged and audited but still committed: the
    /// job id joins the processed set and the queue count advances, so a
    /// permanently broken destination cannot grow the queue without
    /// bound through retries.
    pub async fn run_pass(&mut self) {
        let claims = self.queue.claimable_for(&self.identity, &self.processed);
        if claims.is_empty() {
            return;
        }
        debug!(
            identity = %self.identity,
            claimed = claims.len(),
            "dispatch pass claimed jobs"
        );

        for claim in claims {
            self.audit.record(
                AuditKind::JobClaimed,
                &self.identity,
                "-",
                &format!("job={}", claim.id),
            );

            // The queue lock is not held here; the send goes through this
            // identity's own connection.
            match self.sink.send(&claim.content).await {
                Ok(()) => {
                    self.audit.record(
                        AuditKind::SendOk,
                        &self.identity,
                        "-",
                        &format!("job={}", claim.id),
                    );
                }
                Err(e) => {
                    warn!(
                        identity = %self.identity,
                        job = %claim.id,
                        "outbound send failed, counting as processed: {}",
                        e
                    );
                    self.audit.record(
                        AuditKind::SendFailed,
                        &self.identity,
                        "-",
                        &format!("job={} error={}", claim.id, e),
                    );
                }
            }

            self.processed.insert(claim.id);
            if self.queue.mark_processed(claim.id) == MarkOutcome::Retired {
                self.audit.record(
                    AuditKind::JobRetired,
                    &self.identity,
                    "-",
                    &format!("job={}", claim.id),
                );
            }
        }
    }

    /// Identity this worker delivers for.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}
