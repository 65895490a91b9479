//! Audit trail: one line per observable state transition.
//!
//! Line format: `EVENT_KIND | identity | sender | detail`. Appended to a
//! size-capped file that rotates once to `<path>.1`, and mirrored to
//! `tracing` so the structured logs carry the same events.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{info, warn};

/// Kind of audited event. Covers every state transition of the inbound
/// pipeline and the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    /// A direct message arrived at an identity.
    InboundDm,
    /// An inbound message was rejected before enqueueing.
    Rejected,
    /// Help text was served; nothing enqueued.
    HelpServed,
    /// A relay job entered the queue.
    JobEnqueued,
    /// A dispatch pass claimed a job for delivery.
    JobClaimed,
    /// An outbound send succeeded.
    SendOk,
    /// An outbound send failed (still counted as processed).
    SendFailed,
    /// A job was removed after its final addressed identity processed it.
    JobRetired,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InboundDm => "INBOUND_DM",
            Self::Rejected => "REJECTED",
            Self::HelpServed => "HELP_SERVED",
            Self::JobEnqueued => "JOB_ENQUEUED",
            Self::JobClaimed => "JOB_CLAIMED",
            Self::SendOk => "SEND_OK",
            Self::SendFailed => "SEND_FAILED",
            Self::JobRetired => "JOB_RETIRED",
        }
    }
}

struct AuditFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
}

/// Append-only audit writer. Recording never fails the caller: I/O
/// errors are downgraded to `tracing` warnings.
pub struct AuditLog {
    inner: Option<Mutex<AuditFile>>,
}

impl AuditLog {
    /// Open (or create) the audit file at `path`, rotating at `max_bytes`.
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            inner: Some(Mutex::new(AuditFile {
                path,
                file,
                written,
                max_bytes,
            })),
        })
    }

    /// Audit log that only mirrors to `tracing` (used in tests and when
    /// no audit path is configured).
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Record one event. `sender` is `"-"` for dispatch-side events where
    /// no inbound sender is in scope.
    pub fn record(&self, kind: AuditKind, identity: &str, sender: &str, detail: &str) {
        let line = format!("{} | {} | {} | {}", kind.as_str(), identity, sender, detail);

        match kind {
            AuditKind::Rejected | AuditKind::SendFailed => warn!(target: "audit", "{}", line),
            _ => info!(target: "audit", "{}", line),
        }

        let Some(inner) = &self.inner else {
            return;
        };
        let mut guard = inner.lock().unwrap();
        if let Err(e) = guard.append(&line) {
            warn!("Failed to write audit line: {}", e);
        }
    }
}

impl AuditFile {
    fn append(&mut self, line: &str) -> std::io::Result<()> {
        let bytes = line.len() as u64 + 1;
        if self.written + bytes > self.max_bytes {
            self.rotate()?;
        }
        writeln!(self.file, "{}", line)?;
        self.written += bytes;
        Ok(())
    }

    /// Move the current file to `<path>.1` (replacing any previous one)
    /// and start a fresh file.
    fn rotate(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        let mut rotated = self.path.clone().into_os_string();
        rotated.push(".1");
        fs::rename(&self.path, PathBuf::from(rotated))?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}
