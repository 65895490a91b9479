//! Shared relay queue
//!
//! One process-wide ordered list of pending broadcast jobs behind a single
//! mutex, shared by every identity's dispatch loop. The lock covers
//! iteration, append, increment, and removal; callers copy out what they
//! need and never hold the lock across network I/O.
//!
//! Known gap, carried deliberately: an `AllIdentities` job only retires
//! once every configured identity has processed it, so an identity that
//! never runs leaves such jobs in the queue forever. There is no
//! staleness eviction.

use std::collections::HashSet;
use std::sync::Mutex;

use uuid::Uuid;

use fleet_types::RelayJob;

/// A job claimed for delivery: the fields a dispatch pass needs after
/// releasing the queue lock.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    pub id: Uuid,
    pub content: String,
}

/// Result of a `mark_processed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The job is still waiting on other identities.
    Progressed { processed: u32, required: u32 },
    /// This was the last addressed identity; the job was removed.
    Retired,
    /// The job id was no longer present (already retired by a racing
    /// pass). Expected, not an error.
    AlreadyRetired,
}

/// Ordered sequence of pending [`RelayJob`]s, append-only except for
/// retirement removal. All access goes through one mutex.
pub struct RelayQueue {
    jobs: Mutex<Vec<RelayJob>>,
    n_identities: usize,
}

impl RelayQueue {
    /// Create an empty queue for a fleet of `n_identities` identities.
    pub fn new(n_identities: usize) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            n_identities,
        }
    }

    /// Total identity count used to decide `AllIdentities` retirement.
    pub fn n_identities(&self) -> usize {
        self.n_identities
    }

    /// Append a job to the end of the queue. Returns its id.
    pub fn enqueue(&self, job: RelayJob) -> Uuid {
        let id = job.id;
        self.jobs.lock().unwrap().push(job);
        id
    }

    /// Snapshot, in queue order, of the jobs addressed to `identity` that
    /// are not in the caller's processed set. Copies (id, content) out so
    /// the caller can send without holding the lock.
    pub fn claimable_for(&self, identity: &str, processed: &HashSet<Uuid>) -> Vec<PendingSend> {
        let jobs = self.jobs.lock().unwrap();
        jobs.iter()
            .filter(|job| !processed.contains(&job.id) && job.scope.addresses(identity))
            .map(|job| PendingSend {
                id: job.id,
                content: job.content.clone(),
            })
            .collect()
    }

    /// Record that one addressed identity finished delivery of `job_id`,
    /// removing the job once every addressed identity has done so.
    pub fn mark_processed(&self, job_id: Uuid) -> MarkOutcome {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(idx) = jobs.iter().position(|job| job.id == job_id) else {
            return MarkOutcome::AlreadyRetired;
        };

        let job = &mut jobs[idx];
        job.processed_count += 1;
        let required = job.scope.required_count(self.n_identities);
        if job.processed_count >= required {
            jobs.remove(idx);
            MarkOutcome::Retired
        } else {
            MarkOutcome::Progressed {
                processed: jobs[idx].processed_count,
                required,
            }
        }
    }

    /// Number of jobs currently pending.
    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// True if no jobs are pending.
    pub fn is_empty(&self) -> bool {
        self.jobs.lock().unwrap().is_empty()
    }
}
