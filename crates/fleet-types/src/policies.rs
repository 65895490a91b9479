//! Sender authorization policy

use serde::{Deserialize, Serialize};

/// How inbound senders are admitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderPolicyKind {
    /// Anyone may use the relay.
    Open,
    /// Only senders on the allow-list may use the relay.
    Allowlist,
}

/// Authorization configuration for inbound direct messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SenderPolicy {
    pub kind: SenderPolicyKind,
    /// Permitted sender IDs (consulted only under `Allowlist`).
    #[serde(default)]
    pub allowed_senders: Vec<u64>,
}

impl Default for SenderPolicy {
    fn default() -> Self {
        Self {
            kind: SenderPolicyKind::Allowlist,
            allowed_senders: Vec::new(),
        }
    }
}

impl SenderPolicy {
    /// Check whether a sender may use the relay.
    pub fn is_allowed(&self, sender_id: u64) -> bool {
        match self.kind {
            SenderPolicyKind::Open => true,
            SenderPolicyKind::Allowlist => self.allowed_senders.contains(&sender_id),
        }
    }

    /// Warnings about suspicious configurations, surfaced at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        match self.kind {
            SenderPolicyKind::Allowlist if self.allowed_senders.is_empty() => {
                out.push("allowlist policy with an empty allow-list blocks every sender".to_string());
            }
            SenderPolicyKind::Open if !self.allowed_senders.is_empty() => {
                out.push("open policy ignores the configured allow-list".to_string());
            }
            _ => {}
        }
        out
    }
}
