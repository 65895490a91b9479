//! Presence status rotation
//!
//! Each satellite cycles round-robin through its own set of status
//! messages on a fixed period. The rotation index is local to the
//! identity's presence task; nothing here is shared.

use serenity::gateway::ActivityData;
use serenity::model::user::OnlineStatus;
use serenity::prelude::Context;
use std::time::Duration;
use tracing::debug;

/// Status message sets for the six satellite personas.
const STATUS_ROTATION: &[(&str, &[&str])] = &[
    (
        "Shaka",
        &[
            "Taking meeting notes diligently.",
            "Ethically vetting Edison's ideas.",
            "York, honesty is a virtue...",
            "Violence was not the answer, Atlas.",
            "Teamwork is the ethical choice.",
        ],
    ),
    (
        "Lilith",
        &[
            "Doodling profit charts in the meeting.",
            "Costing Edison's 'profitable' ones.",
            "That prototype cost 80 million berries.",
            "Filing an insurance claim...",
            "Fine. I'll 'collaborate.' For profit.",
        ],
    ),
    (
        "Edison",
        &[
            "IDEA! Wrong meeting. Sorry.",
            "THEY'RE ALL GOOD IDEAS, TRUST ME!",
            "I can rebuild it! NEW IDEA!",
            "Ooh! I can make it BETTER now!",
            "GROUP BRAINSTORM! EVERYONE TALK!",
        ],
    ),
    (
        "Pythagoras",
        &[
            "Calculating meeting efficiency: 12%.",
            "299 rejected. 1 pending review.",
            "Crumb analysis points to York.",
            "Structural failure was 87% predictable.",
            "Dividing tasks by optimal efficiency.",
        ],
    ),
    (
        "Atlas",
        &[
            "Guarding the snack table.",
            "Edison's last idea exploded. Cleaning up.",
            "Interrogating York (gently).",
            "It was looking at me funny.",
            "I'll carry the heavy stuff!",
        ],
    ),
    (
        "York",
        &[
            "Brought snacks. Ate the snacks.",
            "Ignoring Edison. Napping.",
            "It looked like a donut, okay?!",
            "Didn't see anything. Was eating.",
            "Supervising. From the couch. With snacks.",
        ],
    ),
];

/// Status messages for an identity; unknown identities get a plain
/// "Online".
pub fn statuses_for(identity: &str) -> Vec<String> {
    STATUS_ROTATION
        .iter()
        .find(|(name, _)| *name == identity)
        .map(|(_, messages)| messages.iter().map(|m| m.to_string()).collect())
        .unwrap_or_else(|| vec!["Online".to_string()])
}

/// Round-robin cursor over a status-message list.
pub struct StatusCycle {
    messages: Vec<String>,
    index: usize,
}

impl StatusCycle {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages, index: 0 }
    }

    /// Return the current message and advance the cursor.
    pub fn next(&mut self) -> &str {
        let message = &self.messages[self.index];
        self.index = (self.index + 1) % self.messages.len();
        message
    }
}

/// Run the rotation for one identity. The first tick fires immediately,
/// setting the initial status right after connect.
pub async fn rotate_presence(ctx: Context, identity: String, period: Duration) {
    let mut cycle = StatusCycle::new(statuses_for(&identity));
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let message = cycle.next().to_string();
        ctx.set_presence(
            Some(ActivityData::custom(message.clone())),
            OnlineStatus::Online,
        );
        debug!(identity = %identity, status = %message, "presence updated");
    }
}
