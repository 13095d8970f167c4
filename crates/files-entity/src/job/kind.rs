//! Job kinds and the queues that carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two job kinds, one queue each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Resize an uploaded image. Payload: [`ThumbnailPayload`](super::ThumbnailPayload).
    FileThumbnail,
    /// Greet a newly registered user. Payload: [`WelcomePayload`](super::WelcomePayload).
    WelcomeEmail,
}

impl JobKind {
    /// All kinds, in worker registration order.
    pub const ALL: [JobKind; 2] = [JobKind::FileThumbnail, JobKind::WelcomeEmail];

    /// Name of the queue carrying this kind.
    pub fn queue_name(&self) -> &'static str {
        match self {
            Self::FileThumbnail => "file_thumbnail",
            Self::WelcomeEmail => "welcome_email",
        }
    }

    /// Look up a kind by queue name.
    pub fn from_queue_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.queue_name() == name)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.queue_name())
    }
}
