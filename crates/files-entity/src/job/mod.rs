//! Background job kinds, payloads, and the persisted job row.

pub mod kind;
pub mod model;
pub mod payload;

pub use kind::JobKind;
pub use model::Job;
pub use payload::{ThumbnailPayload, WelcomePayload};
