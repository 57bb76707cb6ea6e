//! Session module - per-conversation transcripts keyed by session id

pub mod store;

pub use store::{SessionStore, SharedTranscript};
