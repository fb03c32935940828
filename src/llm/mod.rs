//! Completion provider access and the model roster

pub mod client;
pub mod models;
pub mod roster;

pub use client::{placeholder_response, Completer, CompletionClient};
pub use roster::{ModelDescriptor, ModelRoster, PLACEHOLDER_MODEL_ID};
