//! Client for the explorer proxy HTTP API.

mod client;

pub use client::{ErrorEnvelope, ExplorerClient, SdkError};
