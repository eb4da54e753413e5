//! TrackMill YouTrack Integration
//!
//! Repository implementation backed by the YouTrack REST API.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::Credentials;
pub use client::YouTrackClient;
pub use error::{Error, Result};
