// mentordesk-api: Async Rust client for the mentoring program's REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

mod announcements;
mod mentees;

pub use auth::BearerToken;
pub use client::ApiClient;
pub use error::Error;
pub use transport::TransportConfig;
