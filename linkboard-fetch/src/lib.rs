pub mod client;
pub mod error;
pub mod record;

pub use client::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, LinkClient};
pub use error::FetchError;
pub use record::LinkRecord;
