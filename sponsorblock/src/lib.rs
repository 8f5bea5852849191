//! A blocking client for the [SponsorBlock](https://sponsor.ajay.app) API.
//!
//! ```no_run
//! use sponsorblock::{Client, SegmentQuery};
//!
//! let client = Client::new()?;
//! for segment in client.get_skip_segments("kJQP7kiw5Fk", &SegmentQuery::default())? {
//!   println!("{}: {} - {}", segment.category(), segment.start(), segment.end());
//! }
//! # Ok::<_, sponsorblock::Error>(())
//! ```

#[macro_use]
mod macros;

pub mod cache;
pub mod client;
pub mod config;
pub mod data;
pub mod error;

pub use client::*;
pub use config::ClientConfig;
pub use data::*;
pub use error::{Error, HttpError, HttpErrorKind, Result};

/// Sent with every request and every submission.
pub const USER_AGENT: &str = concat!("sponsorblock-rs/", env!("CARGO_PKG_VERSION"));
