//! Typed client for the Heroku Platform API
//!
//! This crate covers the slice of the Platform API v3 that the provider
//! manages: apps, config vars, add-ons and attachments, pipelines and
//! couplings, private spaces and space app access.
//!
//! # Features
//!
//! - Credential resolution with netrc support (`NETRC_PATH` or the home
//!   directory dotfile), matching the Heroku CLI
//! - One async method per endpoint, typed payloads and responses
//! - Structured API errors carrying Heroku's error `id` and message
//!
//! # Example
//!
//! ```ignore
//! use heroku_api::{ClientOptions, Heroku, credentials};
//!
//! let options = ClientOptions::default();
//! let creds = credentials::resolve(
//!     Some("user@example.com".to_string()),
//!     Some("api-key".to_string()),
//!     Default::default(),
//!     &options.host()?,
//! )?;
//! let heroku = Heroku::with_options(creds, options)?;
//!
//! let app = heroku.app_info("example").await?;
//! println!("{} runs on {}", app.name, app.stack.name);
//! ```

pub mod addons;
pub mod apps;
pub mod client;
pub mod config_vars;
pub mod credentials;
pub mod error;
pub mod netrc;
pub mod pipelines;
pub mod spaces;

pub use client::{ACCEPT_HEADER, ClientOptions, DEFAULT_API_URL, Heroku};
pub use credentials::Credentials;
pub use error::{Error, Result};
