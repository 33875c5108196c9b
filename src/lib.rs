//! # Good First Issues
//!
//! A Rust library for finding beginner-friendly GitHub issues, checking the
//! remaining API quota and previewing results in a browser.
//!
//! ## Main Components
//!
//! - [`CredentialStore`]: Persists a single personal access token under `~/.gfi`
//! - [`RateLimitReporter`]: Reads the remaining REST or GraphQL quota
//! - [`IssueSearcher`]: Searches for open issues labelled "good first issue"
//! - [`limit::resolve`]: Turns `--limit`/`--all` into an effective ceiling
//! - [`LocalServer`]: Serves the rendered HTML table on localhost
//! - [`Args`]: Command line argument structure
//!
//! ## Example
//!
//! ```no_run
//! use good_first_issues_lib::{limit, render, Config, IssueSearcher, Scope};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = Config::from_env()?;
//!
//!     // Search a single organization with the default limit
//!     let searcher = IssueSearcher::new(&config)?;
//!     let issues = searcher
//!         .search(&Scope::Organization("rust-lang".to_string()), limit::resolve(None, false))
//!         .await?;
//!
//!     print!("{}", render::text_table(&issues));
//!     Ok(())
//! }
//! ```

mod args;
pub mod config;
pub mod credentials;
pub mod error;
pub mod github;
pub mod issues;
pub mod limit;
pub mod progress;
pub mod rate_limit;
pub mod render;
pub mod server;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Command};
pub use crate::config::Config;
pub use crate::credentials::CredentialStore;
pub use crate::error::{GfiError, Result};
pub use crate::issues::{Issue, IssueSearcher, Scope};
pub use crate::rate_limit::{Api, RateLimitReading, RateLimitReporter};
pub use crate::server::LocalServer;
