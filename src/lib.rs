//! Fetch the prompt list from a Langfuse deployment
//!
//! The fetcher walks an ordered plan of candidates (host, endpoint and auth
//! style) and stops at the first one that answers with a prompt list. Every
//! failed candidate leaves a diagnostic behind.
//!
//! ```no_run
//! use langfuse_prompt_fetch::{FetcherConfig, PromptFetcher};
//!
//! # async fn example() -> langfuse_prompt_fetch::Result<()> {
//! let fetcher = PromptFetcher::builder()
//!     .config(FetcherConfig::from_env()?)
//!     .build()?;
//!
//! let outcome = fetcher.fetch().await?;
//! for record in outcome.records() {
//!     println!("{} v{}", record.name, record.version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod candidate;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod report;
pub mod response;
pub mod security;

pub use auth::AuthStyle;
pub use candidate::Candidate;
pub use client::{AttemptResult, FetchEvent, FetchOutcome, PromptFetcher};
pub use config::FetcherConfig;
pub use error::{AttemptFailure, Error, FailureKind, Result};
pub use normalize::PromptRecord;
pub use report::Reporter;
pub use security::SecretString;
