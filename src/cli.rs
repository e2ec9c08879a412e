//! Command-line surface of the `langfuse-prompts` binary
//!
//! Values arrive as plain strings, from flags or their environment fallbacks,
//! and are parsed by [`FetcherConfig::from_lookup`]. A malformed value is then
//! a configuration error with exit status 1, like any other.

use clap::Parser;
use std::io::Write;
use tracing::error;

use crate::client::PromptFetcher;
use crate::config::{FetcherConfig, DEFAULT_PREVIEW_LEN};
use crate::error::Error;
use crate::report::Reporter;

/// Exit status when a candidate answered, with or without prompts
pub const EXIT_SUCCESS: u8 = 0;

#[derive(Parser, Debug)]
#[command(name = "langfuse-prompts")]
#[command(about = "Fetch and preview Langfuse prompts, trying each host and endpoint in order")]
pub struct Args {
    /// Langfuse public key
    #[arg(long, env = "LANGFUSE_PUBLIC_KEY", hide_env_values = true)]
    pub public_key: Option<String>,

    /// Langfuse secret key
    #[arg(long, env = "LANGFUSE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Only list prompts carrying this label
    #[arg(long, env = "LANGFUSE_LABEL")]
    pub label: Option<String>,

    /// Host to try; repeat or comma-separate for several (tried in order)
    #[arg(long = "host", env = "LANGFUSE_HOSTS", value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// Single host, used when no --host is given
    #[arg(long, env = "LANGFUSE_BASE_URL")]
    pub base_url: Option<String>,

    /// Endpoint path to try per host; repeat or comma-separate for several
    #[arg(long = "endpoint", env = "LANGFUSE_ENDPOINTS", value_delimiter = ',')]
    pub endpoints: Vec<String>,

    /// Authentication style: sdk, basic or header
    #[arg(long = "auth", env = "LANGFUSE_AUTH_STYLE")]
    pub auth_style: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, env = "LANGFUSE_TIMEOUT_SECS")]
    pub timeout_secs: Option<String>,

    /// Characters of content shown per prompt
    #[arg(long, env = "LANGFUSE_PREVIEW_LEN")]
    pub preview_len: Option<String>,

    /// Log every attempt to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Present the parsed arguments under the configuration's variable names
    fn lookup(&self, key: &str) -> Option<String> {
        let join = |values: &[String]| (!values.is_empty()).then(|| values.join(","));
        match key {
            "LANGFUSE_PUBLIC_KEY" => self.public_key.clone(),
            "LANGFUSE_SECRET_KEY" => self.secret_key.clone(),
            "LANGFUSE_LABEL" => self.label.clone(),
            "LANGFUSE_HOSTS" => join(&self.hosts),
            "LANGFUSE_BASE_URL" => self.base_url.clone(),
            "LANGFUSE_ENDPOINTS" => join(&self.endpoints),
            "LANGFUSE_AUTH_STYLE" => self.auth_style.clone(),
            "LANGFUSE_TIMEOUT_SECS" => self.timeout_secs.clone(),
            "LANGFUSE_PREVIEW_LEN" => self.preview_len.clone(),
            _ => None,
        }
    }
}

/// Run one discovery pass, writing the report to `out`
///
/// Returns the process exit status.
pub async fn run<W: Write>(args: &Args, out: W) -> u8 {
    let config = match FetcherConfig::from_lookup(|key| args.lookup(key)) {
        Ok(config) => config,
        Err(e) => return fail(&mut Reporter::new(out, DEFAULT_PREVIEW_LEN), &e),
    };

    let mut reporter = Reporter::new(out, config.preview_len);
    match fetch_and_report(config, &mut reporter).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => fail(&mut reporter, &e),
    }
}

async fn fetch_and_report<W: Write>(
    config: FetcherConfig,
    reporter: &mut Reporter<W>,
) -> Result<(), Error> {
    let fetcher = PromptFetcher::builder().config(config).build()?;

    // Console write failures are not fetch failures.
    reporter.banner(fetcher.config()).ok();
    let outcome = fetcher
        .fetch_with(|event| {
            reporter.event(event).ok();
        })
        .await?;
    reporter.outcome(&outcome, &fetcher.config().label).ok();
    Ok(())
}

fn fail<W: Write>(reporter: &mut Reporter<W>, e: &Error) -> u8 {
    error!("{}", e);
    reporter.failure(e).ok();
    e.exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_joins_repeated_values() {
        let args = Args::try_parse_from([
            "langfuse-prompts",
            "--host",
            "https://a.example",
            "--host",
            "https://b.example",
            "--endpoint",
            "/x,/y",
        ])
        .unwrap();

        assert_eq!(
            args.lookup("LANGFUSE_HOSTS").as_deref(),
            Some("https://a.example,https://b.example")
        );
        assert_eq!(args.lookup("LANGFUSE_ENDPOINTS").as_deref(), Some("/x,/y"));
        assert_eq!(args.lookup("LANGFUSE_UNKNOWN"), None);
    }

    #[test]
    fn test_malformed_values_still_parse() {
        let args = Args::try_parse_from([
            "langfuse-prompts",
            "--timeout-secs",
            "soon",
            "--auth",
            "oauth",
        ])
        .unwrap();
        assert_eq!(args.timeout_secs.as_deref(), Some("soon"));
        assert_eq!(args.auth_style.as_deref(), Some("oauth"));
    }
}
