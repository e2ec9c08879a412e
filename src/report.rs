//! Human-readable console report

use std::io::{self, Write};

use crate::client::{FetchEvent, FetchOutcome};
use crate::config::FetcherConfig;
use crate::error::Error;
use crate::normalize::PromptRecord;

const RULE_WIDTH: usize = 60;
const NOT_AVAILABLE: &str = "[not available]";
const NO_LABELS: &str = "none";

/// Writes the banner, progress lines, prompt blocks and final status
pub struct Reporter<W: Write> {
    out: W,
    preview_len: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, preview_len: usize) -> Self {
        Self { out, preview_len }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self, config: &FetcherConfig) -> io::Result<()> {
        writeln!(
            self.out,
            "Connecting to Langfuse ({} auth, label '{}')...",
            config.auth_style, config.label
        )?;
        writeln!(self.out, "Hosts: {}", config.hosts.join(", "))?;
        writeln!(self.out)
    }

    pub fn event(&mut self, event: FetchEvent<'_>) -> io::Result<()> {
        match event {
            FetchEvent::Attempting {
                index,
                total,
                candidate,
            } => writeln!(self.out, "[{}/{}] Trying {}", index + 1, total, candidate),
            FetchEvent::Failed(failure) => writeln!(self.out, "      failed: {}", failure.kind),
            FetchEvent::Succeeded { candidate, .. } => {
                writeln!(self.out, "Connected to {}", candidate)?;
                writeln!(self.out)
            }
        }
    }

    pub fn outcome(&mut self, outcome: &FetchOutcome, label: &str) -> io::Result<()> {
        if outcome.is_empty() {
            writeln!(self.out, "No prompts found. Check that:")?;
            writeln!(self.out, "   1. prompts exist in the Langfuse project")?;
            writeln!(self.out, "   2. prompts carry the '{}' label", label)?;
            writeln!(self.out)?;
            return writeln!(self.out, "Done (0 prompts).");
        }

        writeln!(
            self.out,
            "Found {} prompt(s) at {}",
            outcome.prompts.len(),
            outcome.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;

        for (i, record) in outcome.records().iter().enumerate() {
            self.record(i + 1, record)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "Done.")
    }

    pub fn record(&mut self, position: usize, record: &PromptRecord) -> io::Result<()> {
        let labels = if record.labels.is_empty() {
            NO_LABELS.to_string()
        } else {
            record.labels.join(", ")
        };
        let preview = record
            .preview(self.preview_len)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        writeln!(self.out)?;
        writeln!(self.out, "Prompt #{}: {}", position, record.name)?;
        writeln!(self.out, "   Type:    {}", record.prompt_type)?;
        writeln!(self.out, "   Labels:  {}", labels)?;
        writeln!(self.out, "   Version: {}", record.version)?;
        writeln!(self.out, "   Content: {}", preview)?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))
    }

    pub fn failure(&mut self, error: &Error) -> io::Result<()> {
        match error {
            Error::Exhausted { diagnostics } => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "Could not fetch prompts from any of {} candidate(s):",
                    diagnostics.len()
                )?;
                for failure in diagnostics {
                    writeln!(self.out, "   - {}", failure)?;
                }
                writeln!(self.out)?;
                writeln!(self.out, "Possible causes:")?;
                if diagnostics.iter().any(|d| d.is_auth()) {
                    writeln!(self.out, "   - wrong API keys, or the wrong auth style for this deployment")?;
                }
                writeln!(self.out, "   - wrong region or host")?;
                writeln!(self.out, "   - network problems")?;
                Ok(())
            }
            other => writeln!(self.out, "Error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthStyle;
    use crate::candidate::Candidate;
    use crate::error::{AttemptFailure, FailureKind};
    use chrono::Utc;
    use serde_json::json;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>,
    {
        let mut reporter = Reporter::new(Vec::new(), 10);
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn outcome(prompts: Vec<serde_json::Value>) -> FetchOutcome {
        FetchOutcome {
            candidate: Candidate::new("https://a.example", "/api/public/prompts", AuthStyle::Basic),
            prompts,
            diagnostics: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_block() {
        let text = render(|r| {
            r.outcome(
                &outcome(vec![json!({
                    "name": "greeting",
                    "type": "text",
                    "labels": "production",
                    "version": 1,
                    "prompt": "Hello there, how are you?"
                })]),
                "production",
            )
        });

        assert!(text.contains("Found 1 prompt(s)"));
        assert!(text.contains("Prompt #1: greeting"));
        assert!(text.contains("Labels:  production"));
        assert!(text.contains("Version: 1"));
        assert!(text.contains("Content: Hello ther..."));
        assert!(text.ends_with("Done.\n"));
    }

    #[test]
    fn test_missing_fields_render_placeholders() {
        let text = render(|r| r.outcome(&outcome(vec![json!({})]), "production"));
        assert!(text.contains("Prompt #1: untitled"));
        assert!(text.contains("Labels:  none"));
        assert!(text.contains("Version: N/A"));
        assert!(text.contains("Content: [not available]"));
    }

    #[test]
    fn test_zero_prompts_hint() {
        let text = render(|r| r.outcome(&outcome(vec![]), "staging"));
        assert!(text.contains("No prompts found"));
        assert!(text.contains("'staging' label"));
        assert!(text.contains("Done (0 prompts)."));
    }

    #[test]
    fn test_exhausted_lists_every_diagnostic() {
        let candidate = Candidate::new("https://a.example", "/p", AuthStyle::Header);
        let error = Error::Exhausted {
            diagnostics: vec![
                AttemptFailure::new(
                    candidate.clone(),
                    FailureKind::Auth {
                        status: 401,
                        message: "Unauthorized".to_string(),
                    },
                ),
                AttemptFailure::new(candidate, FailureKind::Timeout),
            ],
        };

        let text = render(|r| r.failure(&error));
        assert!(text.contains("any of 2 candidate(s)"));
        assert!(text.contains("status 401"));
        assert!(text.contains("timed out"));
        assert!(text.contains("wrong API keys"));
    }

    #[test]
    fn test_progress_lines() {
        let candidate = Candidate::new("https://a.example", "/p", AuthStyle::Basic);
        let text = render(|r| {
            r.event(FetchEvent::Attempting {
                index: 0,
                total: 2,
                candidate: &candidate,
            })?;
            r.event(FetchEvent::Succeeded {
                candidate: &candidate,
                count: 3,
            })
        });
        assert!(text.starts_with("[1/2] Trying https://a.example/p [basic]"));
        assert!(text.contains("Connected to https://a.example/p [basic]"));
    }
}
