//! The prompt fetcher: one generic attempt function and the sequential
//! discovery loop over the attempt plan

use bon::bon;
use chrono::{DateTime, Utc};
use langfuse_client_base::apis::configuration::Configuration;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::AuthStyle;
use crate::candidate::Candidate;
use crate::config::FetcherConfig;
use crate::error::{
    classify_middleware, classify_status, classify_transport, AttemptFailure, Error, FailureKind,
    Result,
};
use crate::normalize::PromptRecord;
use crate::response::{parse_prompt_list, prompt_list_from_value};
use crate::security::Redactor;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Outcome of a single attempt
#[derive(Debug)]
pub enum AttemptResult {
    Success(Vec<Value>),
    Failure(AttemptFailure),
}

/// Progress notifications emitted while walking the plan
#[derive(Debug, Clone, Copy)]
pub enum FetchEvent<'a> {
    Attempting {
        /// Zero-based position in the plan
        index: usize,
        total: usize,
        candidate: &'a Candidate,
    },
    Failed(&'a AttemptFailure),
    Succeeded {
        candidate: &'a Candidate,
        count: usize,
    },
}

/// A successful discovery pass
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The candidate that answered
    pub candidate: Candidate,
    /// Raw prompt objects, exactly as returned
    pub prompts: Vec<Value>,
    /// Failures of the candidates tried before the successful one
    pub diagnostics: Vec<AttemptFailure>,
    pub fetched_at: DateTime<Utc>,
}

impl FetchOutcome {
    pub fn records(&self) -> Vec<PromptRecord> {
        self.prompts.iter().map(PromptRecord::from_value).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

/// Fetches the prompt list by trying each candidate in order
pub struct PromptFetcher {
    config: FetcherConfig,
    /// Shared by the raw HTTP styles and the generated API client
    http: ClientWithMiddleware,
    redactor: Redactor,
}

#[bon]
impl PromptFetcher {
    /// Build a fetcher. The configuration is validated first.
    ///
    /// Pass `http_client` to add middleware (logging, custom TLS). It is used by
    /// every auth style. The per-attempt timeout is applied to raw requests either way.
    #[builder]
    pub fn new(config: FetcherConfig, http_client: Option<ClientWithMiddleware>) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| Error::ClientUnavailable(e.to_string()))?;

        let http = http_client
            .unwrap_or_else(|| reqwest_middleware::ClientBuilder::new(client).build());
        let redactor = Redactor::new().with_secret(&config.secret_key);

        Ok(Self {
            config,
            http,
            redactor,
        })
    }
}

impl PromptFetcher {
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// The ordered candidates this fetcher will try
    pub fn plan(&self) -> Vec<Candidate> {
        Candidate::plan(&self.config)
    }

    /// Walk the plan and return the first successful prompt list
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        self.fetch_with(|_| {}).await
    }

    /// Like [`fetch`](Self::fetch), reporting progress to `observer`
    ///
    /// Candidates are tried strictly one after another. The first success
    /// ends the walk; every failure before it is kept as a diagnostic.
    pub async fn fetch_with<F>(&self, mut observer: F) -> Result<FetchOutcome>
    where
        F: FnMut(FetchEvent<'_>),
    {
        let plan = self.plan();
        let total = plan.len();
        let mut diagnostics = Vec::with_capacity(total);

        for (index, candidate) in plan.into_iter().enumerate() {
            observer(FetchEvent::Attempting {
                index,
                total,
                candidate: &candidate,
            });
            debug!(%candidate, attempt = index + 1, total, "Trying candidate");

            match self.attempt(&candidate).await {
                AttemptResult::Success(prompts) => {
                    info!(%candidate, count = prompts.len(), "Fetched prompts");
                    observer(FetchEvent::Succeeded {
                        candidate: &candidate,
                        count: prompts.len(),
                    });
                    return Ok(FetchOutcome {
                        candidate,
                        prompts,
                        diagnostics,
                        fetched_at: Utc::now(),
                    });
                }
                AttemptResult::Failure(failure) => {
                    warn!(candidate = %failure.candidate, status = ?failure.status(), "{}", failure.kind);
                    observer(FetchEvent::Failed(&failure));
                    diagnostics.push(failure);
                }
            }
        }

        Err(Error::Exhausted { diagnostics })
    }

    /// Issue exactly one request for `candidate`
    pub async fn attempt(&self, candidate: &Candidate) -> AttemptResult {
        match candidate.auth {
            AuthStyle::Sdk => self.attempt_sdk(candidate).await,
            AuthStyle::Basic | AuthStyle::Header => self.attempt_http(candidate).await,
        }
    }

    async fn attempt_http(&self, candidate: &Candidate) -> AttemptResult {
        let request = self
            .http
            .get(candidate.url())
            .query(&[("label", self.config.label.as_str())])
            .timeout(self.config.timeout);
        let request =
            candidate
                .auth
                .apply(request, &self.config.public_key, &self.config.secret_key);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return self.failure(candidate, classify_middleware(&e), None),
        };

        let status = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return self.failure(candidate, classify_transport(&e), request_id),
        };

        if status != 200 {
            let body = self.redactor.redact(&body);
            return self.failure(candidate, classify_status(status, &body), request_id);
        }

        match parse_prompt_list(&body) {
            Ok(prompts) => AttemptResult::Success(prompts),
            Err(reason) => self.failure(candidate, FailureKind::Malformed(reason), request_id),
        }
    }

    async fn attempt_sdk(&self, candidate: &Candidate) -> AttemptResult {
        use langfuse_client_base::apis::{prompts_api, Error as ApiError};

        let configuration = self.sdk_configuration(&candidate.host);
        let result = prompts_api::prompts_list()
            .configuration(&configuration)
            .label(self.config.label.as_str())
            .call()
            .await;

        let kind = match result {
            Ok(list) => {
                return match serde_json::to_value(list)
                    .map_err(|e| e.to_string())
                    .and_then(prompt_list_from_value)
                {
                    Ok(prompts) => AttemptResult::Success(prompts),
                    Err(reason) => self.failure(candidate, FailureKind::Malformed(reason), None),
                };
            }
            Err(ApiError::ResponseError(content)) => {
                let body = self.redactor.redact(&content.content);
                classify_status(content.status.as_u16(), &body)
            }
            Err(ApiError::Reqwest(e)) => classify_transport(&e),
            Err(ApiError::ReqwestMiddleware(e)) => classify_middleware(&e),
            Err(ApiError::Serde(e)) => FailureKind::Malformed(e.to_string()),
            Err(other) => FailureKind::Transport(other.to_string()),
        };

        self.failure(candidate, kind, None)
    }

    fn sdk_configuration(&self, host: &str) -> Configuration {
        Configuration {
            base_path: host.to_string(),
            user_agent: Some(self.config.user_agent.clone()),
            client: self.http.clone(),
            basic_auth: Some((
                self.config.public_key.clone(),
                Some(self.config.secret_key.expose_secret().to_string()),
            )),
            ..Configuration::default()
        }
    }

    fn failure(
        &self,
        candidate: &Candidate,
        kind: FailureKind,
        request_id: Option<String>,
    ) -> AttemptResult {
        let kind = match kind {
            FailureKind::Transport(message) => FailureKind::Transport(self.redactor.redact(&message)),
            other => other,
        };
        AttemptResult::Failure(AttemptFailure::new(candidate.clone(), kind).with_request_id(request_id))
    }
}
