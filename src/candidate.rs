//! Attempt descriptors and the ordered attempt plan

use std::fmt;

use crate::auth::AuthStyle;
use crate::config::FetcherConfig;

/// One `(host, endpoint, auth style)` combination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub host: String,
    /// Path suffix; empty for [`AuthStyle::Sdk`]
    pub endpoint: String,
    pub auth: AuthStyle,
}

impl Candidate {
    pub fn new(host: impl Into<String>, endpoint: impl Into<String>, auth: AuthStyle) -> Self {
        Self {
            host: host.into(),
            endpoint: endpoint.into(),
            auth,
        }
    }

    /// Full request URL without the label query
    pub fn url(&self) -> String {
        format!("{}{}", self.host, self.endpoint)
    }

    /// Build the attempt plan: every host in order, and for each host every
    /// endpoint in order. The SDK style owns its path, so it gets one
    /// candidate per host.
    pub fn plan(config: &FetcherConfig) -> Vec<Candidate> {
        let auth = config.auth_style;
        let mut plan = Vec::new();

        for host in &config.hosts {
            if auth.uses_endpoints() {
                for endpoint in &config.endpoints {
                    plan.push(Candidate::new(host.clone(), endpoint.clone(), auth));
                }
            } else {
                plan.push(Candidate::new(host.clone(), String::new(), auth));
            }
        }

        plan
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.endpoint.is_empty() {
            write!(f, "{} [{}]", self.host, self.auth)
        } else {
            write!(f, "{}{} [{}]", self.host, self.endpoint, self.auth)
        }
    }
}
