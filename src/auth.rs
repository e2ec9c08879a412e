//! Authentication styles accepted by Langfuse deployments

use reqwest_middleware::RequestBuilder;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::security::SecretString;

/// Header carrying the secret key for [`AuthStyle::Header`]
pub const SECRET_KEY_HEADER: &str = "X-Langfuse-Secret-Key";

/// How a candidate authenticates against the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthStyle {
    /// Use the generated API client, which sends Basic auth itself
    Sdk,
    /// HTTP Basic auth, public key as user and secret key as password
    #[default]
    Basic,
    /// `Authorization: Bearer <public key>` plus the secret key header
    Header,
}

impl AuthStyle {
    /// Whether this style builds the request URL from the configured endpoints
    pub fn uses_endpoints(&self) -> bool {
        !matches!(self, AuthStyle::Sdk)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStyle::Sdk => "sdk",
            AuthStyle::Basic => "basic",
            AuthStyle::Header => "header",
        }
    }

    /// Attach credentials to a raw HTTP request
    ///
    /// [`AuthStyle::Sdk`] requests never go through here; they are returned unchanged.
    pub(crate) fn apply(
        &self,
        request: RequestBuilder,
        public_key: &str,
        secret_key: &SecretString,
    ) -> RequestBuilder {
        match self {
            AuthStyle::Basic => request.basic_auth(public_key, Some(secret_key.expose_secret())),
            AuthStyle::Header => request
                .bearer_auth(public_key)
                .header(SECRET_KEY_HEADER, secret_key.expose_secret()),
            AuthStyle::Sdk => request,
        }
    }
}

impl fmt::Display for AuthStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sdk" | "client" => Ok(AuthStyle::Sdk),
            "basic" => Ok(AuthStyle::Basic),
            "header" | "bearer" => Ok(AuthStyle::Header),
            other => Err(Error::Configuration(format!(
                "unknown auth style '{}' (expected sdk, basic or header)",
                other
            ))),
        }
    }
}
