//! Integration tests against a real Langfuse project

use langfuse_prompt_fetch::{AuthStyle, FetcherConfig, PromptFetcher};

/// Helper to create a fetcher from environment variables
fn create_test_fetcher(auth: Option<AuthStyle>) -> PromptFetcher {
    dotenvy::dotenv().ok();
    let mut config = FetcherConfig::from_env().expect("Failed to read config from environment");
    if let Some(auth) = auth {
        config.auth_style = auth;
        config.endpoints = langfuse_prompt_fetch::config::default_endpoints(auth);
    }

    PromptFetcher::builder()
        .config(config)
        .build()
        .expect("Failed to create fetcher")
}

#[tokio::test]
#[ignore = "requires Langfuse API credentials"]
async fn test_fetch_with_basic_auth() {
    let fetcher = create_test_fetcher(Some(AuthStyle::Basic));

    let result = fetcher.fetch().await;
    assert!(result.is_ok(), "Failed to fetch prompts: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires Langfuse API credentials"]
async fn test_fetch_with_sdk() {
    let fetcher = create_test_fetcher(Some(AuthStyle::Sdk));

    let outcome = fetcher.fetch().await.expect("Failed to fetch prompts");
    for record in outcome.records() {
        assert!(!record.name.is_empty());
    }
}
