//! Bangumi API preflight check.

use super::CheckResult;
use crate::models::config::BangumiConfig;
use crate::services::bangumi::BangumiClient;

const NAME: &str = "Bangumi API";

/// Check if the Bangumi API is reachable and the token, if any, is accepted.
pub async fn check(config: &BangumiConfig) -> CheckResult {
    let (message, hint) = match BangumiClient::new(config.clone()) {
        Err(e) => (
            format!("client setup failed: {}", e),
            Some("Check the [bangumi] section of your config file"),
        ),
        Ok(client) => match (client.verify().await, config.access_token.is_some()) {
            (Ok(true), true) => ("connected (authenticated)".to_string(), None),
            (Ok(true), false) => ("connected".to_string(), None),
            (Ok(false), true) => (
                "invalid access token".to_string(),
                Some("Check your BANGUMI_ACCESS_TOKEN environment variable"),
            ),
            (Ok(false), false) | (Err(_), _) => (
                format!("cannot reach {}", client.base_url()),
                Some("Check your network connection"),
            ),
        },
    };

    CheckResult {
        name: NAME,
        message,
        hint,
    }
}
