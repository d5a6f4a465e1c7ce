//! Identity provider client for the authorization-code + PKCE exchange
//!
//! The provider's `/user` endpoint takes the client credentials, the
//! authorization code and the PKCE verifier in one JSON body and answers
//! with the authenticated Wikidot identity. Non-success responses and
//! timeouts both surface as `UpstreamExchange`; the upstream body is only
//! logged.

use std::time::Duration;

use async_trait::async_trait;
use linker_core::linking::ports::IdentityProvider;
use linker_domain::{AuthConfig, LinkerError, Result, WikidotProfile};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::http::HttpClient;

/// Client for the external identity provider
pub struct WikidotAuthClient {
    http: HttpClient,
    exchange_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

#[derive(Serialize)]
struct ExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    code_verifier: &'a str,
    grant_type: &'a str,
    redirect_uri: &'a str,
}

#[derive(Deserialize)]
struct ExchangeResponse {
    id: i64,
    name: String,
    unix_name: String,
}

impl WikidotAuthClient {
    /// Create a client from the provider configuration.
    ///
    /// The exchange is a single attempt with an explicit timeout; an
    /// authorization code is not worth replaying against a slow provider.
    pub fn new(config: &AuthConfig, redirect_uri: String) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.exchange_timeout_secs))
            .max_attempts(1)
            .build()?;

        Ok(Self {
            http,
            exchange_url: config.exchange_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri,
        })
    }
}

#[async_trait]
impl IdentityProvider for WikidotAuthClient {
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<WikidotProfile> {
        let body = ExchangeRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code,
            code_verifier,
            grant_type: "authorization_code",
            redirect_uri: &self.redirect_uri,
        };

        let request = self.http.request(Method::POST, &self.exchange_url).json(&body);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| LinkerError::UpstreamExchange(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let upstream_body = response.text().await.unwrap_or_default();
            warn!(%status, body = %upstream_body, "identity provider rejected code exchange");
            return Err(LinkerError::UpstreamExchange(format!("provider returned {status}")));
        }

        let data: ExchangeResponse = response
            .json()
            .await
            .map_err(|err| LinkerError::UpstreamExchange(format!("malformed provider response: {err}")))?;

        Ok(WikidotProfile { id: data.id, username: data.name, unix_name: data.unix_name })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(api_url: &str, timeout_secs: u64) -> AuthConfig {
        AuthConfig {
            api_url: api_url.to_string(),
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            scope: "identify".into(),
            exchange_timeout_secs: timeout_secs,
        }
    }

    #[tokio::test]
    async fn successful_exchange_maps_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .and(body_partial_json(json!({
                "client_id": "client-123",
                "code": "abc",
                "code_verifier": "verifier",
                "grant_type": "authorization_code",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7777,
                "name": "alice",
                "unix_name": "alice",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            WikidotAuthClient::new(&config(&server.uri(), 5), "https://linker/callback".into())
                .expect("client");
        let profile = client.exchange_code("abc", "verifier").await.expect("profile");

        assert_eq!(profile.id, 7777);
        assert_eq!(profile.username, "alice");
    }

    #[tokio::test]
    async fn non_success_response_is_upstream_exchange_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid code"))
            .mount(&server)
            .await;

        let client =
            WikidotAuthClient::new(&config(&server.uri(), 5), "https://linker/callback".into())
                .expect("client");
        let err = client.exchange_code("abc", "verifier").await.unwrap_err();

        assert!(matches!(err, LinkerError::UpstreamExchange(_)));
    }

    #[tokio::test]
    async fn timeout_is_upstream_exchange_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client =
            WikidotAuthClient::new(&config(&server.uri(), 1), "https://linker/callback".into())
                .expect("client");
        let err = client.exchange_code("abc", "verifier").await.unwrap_err();

        assert!(matches!(err, LinkerError::UpstreamExchange(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_upstream_exchange_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client =
            WikidotAuthClient::new(&config(&server.uri(), 5), "https://linker/callback".into())
                .expect("client");
        let err = client.exchange_code("abc", "verifier").await.unwrap_err();

        assert!(matches!(err, LinkerError::UpstreamExchange(_)));
    }
}
