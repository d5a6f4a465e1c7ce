//! Site membership lookup client
//!
//! Asks the membership service whether a Wikidot user currently belongs
//! to the configured site. This is independent of the linking protocol;
//! only the boolean answer is consumed.

use std::time::Duration;

use async_trait::async_trait;
use linker_core::membership::ports::MembershipClient;
use linker_domain::{LinkerError, MembershipConfig, Result};
use reqwest::Method;
use serde::Deserialize;

use crate::http::HttpClient;

/// Client for the external membership lookup service
pub struct WikidotMembershipClient {
    http: HttpClient,
    api_url: String,
}

#[derive(Deserialize)]
struct MembershipResponse {
    is_member: bool,
}

impl WikidotMembershipClient {
    /// Create a client from the membership service configuration.
    pub fn new(config: &MembershipConfig) -> Result<Self> {
        let http =
            HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;

        Ok(Self { http, api_url: config.api_url.clone() })
    }
}

#[async_trait]
impl MembershipClient for WikidotMembershipClient {
    async fn is_site_member(&self, wikidot_id: i64, username: &str) -> Result<bool> {
        let request = self
            .http
            .request(Method::GET, &self.api_url)
            .query(&[("user_id", wikidot_id.to_string().as_str()), ("username", username)]);

        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkerError::Network(format!("membership service returned {status}")));
        }

        let data: MembershipResponse = response.json().await.map_err(|err| {
            LinkerError::Network(format!("malformed membership response: {err}"))
        })?;

        Ok(data.is_member)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(api_url: &str) -> MembershipConfig {
        MembershipConfig { api_url: api_url.to_string(), timeout_secs: 5 }
    }

    #[tokio::test]
    async fn member_answer_is_true() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("user_id", "7777"))
            .and(query_param("username", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"is_member": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = WikidotMembershipClient::new(&config(&server.uri())).expect("client");
        assert!(client.is_site_member(7777, "alice").await.expect("lookup"));
    }

    #[tokio::test]
    async fn non_member_answer_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"is_member": false})))
            .mount(&server)
            .await;

        let client = WikidotMembershipClient::new(&config(&server.uri())).expect("client");
        assert!(!client.is_site_member(7777, "alice").await.expect("lookup"));
    }

    #[tokio::test]
    async fn service_failure_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

        let client = WikidotMembershipClient::new(&config(&server.uri())).expect("client");
        let err = client.is_site_member(7777, "alice").await.unwrap_err();
        assert!(matches!(err, LinkerError::Network(_)));
    }
}
