//! Bulk submission of generated peers to the dashboard API.
//!
//! The remote call sits behind [`PeerTransport`] so the outcome handling can
//! be driven by a fake in tests. [`MerakiClient`] is the real transport.

use async_trait::async_trait;
use log::{error, info};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;

use crate::types::Payload;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Status and raw body of the API's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { status: u16 },
    Rejected { status: u16, body: String },
    TransportFailed(String),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

#[async_trait]
pub trait PeerTransport {
    /// Replaces every third-party VPN peer of the organization with `payload`.
    async fn put_peers(&self, payload: &Payload) -> Result<RemoteResponse, TransportError>;
}

/// Sends `payload` once and reports how it went. Never retries.
pub async fn submit<T: PeerTransport + ?Sized>(transport: &T, payload: &Payload) -> SubmitOutcome {
    info!("Submitting {} peers", payload.peers.len());

    let response = match transport.put_peers(payload).await {
        Ok(response) => response,
        Err(e) => {
            error!("Request failed: {}", e);
            return SubmitOutcome::TransportFailed(e.to_string());
        }
    };

    info!("Status Code: {}", response.status);
    match response.status {
        200 | 201 => {
            info!("VPN peers created successfully");
            SubmitOutcome::Accepted {
                status: response.status,
            }
        }
        status => {
            error!("Error creating VPN peers: {}", response.body);
            SubmitOutcome::Rejected {
                status,
                body: response.body,
            }
        }
    }
}

/// Dashboard API client for the organization-wide third-party VPN peer list.
pub struct MerakiClient {
    base_url: String,
    org_id: String,
    api_key: String,
    client: Client,
}

impl MerakiClient {
    pub fn new(base_url: &str, org_id: String, api_key: String) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(base_url, org_id, api_key, client))
    }

    pub fn with_client(base_url: &str, org_id: String, api_key: String, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            org_id,
            api_key,
            client,
        }
    }

    fn peers_url(&self) -> String {
        format!(
            "{}/organizations/{}/appliance/vpn/thirdPartyVPNPeers",
            self.base_url, self.org_id
        )
    }
}

#[async_trait]
impl PeerTransport for MerakiClient {
    async fn put_peers(&self, payload: &Payload) -> Result<RemoteResponse, TransportError> {
        let body = serde_json::to_vec(payload)?;
        info!("Content-Length in request: {} bytes", body.len());

        let resp = self
            .client
            .put(self.peers_url())
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok(RemoteResponse { status, body })
    }
}
