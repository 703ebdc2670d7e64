//! Public IP detection.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Source of the machine's current public IPv4 address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicIpSource: Send + Sync {
    /// Detect the current public IPv4 address.
    async fn current_ipv4(&self) -> Result<Ipv4Addr>;
}

/// IP detector backed by plain-text address-echo services, with fallback.
pub struct IpDetector {
    client: reqwest::Client,
    services: Vec<String>,
}

impl IpDetector {
    /// Create a new IP detector with the given echo services.
    pub fn new(services: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, services }
    }

    /// Try a single address-echo service. The body is the address,
    /// possibly surrounded by whitespace; take the first token.
    async fn try_service(&self, url: &str) -> Result<Ipv4Addr> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::IpDetection(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let ip_str = text
            .split_whitespace()
            .next()
            .ok_or_else(|| DdnsError::IpDetection(format!("Empty response from {}", url)))?;

        ip_str
            .parse()
            .map_err(|_| DdnsError::IpDetection(format!("Invalid IPv4 response: {}", ip_str)))
    }
}

#[async_trait]
impl PublicIpSource for IpDetector {
    async fn current_ipv4(&self) -> Result<Ipv4Addr> {
        for service in &self.services {
            match self.try_service(service).await {
                Ok(ip) => {
                    tracing::debug!("Detected IPv4 {} from {}", ip, service);
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("Service {} failed: {}", service, e);
                }
            }
        }

        Err(DdnsError::IpDetection(
            "All IP detection services failed".to_string(),
        ))
    }
}
