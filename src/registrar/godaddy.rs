//! GoDaddy registrar client.

use super::{target_name, DnsRecord, RegistrarClient};
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::time::Duration;

const GODADDY_API: &str = "https://api.godaddy.com";

/// GoDaddy DNS record API client.
pub struct GoDaddyClient {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct UpdateRecord {
    data: String,
    ttl: u32,
}

impl GoDaddyClient {
    /// Create a client against the production GoDaddy API.
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self::with_base_url(api_key, api_secret, GODADDY_API.to_string())
    }

    /// Create a client against a custom base URL (for tests).
    pub fn with_base_url(api_key: String, api_secret: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            api_secret,
            base_url,
        }
    }

    fn record_url(&self, domain: &str, subdomain: &str) -> String {
        format!(
            "{}/v1/domains/{}/records/A/{}",
            self.base_url, domain, subdomain
        )
    }

    fn auth_header(&self) -> String {
        format!("sso-key {}:{}", self.api_key, self.api_secret)
    }
}

async fn registrar_error(target: &str, response: reqwest::Response) -> DdnsError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    DdnsError::Registrar {
        target: target.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl RegistrarClient for GoDaddyClient {
    async fn get_record(&self, domain: &str, subdomain: &str) -> Result<Option<DnsRecord>> {
        let url = self.record_url(domain, subdomain);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(registrar_error(&target_name(domain, subdomain), response).await);
        }

        let mut records: Vec<DnsRecord> = response.json().await.map_err(|e| {
            DdnsError::Network(format!(
                "Unparsable record response for {}: {}",
                target_name(domain, subdomain),
                e
            ))
        })?;

        tracing::debug!(
            "<{}> currently holds {:?}",
            target_name(domain, subdomain),
            records
        );

        if records.is_empty() {
            Ok(None)
        } else {
            Ok(Some(records.remove(0)))
        }
    }

    async fn put_record(
        &self,
        domain: &str,
        subdomain: &str,
        ip: Ipv4Addr,
        ttl: u32,
    ) -> Result<()> {
        let url = self.record_url(domain, subdomain);
        let records = vec![UpdateRecord {
            data: ip.to_string(),
            ttl,
        }];

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Content-Type", "application/json")
            .json(&records)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(registrar_error(&target_name(domain, subdomain), response).await);
        }

        tracing::debug!(
            "Updated A record of <{}> to {}",
            target_name(domain, subdomain),
            ip
        );
        Ok(())
    }
}
