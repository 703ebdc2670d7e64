//! Registrar API clients.

mod godaddy;
#[cfg(test)]
mod tests;

pub use godaddy::GoDaddyClient;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// One A record as the registrar currently holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record value (the address, as the registrar sent it).
    pub data: String,
    /// Time-to-live in seconds.
    pub ttl: u32,
}

impl DnsRecord {
    /// The record's address, if it parses as IPv4. A record holding
    /// something unparsable compares as a mismatch and gets overwritten.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.data.parse().ok()
    }
}

/// Fallible remote calls against the registrar's record API. No implicit
/// retries: a failure is reported up to the engine's failure policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrarClient: Send + Sync {
    /// Fetch the current A record for a (domain, subdomain) pair.
    /// `Ok(None)` means the record does not exist yet.
    async fn get_record(&self, domain: &str, subdomain: &str) -> Result<Option<DnsRecord>>;

    /// Overwrite the A record for a (domain, subdomain) pair.
    async fn put_record(
        &self,
        domain: &str,
        subdomain: &str,
        ip: Ipv4Addr,
        ttl: u32,
    ) -> Result<()>;
}

/// Display form of a target, `www.example.com` or bare `example.com`
/// for the zone apex.
pub fn target_name(domain: &str, subdomain: &str) -> String {
    if subdomain == "@" {
        domain.to_string()
    } else {
        format!("{}.{}", subdomain, domain)
    }
}
