//! Synchronization engine.
//!
//! One `run()` is one full pass: resolve the public IP, compare against
//! the cached last-synced IP, and only when they differ reconcile every
//! configured record against the new address. The registrar is never
//! touched when the IP has not moved, which is the overwhelming common
//! case under a periodic scheduler.
//!
//! Failure policy: abort on the first per-target failure and leave the
//! cache unwritten, so the next run retries every target from scratch.
//! There is no silent partial success.

use crate::cache::IpCache;
use crate::detector::PublicIpSource;
use crate::error::Result;
use crate::registrar::{target_name, RegistrarClient};
use std::net::Ipv4Addr;

/// What one run did overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Public IP matched the cache; nothing was touched.
    Unchanged,
    /// Every target was reconciled and the cache was updated.
    Synced,
}

/// What happened to one target during a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The remote record was rewritten to the current IP.
    Updated,
    /// The remote record already held the current IP; no write issued.
    AlreadyCurrent,
}

/// Per-target result of a sync pass.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub domain: String,
    pub subdomain: String,
    pub disposition: Disposition,
}

impl TargetReport {
    /// Display name, `www.example.com` or the bare domain for the apex.
    pub fn name(&self) -> String {
        target_name(&self.domain, &self.subdomain)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Public IP this run resolved.
    pub current_ip: Ipv4Addr,
    /// Cached IP from the previous run, if any.
    pub previous_ip: Option<Ipv4Addr>,
    pub outcome: Outcome,
    /// Per-target dispositions; empty when the run short-circuited.
    pub targets: Vec<TargetReport>,
}

/// Drives reconciliation of all configured records against the current
/// public IP, keeping the last-synced cache coherent.
pub struct SyncEngine {
    resolver: Box<dyn PublicIpSource>,
    cache: IpCache,
    registrar: Box<dyn RegistrarClient>,
    targets: Vec<(String, String)>,
    ttl: u32,
}

impl SyncEngine {
    /// Create an engine over explicit collaborators. `targets` must
    /// already be in the order reconciliation should happen.
    pub fn new(
        resolver: Box<dyn PublicIpSource>,
        cache: IpCache,
        registrar: Box<dyn RegistrarClient>,
        targets: Vec<(String, String)>,
        ttl: u32,
    ) -> Self {
        Self {
            resolver,
            cache,
            registrar,
            targets,
            ttl,
        }
    }

    /// One synchronization pass. `force` skips the cached-IP comparison
    /// and reconciles every target; per-record skips still apply.
    pub async fn run(&self, force: bool) -> Result<SyncReport> {
        let current_ip = self.resolver.current_ipv4().await?;
        let previous_ip = self.cache.load()?;

        if let Some(last_ip) = previous_ip {
            tracing::info!("Last recorded IP is {}", last_ip);
            if !force && last_ip == current_ip {
                tracing::info!("Public IP {} unchanged; nothing to do", current_ip);
                return Ok(SyncReport {
                    current_ip,
                    previous_ip,
                    outcome: Outcome::Unchanged,
                    targets: Vec::new(),
                });
            }
        }

        let mut targets = Vec::with_capacity(self.targets.len());
        for (domain, subdomain) in &self.targets {
            let disposition = self.reconcile(domain, subdomain, current_ip).await?;
            targets.push(TargetReport {
                domain: domain.clone(),
                subdomain: subdomain.clone(),
                disposition,
            });
        }

        // Reached only when every target was reconciled: a cache that
        // reads back an IP always refers to a fully attempted sync.
        self.cache.save(current_ip)?;

        Ok(SyncReport {
            current_ip,
            previous_ip,
            outcome: Outcome::Synced,
            targets,
        })
    }

    /// Bring one record in line with `current_ip`, skipping the write
    /// when the registrar already holds the right address. That happens
    /// when a previous run failed partway through, or when the record
    /// was fixed out-of-band.
    async fn reconcile(
        &self,
        domain: &str,
        subdomain: &str,
        current_ip: Ipv4Addr,
    ) -> Result<Disposition> {
        let name = target_name(domain, subdomain);
        tracing::info!("Syncing DNS A record for <{}>", name);

        let record = self.registrar.get_record(domain, subdomain).await?;
        if record.and_then(|r| r.ipv4()) == Some(current_ip) {
            tracing::info!("IP for <{}> is already set; nothing to do", name);
            return Ok(Disposition::AlreadyCurrent);
        }

        self.registrar
            .put_record(domain, subdomain, current_ip, self.ttl)
            .await?;
        Ok(Disposition::Updated)
    }
}
