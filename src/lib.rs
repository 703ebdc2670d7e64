//! # ddns-daddy
//!
//! A minimal GoDaddy Dynamic DNS client written in Rust.
//!
//! Keeps a configured set of DNS A records pointed at this machine's
//! current public IPv4 address. Designed to run once per invocation under
//! an external scheduler (cron, systemd timer); a persisted last-IP cache
//! makes repeated runs cheap when the address has not changed.
//!
//! ## Usage
//!
//! ```bash
//! # One synchronization pass
//! ddns-daddy sync
//!
//! # Reconcile even if the cached IP matches
//! ddns-daddy sync --force
//!
//! # Show the detected IP and each record's current value
//! ddns-daddy status
//!
//! # Check configuration and credentials
//! ddns-daddy validate
//! ```

pub mod cache;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod registrar;

pub use cache::IpCache;
pub use config::Config;
pub use detector::IpDetector;
pub use engine::{SyncEngine, SyncReport};
pub use error::{DdnsError, Result};
