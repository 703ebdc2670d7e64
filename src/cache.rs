//! Last-synchronized IP cache.
//!
//! One dotfile holding the last IPv4 address that was pushed to every
//! configured record. Reading it back on the next run lets the engine
//! skip the registrar entirely when the public IP has not moved.

use crate::error::{DdnsError, Result};
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Default cache file name, placed in the user's home directory.
pub const DEFAULT_CACHE_FILE: &str = ".go-ddns-daddy-rc";

/// File-backed single-value cache of the last synchronized IP.
pub struct IpCache {
    path: PathBuf,
}

impl IpCache {
    /// Cache at the default location (`~/.go-ddns-daddy-rc`).
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| DdnsError::Cache("Could not find home directory".to_string()))?;
        Ok(Self::at_path(home.join(DEFAULT_CACHE_FILE)))
    }

    /// Cache at a specific path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the last synchronized IP. A missing file is a normal first
    /// run, not an error. Unparsable contents are treated the same way:
    /// the safe direction is a full sync.
    pub fn load(&self) -> Result<Option<Ipv4Addr>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Did not find last IP at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(DdnsError::Cache(format!(
                    "Could not read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let first_line = content.lines().next().unwrap_or("").trim();
        match first_line.parse() {
            Ok(ip) => Ok(Some(ip)),
            Err(_) => {
                tracing::warn!(
                    "Cache file {} holds unparsable contents; forcing full sync",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    /// Persist the last synchronized IP. Writes to a sibling temp file
    /// and renames it into place so an interrupted write can never leave
    /// a truncated value behind.
    pub fn save(&self, ip: Ipv4Addr) -> Result<()> {
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = std::fs::File::create(&temp_path).map_err(|e| {
                DdnsError::Cache(format!("Could not create {}: {}", temp_path.display(), e))
            })?;
            write!(file, "{}", ip)
                .and_then(|_| file.flush())
                .map_err(|e| {
                    DdnsError::Cache(format!("Could not write {}: {}", temp_path.display(), e))
                })?;
        }

        std::fs::rename(&temp_path, &self.path).map_err(|e| {
            DdnsError::Cache(format!(
                "Could not move {} into place: {}",
                temp_path.display(),
                e
            ))
        })?;

        tracing::debug!("Recorded {} as last synchronized IP", ip);
        Ok(())
    }

    /// Path this cache reads and writes.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let cache = IpCache::at_path(dir.path().join("last-ip"));
        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last-ip");

        let cache = IpCache::at_path(path.clone());
        let ip = Ipv4Addr::new(5, 6, 7, 8);
        cache.save(ip).unwrap();

        // A fresh instance simulates a process restart.
        let cache2 = IpCache::at_path(path);
        assert_eq!(cache2.load().unwrap(), Some(ip));
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let cache = IpCache::at_path(dir.path().join("last-ip"));

        cache.save(Ipv4Addr::new(1, 1, 1, 1)).unwrap();
        cache.save(Ipv4Addr::new(2, 2, 2, 2)).unwrap();

        assert_eq!(cache.load().unwrap(), Some(Ipv4Addr::new(2, 2, 2, 2)));
    }

    #[test]
    fn test_load_tolerates_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last-ip");
        std::fs::write(&path, "9.8.7.6\n").unwrap();

        let cache = IpCache::at_path(path);
        assert_eq!(cache.load().unwrap(), Some(Ipv4Addr::new(9, 8, 7, 6)));
    }

    #[test]
    fn test_load_garbage_forces_full_sync() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last-ip");
        std::fs::write(&path, "definitely not an ip").unwrap();

        let cache = IpCache::at_path(path);
        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last-ip");

        let cache = IpCache::at_path(path.clone());
        cache.save(Ipv4Addr::new(1, 2, 3, 4)).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
