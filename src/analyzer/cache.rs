//! Advisory on-disk cache for assembled profiles.
//!
//! Entries are keyed by a fingerprint of the source paths and their
//! modification times, so editing a template invalidates its entry without
//! any bookkeeping. The cache only ever accelerates: a missing, stale or
//! corrupt entry falls back to a fresh analysis, and a failed store is
//! logged and forgotten.

use crate::analyzer::error::Result;
use crate::profile::DesignProfile;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

pub struct ProfileCache {
    dir: PathBuf,
}

impl ProfileCache {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the cache directory if it does not exist yet. Idempotent.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Fingerprint a template and optional toolkit by path and mtime.
    pub fn fingerprint(template: &Path, toolkit: Option<&Path>) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(path_stamp(template)?);
        if let Some(toolkit) = toolkit {
            hasher.update(b"|");
            hasher.update(path_stamp(toolkit)?);
        }
        let digest = hasher.finalize();
        Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Load a cached profile, or `None` when no usable entry exists.
    pub fn load(&self, key: &str) -> Option<DesignProfile> {
        let path = self.entry_path(key);
        let data = fs::read(&path).ok()?;
        match serde_json::from_slice(&data) {
            Ok(profile) => {
                debug!(key, "profile cache hit");
                Some(profile)
            },
            Err(err) => {
                warn!(key, error = %err, "discarding corrupt cache entry");
                None
            },
        }
    }

    /// Store a profile best-effort. Failures are logged, never raised.
    pub fn store(&self, key: &str, profile: &DesignProfile) {
        if let Err(err) = self.try_store(key, profile) {
            warn!(key, error = %err, "failed to store profile cache entry");
        }
    }

    fn try_store(&self, key: &str, profile: &DesignProfile) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec_pretty(profile)?;
        fs::write(self.entry_path(key), data)?;
        Ok(())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// `path|secs.nanos` for one file, the unit the fingerprint hashes.
fn path_stamp(path: &Path) -> Result<String> {
    let mtime = fs::metadata(path)?.modified()?;
    let elapsed = mtime
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok(format!(
        "{}|{}.{:09}",
        path.display(),
        elapsed.as_secs(),
        elapsed.subsec_nanos()
    ))
}
