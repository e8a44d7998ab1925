//! Quarantine vault facade.
//!
//! A flagged or blocked file is moved (not copied) into the vault root,
//! renamed to its quarantine ID, and stripped down to owner-read-only. A
//! JSON sidecar records enough to restore it later. Restore validates the
//! destination directory (canonical, absolute, a directory, writable),
//! sanitizes the original filename, and avoids clobbering an existing file
//! by appending a `_(n)` suffix, matching the original quarantine
//! manager's behavior.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;

use crate::error::{Result, VaultError};
use crate::ids::{generate_id, validate_id};
use crate::metadata::QuarantineMetadata;

pub struct QuarantineVault {
    root: PathBuf,
}

impl QuarantineVault {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Self::chmod(&root, 0o700).await?;
        Ok(Self { root })
    }

    fn payload_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.bin"))
    }

    fn metadata_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    #[cfg(unix)]
    async fn chmod(path: &Path, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).await?.permissions();
        perms.set_mode(mode);
        fs::set_permissions(path, perms).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn chmod(_path: &Path, _mode: u32) -> Result<()> {
        Ok(())
    }

    /// Moves `source` into the vault, returning the new quarantine ID.
    /// `original_url` and `rule_names` are recorded in the metadata sidecar
    /// alongside the hash and size computed here.
    pub async fn quarantine_file(
        &self,
        source: &Path,
        original_url: impl Into<String>,
        rule_names: Vec<String>,
    ) -> Result<String> {
        let bytes = fs::read(source).await?;
        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        let file_size = bytes.len() as u64;

        let id = generate_id();
        let payload_path = self.payload_path(&id);
        if payload_path.exists() {
            return Err(VaultError::DestinationExists(payload_path.display().to_string()));
        }

        if fs::rename(source, &payload_path).await.is_err() {
            // Cross-device rename isn't atomic but is the only option when
            // the vault lives on a different filesystem than the source.
            fs::copy(source, &payload_path).await?;
            fs::remove_file(source).await?;
        }

        if let Err(e) = Self::chmod(&payload_path, 0o400).await {
            tracing::warn!(quarantine_id = %id, error = %e, "failed to set restrictive permissions on quarantined file");
        }

        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let metadata = QuarantineMetadata {
            original_url: original_url.into(),
            filename,
            detection_time: chrono::Utc::now().to_rfc3339(),
            sha256,
            file_size,
            quarantine_id: id.clone(),
            rule_names,
        };

        let meta_json = serde_json::to_vec_pretty(&metadata)?;
        let metadata_path = self.metadata_path(&id);
        if let Err(e) = fs::write(&metadata_path, meta_json).await {
            // Roll back: the file is quarantined in name only if we can't
            // record where it came from.
            let _ = fs::remove_file(&payload_path).await;
            return Err(e.into());
        }
        if let Err(e) = Self::chmod(&metadata_path, 0o400).await {
            tracing::warn!(quarantine_id = %id, error = %e, "failed to set restrictive permissions on metadata");
        }

        tracing::info!(quarantine_id = %id, original_url = %metadata.original_url, "file quarantined");
        Ok(id)
    }

    pub async fn get_metadata(&self, id: &str) -> Result<QuarantineMetadata> {
        validate_id(id)?;
        let bytes = fs::read(self.metadata_path(id))
            .await
            .map_err(|_| VaultError::NotFound(id.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn list_all_entries(&self) -> Result<Vec<QuarantineMetadata>> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.root).await?;
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(id) = name.strip_suffix(".json") {
                match self.get_metadata(id).await {
                    Ok(metadata) => entries.push(metadata),
                    Err(e) => tracing::warn!(id, error = %e, "skipping invalid quarantine entry"),
                }
            }
        }
        entries.sort_by(|a, b| a.quarantine_id.cmp(&b.quarantine_id));
        Ok(entries)
    }

    /// Resolves `destination_dir` to a canonical, absolute, writable
    /// directory. Unlike a plain existence check, this follows symlinks and
    /// `..` components rather than trusting the caller's literal path.
    async fn validate_restore_destination(destination_dir: &Path) -> Result<PathBuf> {
        let canonical = fs::canonicalize(destination_dir)
            .await
            .map_err(|_| VaultError::UnsafeDestination(destination_dir.display().to_string()))?;

        if !canonical.is_absolute() {
            return Err(VaultError::UnsafeDestination(canonical.display().to_string()));
        }

        let meta = fs::metadata(&canonical)
            .await
            .map_err(|_| VaultError::UnsafeDestination(canonical.display().to_string()))?;
        if !meta.is_dir() {
            return Err(VaultError::UnsafeDestination(canonical.display().to_string()));
        }
        if meta.permissions().readonly() {
            return Err(VaultError::UnsafeDestination(canonical.display().to_string()));
        }

        Ok(canonical)
    }

    /// Strips any path components and control characters from `name`,
    /// falling back to `"quarantined_file"` if nothing survives.
    pub fn sanitize_filename(name: &str) -> String {
        let basename = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let safe: String = basename.chars().filter(|c| (*c as u32) >= 32 && *c != '/' && *c != '\\').collect();
        if safe.is_empty() {
            "quarantined_file".to_string()
        } else {
            safe
        }
    }

    pub async fn restore_file(&self, id: &str, destination_dir: &Path) -> Result<PathBuf> {
        validate_id(id)?;
        let destination_dir = Self::validate_restore_destination(destination_dir).await?;

        let payload_path = self.payload_path(id);
        if !payload_path.exists() {
            return Err(VaultError::NotFound(id.to_string()));
        }

        let metadata = self.get_metadata(id).await?;
        let safe_filename = Self::sanitize_filename(&metadata.filename);

        let mut dest_path = destination_dir.join(&safe_filename);
        if dest_path.exists() {
            let mut found = false;
            for n in 1..1000 {
                let candidate = destination_dir.join(format!("{safe_filename}_({n})"));
                if !candidate.exists() {
                    dest_path = candidate;
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(VaultError::DestinationExists(dest_path.display().to_string()));
            }
        }

        fs::rename(&payload_path, &dest_path).await?;

        if let Err(e) = Self::chmod(&dest_path, 0o600).await {
            tracing::warn!(quarantine_id = %id, error = %e, "failed to restore permissions on restored file");
        }

        fs::remove_file(self.metadata_path(id)).await?;

        tracing::info!(quarantine_id = %id, destination = %dest_path.display(), "file restored from quarantine");
        Ok(dest_path)
    }

    pub async fn delete_file(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        fs::remove_file(self.payload_path(id))
            .await
            .map_err(|_| VaultError::NotFound(id.to_string()))?;
        let _ = fs::remove_file(self.metadata_path(id)).await;
        Ok(())
    }
}
