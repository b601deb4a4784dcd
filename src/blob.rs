//! Filesystem-backed avatar storage.
//!
//! The rest of the crate only ever stores and echoes the opaque ref
//! string this module hands back.

use std::path::PathBuf;

use tokio::fs;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct AvatarStore {
    base_dir: PathBuf,
    max_bytes: usize,
}

impl AvatarStore {
    pub async fn new(base_dir: PathBuf, max_bytes: usize) -> Result<Self, ApiError> {
        fs::create_dir_all(&base_dir).await.map_err(|e| {
            ApiError::Blob(format!(
                "could not create avatar dir {}: {e}",
                base_dir.display()
            ))
        })?;
        Ok(Self {
            base_dir,
            max_bytes,
        })
    }

    /// Write `bytes` under a name derived from owner and original
    /// filename, returning the public ref.
    pub async fn save(
        &self,
        owner: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("empty upload".into()));
        }
        if bytes.len() > self.max_bytes {
            return Err(ApiError::BadRequest(format!(
                "upload exceeds {} bytes",
                self.max_bytes
            )));
        }

        let mut name = sanitize(filename);
        if name.is_empty() {
            name = "avatar".into();
        }
        let name = format!("{}_{}", sanitize(owner), name);

        let path = self.base_dir.join(&name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::Blob(format!("could not write {}: {e}", path.display())))?;

        log::debug!("stored avatar {name} ({} bytes)", bytes.len());
        Ok(format!("/static/avatars/{name}"))
    }
}

/// Keep only characters that are safe in a bare filename.
fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}
