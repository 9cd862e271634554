use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

/// URL prefix under which stored résumés are served.
pub const PUBLIC_PREFIX: &str = "/uploads/resumes";

const MAX_NAME_LEN: usize = 100;

/// Persists uploaded résumés and hands back the URL they are served from.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn save(&self, original_name: &str, contents: Bytes) -> Result<String>;

    /// Deletes a file previously returned by `save`. Missing files are not an error.
    async fn remove(&self, url: &str) -> Result<()>;
}

/// Writes résumés to `<upload_root>/resumes`, which the router serves at `/uploads`.
pub struct LocalDiskStore {
    dir: PathBuf,
}

impl LocalDiskStore {
    pub fn new(upload_root: &Path) -> Self {
        LocalDiskStore {
            dir: upload_root.join("resumes"),
        }
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload directory {}", self.dir.display()))
    }
}

#[async_trait]
impl ResumeStore for LocalDiskStore {
    async fn save(&self, original_name: &str, contents: Bytes) -> Result<String> {
        self.ensure_dir().await?;

        let name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_file_name(original_name));
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(path = %path.display(), bytes = contents.len(), "stored resume");
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    async fn remove(&self, url: &str) -> Result<()> {
        let name = url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .with_context(|| format!("Not a stored resume URL: {url}"))?;

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => bail!("Failed to remove {name}: {e}"),
        }
    }
}

/// Reduces a client-supplied file name to a safe `.pdf` base name.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();
    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        cleaned = "resume".to_string();
    }
    if !cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned.push_str(".pdf");
    }
    if cleaned.len() > MAX_NAME_LEN {
        cleaned = format!("{}.pdf", &cleaned[..MAX_NAME_LEN - 4]);
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd.pdf");
        assert_eq!(sanitize_file_name("C:\\Users\\ada\\cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_file_name("my résumé (final).PDF"), "my_r_sum___final_.PDF");
    }

    #[test]
    fn test_sanitize_handles_empty_and_hidden_names() {
        assert_eq!(sanitize_file_name(""), "resume.pdf");
        assert_eq!(sanitize_file_name(".pdf"), "pdf.pdf");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = format!("{}.pdf", "a".repeat(300));
        let name = sanitize_file_name(&long);
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert!(name.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_public_url() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(root.path());

        let url = store
            .save("cv.pdf", Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/resumes/"));
        assert!(url.ends_with("-cv.pdf"));

        let name = url.rsplit('/').next().unwrap();
        let written = std::fs::read(root.path().join("resumes").join(name)).unwrap();
        assert_eq!(written, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_same_name_does_not_collide() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(root.path());
        let a = store.save("cv.pdf", Bytes::from_static(b"a")).await.unwrap();
        let b = store.save("cv.pdf", Bytes::from_static(b"b")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_remove_deletes_and_tolerates_missing() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(root.path());
        let url = store.save("cv.pdf", Bytes::from_static(b"x")).await.unwrap();

        store.remove(&url).await.unwrap();
        let name = url.rsplit('/').next().unwrap();
        assert!(!root.path().join("resumes").join(name).exists());
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_refuses_foreign_paths() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalDiskStore::new(root.path());
        assert!(store.remove("/uploads/resumes/../secret").await.is_err());
        assert!(store.remove("/etc/passwd").await.is_err());
    }
}
