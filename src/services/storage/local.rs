use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use super::DocumentStore;

/// Writes documents under a local directory served at `/uploads`.
pub struct LocalDocumentStore {
    root: PathBuf,
    public_base: String,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>, public_base: String) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        let relative = Path::new(path);
        // Reject anything that could escape the upload root.
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("invalid document path: {path}");
        }

        let full = self.root.join(relative);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("failed to create upload directory")?;
        }

        tokio::fs::write(&full, bytes)
            .await
            .with_context(|| format!("failed to write document: {path}"))?;

        Ok(format!("{}/uploads/{path}", self.public_base))
    }
}
