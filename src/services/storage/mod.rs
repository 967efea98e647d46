pub mod local;

use async_trait::async_trait;

/// Blob store boundary for verification documents: store bytes under a
/// relative path and hand back a public URL.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> anyhow::Result<String>;
}
