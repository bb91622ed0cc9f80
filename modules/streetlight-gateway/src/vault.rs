use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use streetlight_common::error::{Result, StreetlightError};

/// Opaque device-scoped storage for a single named secret. Models the
/// platform secure store; all token reads and writes go through the
/// [`crate::Session`] so persisted and in-memory state cannot diverge.
#[async_trait]
pub trait TokenVault: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn clear(&self, key: &str) -> Result<()>;
}

/// In-memory vault for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryVault {
    secret: Mutex<Option<String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            secret: Mutex::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl TokenVault for MemoryVault {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(self.secret.lock().await.clone())
    }

    async fn set(&self, _key: &str, value: &str) -> Result<()> {
        *self.secret.lock().await = Some(value.to_string());
        Ok(())
    }

    async fn clear(&self, _key: &str) -> Result<()> {
        *self.secret.lock().await = None;
        Ok(())
    }
}

/// Plain-file vault so the CLI keeps its session across restarts.
/// Not secure storage — the real deployment target hands this trait to the
/// platform keychain instead.
pub struct FileVault {
    dir: PathBuf,
}

impl FileVault {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl TokenVault for FileVault {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                Ok(if trimmed.is_empty() { None } else { Some(trimmed) })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StreetlightError::Config(format!(
                "token vault read failed: {e}"
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StreetlightError::Config(format!("token vault mkdir failed: {e}")))?;
        tokio::fs::write(self.path(key), value)
            .await
            .map_err(|e| StreetlightError::Config(format!("token vault write failed: {e}")))
    }

    async fn clear(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StreetlightError::Config(format!(
                "token vault clear failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_vault_round_trips() {
        let vault = MemoryVault::new();
        assert_eq!(vault.get("k").await.unwrap(), None);
        vault.set("k", "tok").await.unwrap();
        assert_eq!(vault.get("k").await.unwrap(), Some("tok".to_string()));
        vault.clear("k").await.unwrap();
        assert_eq!(vault.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clearing_an_empty_vault_is_fine() {
        let vault = MemoryVault::new();
        vault.clear("k").await.unwrap();
        vault.clear("k").await.unwrap();
    }
}
