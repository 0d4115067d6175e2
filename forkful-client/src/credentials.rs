//! Persistent storage for the session token.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CredentialError;
use crate::model::AuthToken;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError>;
    async fn set_token(&self, token: &AuthToken) -> Result<(), CredentialError>;
    async fn remove_token(&self) -> Result<(), CredentialError>;
}

/// In-process store. Forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<AuthToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError> {
        Ok(self.token.read().await.clone())
    }

    async fn set_token(&self, token: &AuthToken) -> Result<(), CredentialError> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn remove_token(&self) -> Result<(), CredentialError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Token kept in a single file, readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get_token(&self) -> Result<Option<AuthToken>, CredentialError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = AuthToken::new(contents.trim());
                Ok((!token.is_empty()).then_some(token))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_token(&self, token: &AuthToken) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, token.as_str()).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await?;
        }
        Ok(())
    }

    async fn remove_token(&self) -> Result<(), CredentialError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
