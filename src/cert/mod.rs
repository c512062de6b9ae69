//! Certificate-manager capability.
//!
//! The server shell holds a [`CertificateManager`] reference for wiring
//! only; the trait is invoked by the token-update flow, not by the shell.
//! Issuance and rotation live entirely outside this crate.

use std::fs;
use std::path::PathBuf;

/// Error type for certificate-manager operations.
#[derive(Debug, thiserror::Error)]
pub enum CertError {
    #[error("failed to persist join token: {0}")]
    Io(#[from] std::io::Error),
}

/// Externally managed certificate functionality, held as a capability.
pub trait CertificateManager: Send + Sync {
    /// Replace the bootstrap join token used for certificate issuance.
    fn update_join_token(&self, token: &str) -> Result<(), CertError>;
}

/// Default manager that persists the join token to a file.
///
/// The persisted token is picked up by the out-of-process issuance
/// machinery; nothing in this crate reads it back.
pub struct FileCertificateManager {
    join_token_path: PathBuf,
}

impl FileCertificateManager {
    pub fn new(join_token_path: impl Into<PathBuf>) -> Self {
        Self {
            join_token_path: join_token_path.into(),
        }
    }
}

impl CertificateManager for FileCertificateManager {
    fn update_join_token(&self, token: &str) -> Result<(), CertError> {
        if let Some(parent) = self.join_token_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.join_token_path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.join_token_path, fs::Permissions::from_mode(0o600))?;
        }

        tracing::info!(path = %self.join_token_path.display(), "join token updated");
        Ok(())
    }
}
