//! Transport-mode selection and certificate loading.
//!
//! # Responsibilities
//! - Decide TLS vs plaintext from the presence of certificate material
//! - Load the rustls config when TLS is selected
//!
//! # Design Decisions
//! - The probe is a pure function of filesystem state, evaluated once per
//!   start; it never fails (missing material is an expected runtime state)
//! - Malformed material that *is* present fails at load time and is fatal,
//!   never a silent downgrade

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// How the listener terminates client connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Plaintext,
    Tls,
}

/// Decide the transport mode from the serving certificate paths.
///
/// TLS is selected iff both paths are readable regular files. Any access
/// error is treated the same as absence: logged, then plaintext fallback.
pub fn probe_transport(cert_path: &Path, key_path: &Path) -> TransportMode {
    if readable_file(cert_path) && readable_file(key_path) {
        tracing::info!(
            cert = %cert_path.display(),
            key = %key_path.display(),
            "serving certificate material found, tls enabled"
        );
        TransportMode::Tls
    } else {
        tracing::info!(
            cert = %cert_path.display(),
            key = %key_path.display(),
            "serving certificate material unavailable, falling back to plaintext"
        );
        TransportMode::Plaintext
    }
}

/// True iff the path can be opened and is a regular file.
fn readable_file(path: &Path) -> bool {
    match fs::File::open(path).and_then(|file| file.metadata()) {
        Ok(metadata) if metadata.is_file() => true,
        Ok(_) => {
            tracing::info!(path = %path.display(), "tls path is not a regular file");
            false
        }
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => {
            tracing::info!(path = %path.display(), error = %err, "failed to access tls path");
            false
        }
    }
}

/// Load the rustls server configuration from PEM files.
///
/// Only called once the probe selected TLS; errors here mean the material
/// exists but is unusable, which the bootstrap treats as fatal.
pub async fn load_rustls_config(
    cert_path: &Path,
    key_path: &Path,
) -> Result<RustlsConfig, std::io::Error> {
    RustlsConfig::from_pem_file(cert_path, key_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_files_present_selects_tls() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("server.crt");
        let key = dir.path().join("server.key");
        fs::write(&cert, "cert").unwrap();
        fs::write(&key, "key").unwrap();

        assert_eq!(probe_transport(&cert, &key), TransportMode::Tls);
    }

    #[test]
    fn missing_key_selects_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("server.crt");
        fs::write(&cert, "cert").unwrap();

        assert_eq!(
            probe_transport(&cert, &dir.path().join("server.key")),
            TransportMode::Plaintext
        );
    }

    #[test]
    fn missing_both_selects_plaintext() {
        assert_eq!(
            probe_transport(Path::new("/nonexistent/crt"), Path::new("/nonexistent/key")),
            TransportMode::Plaintext
        );
    }

    #[test]
    fn directory_as_cert_selects_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("server.key");
        fs::write(&key, "key").unwrap();

        assert_eq!(probe_transport(dir.path(), &key), TransportMode::Plaintext);
    }

    #[tokio::test]
    async fn garbage_pem_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("server.crt");
        let key = dir.path().join("server.key");
        fs::write(&cert, "not a pem").unwrap();
        fs::write(&key, "also not a pem").unwrap();

        assert!(load_rustls_config(&cert, &key).await.is_err());
    }
}
