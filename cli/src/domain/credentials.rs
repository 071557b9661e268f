//! SSH credential candidates for the bootstrap host.

use std::path::{Path, PathBuf};

/// Private key files tried, in order, when the operator names none.
pub const DEFAULT_KEY_FILES: &[&str] = &["id_ed25519", "id_ecdsa", "id_rsa"];

/// One way of authenticating to the bootstrap host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Identities held by the running SSH agent.
    Agent,
    /// A private key file on disk.
    KeyFile(PathBuf),
}

/// Credentials to try, in order.
///
/// Explicit key paths are used exclusively when present. Otherwise the SSH
/// agent comes first, followed by the default key files under `~/.ssh`.
#[must_use]
pub fn candidate_credentials(explicit: &[PathBuf], home: Option<&Path>) -> Vec<Credential> {
    if !explicit.is_empty() {
        return explicit.iter().cloned().map(Credential::KeyFile).collect();
    }
    let mut candidates = vec![Credential::Agent];
    if let Some(home) = home {
        let ssh_dir = home.join(".ssh");
        candidates.extend(
            DEFAULT_KEY_FILES
                .iter()
                .map(|name| Credential::KeyFile(ssh_dir.join(name))),
        );
    }
    candidates
}
