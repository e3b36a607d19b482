//! Host key policy against an OpenSSH known_hosts file.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use russh::keys::PublicKey;
use russh::keys::known_hosts;

use super::config::{HostKeyVerification, SshConfig};
use crate::error::TransportError;

/// The known_hosts entry for one `host:port`.
#[derive(Debug, Clone)]
pub(crate) struct KnownHost {
    host: String,
    port: u16,
    /// `None` means `~/.ssh/known_hosts`.
    file: Option<PathBuf>,
}

impl KnownHost {
    pub(crate) fn for_config(config: &SshConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            file: config.known_hosts_path.clone(),
        }
    }

    /// Apply `mode` to the key the server presented.
    pub(crate) fn verify(
        &self,
        key: &PublicKey,
        mode: &HostKeyVerification,
    ) -> Result<(), TransportError> {
        if matches!(mode, HostKeyVerification::Disabled) {
            return Ok(());
        }
        if self.is_recorded(key)? {
            return Ok(());
        }
        match mode {
            HostKeyVerification::AcceptNew => {
                debug!("{}:{}: learning new host key", self.host, self.port);
                if let Err(e) = self.record(key) {
                    warn!("Failed to save host key: {}", e);
                }
                Ok(())
            }
            _ => Err(TransportError::HostKeyUnknown {
                host: self.host.clone(),
                port: self.port,
            }),
        }
    }

    /// `Ok(false)` when the host has no entry; a different key is an error.
    fn is_recorded(&self, key: &PublicKey) -> Result<bool, TransportError> {
        let lookup = match &self.file {
            Some(file) => known_hosts::check_known_hosts_path(&self.host, self.port, key, file),
            None => known_hosts::check_known_hosts(&self.host, self.port, key),
        };
        lookup.map_err(|e| match e {
            russh::keys::Error::KeyChanged { line } => TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            },
            other => TransportError::KnownHosts(other.to_string()),
        })
    }

    fn record(&self, key: &PublicKey) -> Result<(), TransportError> {
        let learned = match &self.file {
            Some(file) => known_hosts::learn_known_hosts_path(&self.host, self.port, key, file),
            None => known_hosts::learn_known_hosts(&self.host, self.port, key),
        };
        learned.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }
}

/// Carries the reason a host key was refused out of the russh handler,
/// which can only answer yes or no.
#[derive(Debug, Clone, Default)]
pub(crate) struct Rejection(Arc<Mutex<Option<TransportError>>>);

impl Rejection {
    pub(crate) fn store(&self, error: TransportError) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(error);
        }
    }

    pub(crate) fn take(&self) -> Option<TransportError> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}
