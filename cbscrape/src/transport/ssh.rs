//! russh client: connect, authenticate, open the interactive shell.

use std::pin::Pin;
use std::sync::Arc;

use log::{debug, warn};
use russh::ChannelStream;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use super::known_hosts::{KnownHost, Rejection};
use crate::error::{Result, TransportError};

/// Byte stream of an interactive shell channel.
pub type SshStream = Pin<Box<ChannelStream<Msg>>>;

/// An authenticated SSH connection.
pub struct SshTransport {
    handle: Handle<HostKeyGate>,
    pty_size: (u32, u32),
}

impl SshTransport {
    /// Connect within `config.timeout` and authenticate at the SSH layer.
    pub async fn connect(config: &SshConfig) -> Result<Self> {
        let gate = HostKeyGate {
            known_host: KnownHost::for_config(config),
            mode: config.host_key_verification.clone(),
            rejection: Rejection::default(),
        };
        let rejection = gate.rejection.clone();

        let client_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.timeout),
            ..Default::default()
        });

        debug!("connecting to {}", config.socket_addr());
        let connecting = client::connect(client_config, (config.host.as_str(), config.port), gate);
        let mut handle = match tokio::time::timeout(config.timeout, connecting).await {
            Err(_) => return Err(TransportError::Timeout(config.timeout).into()),
            // A refused host key surfaces from russh as a bare UnknownKey.
            Ok(Err(e)) => return Err(rejection.take().unwrap_or(TransportError::Ssh(e)).into()),
            Ok(Ok(handle)) => handle,
        };

        if !authenticate(&mut handle, config).await? {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }
        debug!("{}: SSH layer authenticated as '{}'", config.host, config.username);

        Ok(Self {
            handle,
            pty_size: (config.terminal_width, config.terminal_height),
        })
    }

    /// Request a PTY and a shell, returning the channel as a byte stream.
    pub async fn open_shell(&self) -> Result<SshStream> {
        let (width, height) = self.pty_size;
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;
        channel
            .request_pty(true, "xterm", width, height, 0, 0, &[])
            .await
            .map_err(TransportError::Ssh)?;
        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(Box::pin(channel.into_stream()))
    }

    /// Disconnect the SSH session.
    pub async fn close(self) -> Result<()> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// Run the configured SSH-level authentication. `Ok(false)` means the
/// server said no.
async fn authenticate(handle: &mut Handle<HostKeyGate>, config: &SshConfig) -> Result<bool> {
    let user = config.username.as_str();
    let result = match &config.auth {
        AuthMethod::None => handle.authenticate_none(user).await,
        AuthMethod::Password(password) => {
            handle
                .authenticate_password(user, password.expose_secret())
                .await
        }
        AuthMethod::PrivateKey { path, passphrase } => {
            let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                .map_err(|e| TransportError::Key(e.to_string()))?;
            let rsa_hash = handle
                .best_supported_rsa_hash()
                .await
                .map_err(TransportError::Ssh)?
                .flatten();
            handle
                .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::new(key), rsa_hash))
                .await
        }
    };
    Ok(result.map_err(TransportError::Ssh)?.success())
}

/// russh handler that only judges the server's host key.
struct HostKeyGate {
    known_host: KnownHost,
    mode: HostKeyVerification,
    rejection: Rejection,
}

impl client::Handler for HostKeyGate {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.known_host.verify(server_public_key, &self.mode) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("rejecting host key: {}", e);
                self.rejection.store(e);
                Ok(false)
            }
        }
    }
}
