//! Infrastructure implementation of the remote shell ports over `ssh2`.
//!
//! `ssh2` is blocking, so every network operation runs on tokio's blocking
//! pool. `ssh2::Session` is a cheap handle to shared state and is cloned into
//! each blocking task.

use std::io::{self, BufRead, BufReader, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ssh2::Session;
use tracing::{debug, warn};

use crate::application::ports::{RemoteConnector, RemoteSession, SshTarget};
use crate::domain::credentials::{Credential, candidate_credentials};
use crate::infra::fs::write_new_file;

/// Production `RemoteConnector` backed by libssh2.
///
/// Host keys are not verified: the bootstrap host is short-lived and its key
/// is never known ahead of time.
#[derive(Debug, Clone, Default)]
pub struct Ssh2Connector {
    home: Option<PathBuf>,
}

impl Ssh2Connector {
    /// Connector discovering default keys under the current user's home.
    #[must_use]
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    /// Connector discovering default keys under `home` (used in tests).
    #[must_use]
    pub fn with_home(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    fn connect_blocking(
        host: &str,
        port: u16,
        user: &str,
        credentials: &[Credential],
        timeout: Option<Duration>,
    ) -> Result<Session> {
        let tcp = open_tcp(host, port, timeout)?;
        if let Some(timeout) = timeout {
            tcp.set_read_timeout(Some(timeout)).ok();
            tcp.set_write_timeout(Some(timeout)).ok();
        }

        let mut session = Session::new().context("failed to create SSH session")?;
        session.set_tcp_stream(tcp);
        if let Some(timeout) = timeout {
            session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));
        }
        session
            .handshake()
            .with_context(|| format!("SSH handshake with {host}:{port} failed"))?;

        authenticate(&session, user, credentials)?;
        Ok(session)
    }
}

fn open_tcp(host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpStream> {
    let Some(timeout) = timeout else {
        return TcpStream::connect((host, port))
            .with_context(|| format!("failed to connect to {host}:{port}"));
    };
    let mut last_err = None;
    for addr in (host, port)
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {host}"))?
    {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(tcp) => return Ok(tcp),
            Err(e) => last_err = Some(e),
        }
    }
    match last_err {
        Some(e) => Err(e).with_context(|| format!("failed to connect to {host}:{port}")),
        None => anyhow::bail!("{host} resolved to no addresses"),
    }
}

/// Try each credential in turn until one authenticates.
fn authenticate(session: &Session, user: &str, credentials: &[Credential]) -> Result<()> {
    let mut failures = Vec::new();
    for credential in credentials {
        let attempt = match credential {
            Credential::Agent => agent_auth(session, user),
            Credential::KeyFile(path) if !path.exists() => {
                debug!(key = %path.display(), "skipping missing key file");
                continue;
            }
            Credential::KeyFile(path) => session
                .userauth_pubkey_file(user, None, path, None)
                .with_context(|| format!("key {} rejected", path.display())),
        };
        match attempt {
            Ok(()) if session.authenticated() => {
                debug!(?credential, "authenticated");
                return Ok(());
            }
            Ok(()) => failures.push(format!("{credential:?} did not authenticate")),
            Err(e) => {
                debug!(?credential, error = %format!("{e:#}"), "authentication attempt failed");
                failures.push(format!("{e:#}"));
            }
        }
    }
    if failures.is_empty() {
        anyhow::bail!("no usable SSH credentials found");
    }
    anyhow::bail!("authentication as {user} failed: {}", failures.join("; "))
}

fn agent_auth(session: &Session, user: &str) -> Result<()> {
    let mut agent = session.agent().context("failed to initialize SSH agent")?;
    agent.connect().context("failed to connect to SSH agent")?;
    agent
        .list_identities()
        .context("failed to list SSH agent identities")?;
    let identities = agent
        .identities()
        .context("failed to get SSH agent identities")?;
    for identity in &identities {
        if agent.userauth(user, identity).is_ok() {
            return Ok(());
        }
    }
    anyhow::bail!("no SSH agent identity accepted ({} tried)", identities.len())
}

impl RemoteConnector for Ssh2Connector {
    type Session = Ssh2Session;

    async fn connect(&self, target: &SshTarget<'_>) -> Result<Ssh2Session> {
        let credentials = candidate_credentials(target.key_paths, self.home.as_deref());
        let host = target.host.to_string();
        let user = target.user.to_string();
        let (port, timeout) = (target.port, target.timeout);
        let session = tokio::task::spawn_blocking(move || {
            Ssh2Connector::connect_blocking(&host, port, &user, &credentials, timeout)
        })
        .await
        .context("SSH connect task panicked")??;
        Ok(Ssh2Session { session })
    }
}

/// An authenticated libssh2 session. Disconnects when dropped.
pub struct Ssh2Session {
    session: Session,
}

impl Ssh2Session {
    fn run_blocking(session: &Session, command: &str) -> Result<()> {
        let mut channel = session
            .channel_session()
            .context("failed to open session channel")?;
        channel
            .exec(command)
            .with_context(|| format!("failed to start {command:?}"))?;

        for_each_line_lossy(&mut channel, |line| debug!(target: "remote", "{line}"))
            .context("reading remote stdout")?;
        let mut stderr = Vec::new();
        for_each_line_lossy(channel.stderr(), |line| {
            debug!(target: "remote", "{line}");
            stderr.push(line.to_string());
        })
        .context("reading remote stderr")?;

        channel.wait_close().context("waiting for remote command")?;
        let status = channel.exit_status().context("reading exit status")?;
        anyhow::ensure!(
            status == 0,
            "{command:?} exited with status {status}: {}",
            stderr.join("\n").trim()
        );
        Ok(())
    }

    fn pull_blocking(session: &Session, remote: &str, local: &Path) -> Result<u64> {
        let (mut channel, stat) = session
            .scp_recv(Path::new(remote))
            .with_context(|| format!("failed to open remote file {remote}"))?;
        debug!(remote, size = stat.size(), "receiving file");

        let written = write_new_file(local, |file| {
            std::io::copy(&mut channel, file).with_context(|| format!("copying {remote}"))
        })?;

        channel.send_eof().ok();
        channel.wait_eof().ok();
        channel.close().ok();
        channel.wait_close().ok();

        anyhow::ensure!(
            written == stat.size(),
            "received {written} of {} bytes from {remote}",
            stat.size()
        );
        Ok(written)
    }
}

/// Call `f` with each line of `reader`, without its line terminator.
///
/// Remote output is not guaranteed to be UTF-8; invalid sequences are
/// replaced rather than treated as a read error.
fn for_each_line_lossy(reader: impl Read, mut f: impl FnMut(&str)) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        f(&String::from_utf8_lossy(line));
    }
}

impl RemoteSession for Ssh2Session {
    async fn run(&mut self, command: &str) -> Result<()> {
        let session = self.session.clone();
        let command = command.to_string();
        tokio::task::spawn_blocking(move || Ssh2Session::run_blocking(&session, &command))
            .await
            .context("remote command task panicked")?
    }

    async fn pull_file(&mut self, remote: &str, local: &Path) -> Result<u64> {
        let session = self.session.clone();
        let remote = remote.to_string();
        let local = local.to_path_buf();
        tokio::task::spawn_blocking(move || Ssh2Session::pull_blocking(&session, &remote, &local))
            .await
            .context("file transfer task panicked")?
    }
}

impl Drop for Ssh2Session {
    fn drop(&mut self) {
        if let Err(e) = self.session.disconnect(None, "gather finished", None) {
            warn!(error = %e, "failed to close SSH session cleanly");
        }
    }
}
