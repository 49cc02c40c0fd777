//! SSH command runner for Nexus switches
//!
//! One session per run. Commands are executed one at a time on fresh
//! `exec` channels of the same session; output is captured in full.

use crate::error::DiagError;
use base64::Engine;
use ssh2::{Channel, Session};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How to authenticate against the switch
#[derive(Clone)]
pub enum Credential {
    Password(String),
    KeyFile {
        path: PathBuf,
        passphrase: Option<String>,
    },
}

impl Credential {
    /// Literal secret that must never leave the process
    pub fn secret(&self) -> Option<&str> {
        match self {
            Credential::Password(p) => Some(p.as_str()),
            Credential::KeyFile { passphrase, .. } => passphrase.as_deref(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Password(_) => f.write_str("Password(***)"),
            Credential::KeyFile { path, .. } => f
                .debug_struct("KeyFile")
                .field("path", path)
                .field("passphrase", &"***")
                .finish(),
        }
    }
}

/// Switch to connect to. Lives only for the duration of a run.
#[derive(Debug, Clone)]
pub struct SessionTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub credential: Credential,
}

impl SessionTarget {
    pub fn new(host: &str, username: &str, credential: Credential) -> Self {
        Self {
            host: host.trim().to_string(),
            port: 22,
            username: username.trim().to_string(),
            credential,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Session tuning
#[derive(Debug, Clone)]
pub struct SshOptions {
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
    pub host_key_fingerprint: Option<String>,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
            host_key_fingerprint: None,
        }
    }
}

/// Raw result of one remote command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: Option<i32>,
    pub duration_ms: u64,
}

/// Anything that can run a command on a switch and hand back its text
pub trait CommandRunner {
    fn run(&mut self, command: &str) -> Result<RawOutput, DiagError>;
}

/// Live SSH session to a switch
pub struct SshSession {
    session: Session,
    host: String,
    fingerprint: Option<String>,
    command_timeout: Duration,
}

/// Pause between non-blocking reads that returned nothing
const POLL_INTERVAL: Duration = Duration::from_millis(20);

impl SshSession {
    /// Connect and authenticate
    pub fn connect(target: &SessionTarget, options: &SshOptions) -> Result<Self, DiagError> {
        let connect_err = |reason: String| DiagError::Connect {
            host: target.host.clone(),
            reason,
        };

        let addr = (target.host.as_str(), target.port)
            .to_socket_addrs()
            .map_err(|e| connect_err(format!("cannot resolve address: {}", e)))?
            .next()
            .ok_or_else(|| connect_err("no address found".to_string()))?;

        debug!("Connecting to {} ({})", target.host, addr);
        let tcp = TcpStream::connect_timeout(&addr, options.connect_timeout)
            .map_err(|e| connect_err(e.to_string()))?;

        let mut session = Session::new().map_err(|e| connect_err(e.message().to_string()))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(duration_ms_u32(options.connect_timeout));
        session
            .handshake()
            .map_err(|e| connect_err(format!("SSH handshake failed: {}", e.message())))?;

        let fingerprint = host_key_fingerprint(&session);
        verify_host_key(options.host_key_fingerprint.as_deref(), fingerprint.as_deref())?;
        match (&options.host_key_fingerprint, &fingerprint) {
            (None, Some(observed)) => {
                info!("Accepting host key {} for {} (not pinned)", observed, target.host)
            }
            (Some(_), Some(observed)) => debug!("Host key {} matches pin", observed),
            _ => warn!("Server did not present a host key hash"),
        }

        let auth_result = match &target.credential {
            Credential::Password(password) => {
                session.userauth_password(&target.username, password)
            }
            Credential::KeyFile { path, passphrase } => session.userauth_pubkey_file(
                &target.username,
                None,
                path,
                passphrase.as_deref(),
            ),
        };

        if let Err(e) = auth_result {
            debug!("Authentication error: {}", e.message());
        }
        if !session.authenticated() {
            return Err(DiagError::Auth {
                user: target.username.clone(),
                host: target.host.clone(),
            });
        }

        session.set_timeout(duration_ms_u32(options.command_timeout));
        info!("Connection established with {}", target.host);

        Ok(Self {
            session,
            host: target.host.clone(),
            fingerprint,
            command_timeout: options.command_timeout,
        })
    }

    /// SHA-256 fingerprint of the server host key
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Disconnect from the switch
    pub fn close(self) {
        // Drop does the work
    }
}

impl CommandRunner for SshSession {
    fn run(&mut self, command: &str) -> Result<RawOutput, DiagError> {
        let start = Instant::now();
        let mut channel = self.session.channel_session()?;
        channel.exec(command)?;

        self.session.set_blocking(false);
        let drained = drain_channel(&mut channel, start, self.command_timeout);
        self.session.set_blocking(true);
        let (stdout, stderr) = drained?;

        channel.wait_close()?;
        let exit_status = channel.exit_status().ok();

        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_status,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        let _ = self
            .session
            .disconnect(None, "diagnostics complete", None);
        info!("SSH connection to {} closed", self.host);
    }
}

/// Read stdout and stderr in turn until the remote side sends EOF
///
/// Both streams share the channel window, so neither may be left unread while
/// the other is drained.
fn drain_channel(
    channel: &mut Channel,
    start: Instant,
    timeout: Duration,
) -> Result<(Vec<u8>, Vec<u8>), DiagError> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        let mut progressed = read_chunk(&mut *channel, &mut buf, &mut stdout, "stdout")?;
        progressed |= read_chunk(&mut channel.stderr(), &mut buf, &mut stderr, "stderr")?;

        if channel.eof() && !progressed {
            return Ok((stdout, stderr));
        }
        if start.elapsed() > timeout {
            let _ = channel.close();
            return Err(DiagError::Ssh(format!(
                "command timed out after {}s",
                timeout.as_secs()
            )));
        }
        if !progressed {
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

/// One non-blocking read; `Ok(true)` when bytes arrived
fn read_chunk<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    out: &mut Vec<u8>,
    stream: &str,
) -> Result<bool, DiagError> {
    match reader.read(buf) {
        Ok(0) => Ok(false),
        Ok(n) => {
            out.extend_from_slice(&buf[..n]);
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(false),
        Err(e) => Err(DiagError::Ssh(format!("{} read failed: {}", stream, e))),
    }
}

fn duration_ms_u32(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

fn host_key_fingerprint(session: &Session) -> Option<String> {
    let hash = session.host_key_hash(ssh2::HashType::Sha256)?;
    Some(format_fingerprint(hash))
}

/// Render a raw SHA-256 digest the way OpenSSH prints it
pub fn format_fingerprint(hash: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode(hash);
    format!("SHA256:{}", encoded)
}

/// Normalize a user-supplied fingerprint to "SHA256:<base64-no-pad>"
pub fn normalize_fingerprint(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned = trimmed.trim_end_matches('=');
    let body = match cleaned.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("sha256:") => &cleaned[7..],
        _ => cleaned,
    };
    Some(format!("SHA256:{}", body.trim()))
}

/// Compare the observed host key against an optional pin
pub fn verify_host_key(expected: Option<&str>, observed: Option<&str>) -> Result<(), DiagError> {
    let Some(expected) = expected.and_then(normalize_fingerprint) else {
        return Ok(());
    };
    match observed {
        Some(observed) if observed == expected => Ok(()),
        other => Err(DiagError::HostKeyMismatch {
            expected,
            observed: other.unwrap_or("unknown").to_string(),
        }),
    }
}
