use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::process::Stdio;
use tokio::process::Command;

/// Reachability check for a single host.
///
/// Implementations must be independent per call: one host's failure or
/// timeout never affects another probe.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn is_up(&self, ip: Ipv4Addr) -> bool;
}

/// Production probe: the platform `ping` binary with single-attempt,
/// ~1 second timeout flags. Exit code 0 means reachable; anything else,
/// including failure to launch the binary, counts as unreachable. No retries
/// — a slow host missing one echo is an accepted false negative.
pub struct PingProber;

#[async_trait]
impl Prober for PingProber {
    async fn is_up(&self, ip: Ipv4Addr) -> bool {
        let mut cmd = Command::new("ping");
        if cfg!(windows) {
            cmd.args(["-n", "1", "-w", "1000"]);
        } else {
            cmd.args(["-c", "1", "-W", "1"]);
        }
        cmd.arg(ip.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        matches!(cmd.status().await, Ok(status) if status.success())
    }
}
