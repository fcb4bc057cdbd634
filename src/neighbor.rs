use crate::types::HwAddr;
use async_trait::async_trait;
use regex::Regex;
use std::net::Ipv4Addr;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;

/// Platform convention for querying the OS neighbor table and parsing its
/// textual output. Selected once at startup; the rest of the pipeline only
/// sees the platform-independent `Resolver` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborFormat {
    /// `arp -a <ip>`, lines like `192.168.1.1    aa-bb-cc-11-22-33   dynamic`.
    Windows,
    /// `arp -n <ip>`, lines like `? (192.168.1.1) at aa:bb:cc:11:22:33 on en0`.
    Unix,
}

impl NeighborFormat {
    /// Convention for the platform this binary runs on.
    pub fn native() -> NeighborFormat {
        if cfg!(windows) {
            NeighborFormat::Windows
        } else {
            NeighborFormat::Unix
        }
    }

    /// Arguments for the `arp` invocation targeting one address.
    pub fn query_args(&self, ip: Ipv4Addr) -> [String; 2] {
        match self {
            NeighborFormat::Windows => ["-a".to_string(), ip.to_string()],
            NeighborFormat::Unix => ["-n".to_string(), ip.to_string()],
        }
    }

    /// Extract the hardware address bound to `target` from captured `arp`
    /// stdout. A clean parse with no match yields `NotFound`; the token, if
    /// found, is returned canonicalized (colons, uppercase).
    pub fn extract(&self, output: &str, target: Ipv4Addr) -> HwAddr {
        let captures = match self {
            NeighborFormat::Windows => {
                // The Windows table lists every neighbor; anchor on the
                // target address so another host's entry cannot match.
                let pattern = format!(
                    r"(?i){}\s+(\w{{2}}[-:]\w{{2}}[-:]\w{{2}}[-:]\w{{2}}[-:]\w{{2}}[-:]\w{{2}})",
                    regex::escape(&target.to_string())
                );
                match Regex::new(&pattern) {
                    Ok(re) => re.captures(output),
                    Err(_) => return HwAddr::Error,
                }
            }
            NeighborFormat::Unix => unix_pattern().captures(output),
        };
        match captures.and_then(|c| c.get(1)) {
            Some(token) => HwAddr::from_token(token.as_str()),
            None => HwAddr::NotFound,
        }
    }
}

fn unix_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"at\s+([0-9a-fA-F:]+)\s+on").expect("pattern is valid"))
}

/// Link-layer address resolution for a host already known to be reachable.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, ip: Ipv4Addr) -> HwAddr;
}

/// Production resolver: runs the platform `arp` query and parses its output.
///
/// Per-host result states, never escalated to the caller:
/// - match found → normalized address,
/// - query ran but no match, or non-zero exit → `NotFound`,
/// - query could not be started → `Error`.
pub struct ArpResolver {
    format: NeighborFormat,
}

impl ArpResolver {
    pub fn new(format: NeighborFormat) -> ArpResolver {
        ArpResolver { format }
    }

    /// Resolver for the running platform.
    pub fn native() -> ArpResolver {
        ArpResolver::new(NeighborFormat::native())
    }
}

#[async_trait]
impl Resolver for ArpResolver {
    async fn resolve(&self, ip: Ipv4Addr) -> HwAddr {
        let output = match Command::new("arp")
            .args(self.format.query_args(ip))
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(_) => return HwAddr::Error,
        };
        if !output.status.success() {
            return HwAddr::NotFound;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        self.format.extract(&text, ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_extract_from_bsd_output() {
        let out = "? (192.168.1.7) at a4:83:e7:2f:10:9b on en0 ifscope [ethernet]\n";
        let hw = NeighborFormat::Unix.extract(out, Ipv4Addr::new(192, 168, 1, 7));
        assert_eq!(hw, HwAddr::Addr("A4:83:E7:2F:10:9B".into()));
    }

    #[test]
    fn unix_no_entry_is_not_found() {
        let out = "? (192.168.1.9) -- no entry\n";
        let hw = NeighborFormat::Unix.extract(out, Ipv4Addr::new(192, 168, 1, 9));
        assert_eq!(hw, HwAddr::NotFound);
    }

    #[test]
    fn windows_extract_normalizes_hyphens() {
        let out = "\nInterface: 192.168.1.10 --- 0xb\n\
                   \x20 Internet Address      Physical Address      Type\n\
                   \x20 192.168.1.1           aa-bb-cc-11-22-33     dynamic\n";
        let hw = NeighborFormat::Windows.extract(out, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(hw, HwAddr::Addr("AA:BB:CC:11:22:33".into()));
    }

    #[test]
    fn windows_extract_anchors_on_target() {
        // .11 must not pick up the entry for .110.
        let out = "  192.168.1.110         aa-bb-cc-11-22-33     dynamic\n";
        let hw = NeighborFormat::Windows.extract(out, Ipv4Addr::new(192, 168, 1, 11));
        assert_eq!(hw, HwAddr::NotFound);
    }

    #[test]
    fn query_args_per_platform() {
        let ip = Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(
            NeighborFormat::Windows.query_args(ip),
            ["-a".to_string(), "10.0.0.1".to_string()]
        );
        assert_eq!(
            NeighborFormat::Unix.query_args(ip),
            ["-n".to_string(), "10.0.0.1".to_string()]
        );
    }
}
