use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;

/// Link-layer resolution outcome for one reachable host.
///
/// Sentinels are distinct variants rather than magic strings, so vendor
/// lookup can never mistake them for real addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwAddr {
    /// Resolved hardware address, canonical `AA:BB:CC:DD:EE:FF` form.
    Addr(String),
    /// The neighbor-table query ran but produced no entry for the host.
    NotFound,
    /// The neighbor-table query could not be executed.
    Error,
}

impl HwAddr {
    /// Build an address from a raw token as captured from command output.
    /// Canonicalizes hyphen separators to colons and hex digits to uppercase;
    /// idempotent on already-canonical input.
    pub fn from_token(token: &str) -> HwAddr {
        HwAddr::Addr(token.replace('-', ":").to_ascii_uppercase())
    }

    /// Vendor prefix (first three octets, separators stripped, uppercase),
    /// or `None` for sentinels.
    pub fn oui_prefix(&self) -> Option<String> {
        match self {
            HwAddr::Addr(mac) => {
                let digits: String = mac.chars().filter(|c| c.is_ascii_hexdigit()).collect();
                if digits.len() < 6 {
                    return None;
                }
                Some(digits[..6].to_ascii_uppercase())
            }
            HwAddr::NotFound | HwAddr::Error => None,
        }
    }
}

impl fmt::Display for HwAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HwAddr::Addr(mac) => f.write_str(mac),
            HwAddr::NotFound => f.write_str("Not Found"),
            HwAddr::Error => f.write_str("Error"),
        }
    }
}

impl Serialize for HwAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One emitted result for a reachable host.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub ip: Ipv4Addr,
    pub mac: HwAddr,
    pub vendor: String,
    pub timestamp: String,
}

/// Aggregate counters and retained entries for a completed sweep.
#[derive(Serialize, Debug, Clone, Default)]
pub struct SweepSummary {
    /// Addresses probed (the whole enumerated range).
    pub probed: u64,
    /// Hosts whose reachability probe succeeded, whether or not the
    /// neighbor resolution produced an address.
    pub hosts_up: u64,
    pub entries: Vec<ScanResult>,
}
