use anyhow::{bail, Context, Result};
use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;

/// Default prefix length applied when the CIDR string carries no `/prefix`.
pub const DEFAULT_PREFIX_LEN: u8 = 24;

/// An IPv4 scan range parsed from CIDR notation (`a.b.c.d/prefix`).
///
/// The base address is truncated to its network address, so `192.168.1.5/24`
/// and `192.168.1.0/24` describe the same range. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRange {
    net: Ipv4Net,
}

impl HostRange {
    /// Parse a CIDR string. The prefix is optional and defaults to /24.
    ///
    /// Errors (rather than silently correcting) when the base address does
    /// not have exactly four octets, an octet is out of range, or the prefix
    /// length exceeds 32.
    pub fn parse(s: &str) -> Result<HostRange> {
        let (base, prefix) = match s.split_once('/') {
            Some((base, prefix)) => {
                let len: u8 = prefix
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid prefix length: {prefix}"))?;
                if len > 32 {
                    bail!("prefix length out of range: /{len} (max /32)");
                }
                (base.trim(), len)
            }
            None => (s.trim(), DEFAULT_PREFIX_LEN),
        };

        let octets: Vec<&str> = base.split('.').collect();
        if octets.len() != 4 {
            bail!("invalid IPv4 address '{base}': expected four dotted octets");
        }
        let mut addr = [0u8; 4];
        for (i, part) in octets.iter().enumerate() {
            addr[i] = part
                .parse()
                .with_context(|| format!("invalid octet in '{base}': {part}"))?;
        }

        let net = Ipv4Net::new(Ipv4Addr::from(addr), prefix)
            .with_context(|| format!("invalid network: {base}/{prefix}"))?
            .trunc();
        Ok(HostRange { net })
    }

    /// Network (all-zeros host bits) address of the range.
    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    /// Prefix length of the range.
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Number of usable host addresses: `2^(32-prefix) - 2` for prefixes up
    /// to /30, zero for /31 and /32. Computed in 64-bit so /0 is exact.
    pub fn host_count(&self) -> u64 {
        let prefix = self.net.prefix_len();
        if prefix >= 31 {
            return 0;
        }
        (1u64 << (32 - prefix)) - 2
    }

    /// Lazy ascending iterator over every usable host address, excluding the
    /// network and broadcast addresses. Restartable: each call yields the
    /// same sequence. Empty for /31 and /32 (explicit guard, no wraparound).
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let (start, end) = if self.net.prefix_len() >= 31 {
            (0u32, 0u32)
        } else {
            (
                u32::from(self.net.network()) + 1,
                u32::from(self.net.broadcast()),
            )
        };
        (start..end).map(Ipv4Addr::from)
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.net.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_explicit_prefix() {
        let range = HostRange::parse("192.168.1.0/30").unwrap();
        assert_eq!(range.network(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(range.prefix_len(), 30);
    }

    #[test]
    fn parse_defaults_to_24() {
        let range = HostRange::parse("10.1.2.3").unwrap();
        assert_eq!(range.prefix_len(), 24);
        // Base truncated to the network address.
        assert_eq!(range.network(), Ipv4Addr::new(10, 1, 2, 0));
    }

    #[test]
    fn parse_rejects_short_address() {
        assert!(HostRange::parse("10.0.0/24").is_err());
        assert!(HostRange::parse("10.0.0.0.0/24").is_err());
    }

    #[test]
    fn parse_rejects_bad_octet_and_prefix() {
        assert!(HostRange::parse("10.0.0.256/24").is_err());
        assert!(HostRange::parse("10.0.0.0/33").is_err());
        assert!(HostRange::parse("10.0.0.x/24").is_err());
    }

    #[test]
    fn slash_30_yields_two_interior_hosts() {
        let range = HostRange::parse("10.0.0.0/30").unwrap();
        let hosts: Vec<Ipv4Addr> = range.hosts().collect();
        assert_eq!(
            hosts,
            vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)]
        );
        assert_eq!(range.host_count(), 2);
    }

    #[test]
    fn slash_31_and_32_are_empty() {
        for cidr in ["10.0.0.0/31", "10.0.0.0/32"] {
            let range = HostRange::parse(cidr).unwrap();
            assert_eq!(range.host_count(), 0, "{cidr}");
            assert_eq!(range.hosts().count(), 0, "{cidr}");
        }
    }

    #[test]
    fn host_count_is_exact_for_wide_prefixes() {
        assert_eq!(HostRange::parse("0.0.0.0/0").unwrap().host_count(), (1u64 << 32) - 2);
        assert_eq!(HostRange::parse("10.0.0.0/8").unwrap().host_count(), (1u64 << 24) - 2);
        assert_eq!(HostRange::parse("192.168.0.0/24").unwrap().host_count(), 254);
    }

    #[test]
    fn hosts_iterator_is_restartable_and_ascending() {
        let range = HostRange::parse("192.168.5.0/29").unwrap();
        let first: Vec<Ipv4Addr> = range.hosts().collect();
        let second: Vec<Ipv4Addr> = range.hosts().collect();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| u32::from(w[0]) < u32::from(w[1])));
        assert_eq!(first.len() as u64, range.host_count());
    }
}
